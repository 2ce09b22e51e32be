//! 3D LUT document, `.cube` reading/writing, and trilinear application.

use std::io::Write;

use rayon::prelude::*;

use crate::error::LutError;
use crate::frame::{CHANNEL_MAX, Frame, quantize};
use crate::transform::params::MAX_RESOLUTION;

/// A 3D lookup table mapping input RGB to graded output RGB.
///
/// Entries are normalized RGB in `[0, 1]`, stored red-fastest: the entry for
/// lattice coordinate `(r, g, b)` is `data[r + size·g + size²·b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    /// Title written to the `TITLE` header line.
    pub title: String,
    /// Grid size per axis (typically 33 or 65).
    pub size: usize,
    /// LUT entries. Length = size³.
    pub data: Vec<[f32; 3]>,
}

impl Lut3D {
    pub fn new(title: impl Into<String>, size: usize, data: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(Some(data.len()), size.checked_pow(3));
        Self {
            title: title.into(),
            size,
            data,
        }
    }

    /// Render the `.cube` text. Identical tables render to identical bytes.
    pub fn to_cube_string(&self) -> String {
        let mut content = String::with_capacity(32 + self.data.len() * 27);
        // A stray quote would end the title early for most readers.
        content.push_str(&format!("TITLE \"{}\"\n", self.title.replace('"', "'")));
        content.push_str(&format!("LUT_3D_SIZE {}\n", self.size));
        for [r, g, b] in &self.data {
            content.push_str(&format!("{r:.6} {g:.6} {b:.6}\n"));
        }
        content
    }

    /// Write the `.cube` text into a sink. Sink errors are returned as-is.
    pub fn write_cube<W: Write>(&self, mut writer: W) -> Result<(), LutError> {
        writer.write_all(self.to_cube_string().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Parse `.cube` text.
    ///
    /// Accepts `TITLE`, `LUT_3D_SIZE`, unit `DOMAIN_MIN`/`DOMAIN_MAX`,
    /// `#` comments and blank lines. Sizes above [`MAX_RESOLUTION`] are
    /// rejected before any table storage is reserved.
    pub fn parse_cube(text: &str) -> Result<Self, LutError> {
        let mut title = String::new();
        let mut size: Option<(usize, usize)> = None;
        let mut data: Vec<[f32; 3]> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parse_err = |message: String| LutError::Parse { line: line_no, message };

            if let Some(rest) = line.strip_prefix("TITLE") {
                title = rest.trim().trim_matches('"').to_string();
            } else if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
                let n: usize = rest
                    .trim()
                    .parse()
                    .map_err(|e| parse_err(format!("bad LUT_3D_SIZE: {e}")))?;
                if n < 2 {
                    return Err(LutError::InvalidResolution(n));
                }
                let entries = n.checked_pow(3).filter(|_| n <= MAX_RESOLUTION).ok_or_else(|| {
                    parse_err(format!("LUT_3D_SIZE {n} exceeds the maximum of {MAX_RESOLUTION}"))
                })?;
                size = Some((n, entries));
                data.reserve(entries);
            } else if line.starts_with("LUT_1D_SIZE") {
                return Err(parse_err("1D LUTs are not supported".to_string()));
            } else if let Some(rest) = line.strip_prefix("DOMAIN_MIN") {
                if parse_triple(rest).map_err(&parse_err)? != [0.0, 0.0, 0.0] {
                    return Err(parse_err("only DOMAIN_MIN 0 0 0 is supported".to_string()));
                }
            } else if let Some(rest) = line.strip_prefix("DOMAIN_MAX") {
                if parse_triple(rest).map_err(&parse_err)? != [1.0, 1.0, 1.0] {
                    return Err(parse_err("only DOMAIN_MAX 1 1 1 is supported".to_string()));
                }
            } else {
                if size.is_none() {
                    return Err(parse_err("table data before LUT_3D_SIZE".to_string()));
                }
                data.push(parse_triple(line).map_err(&parse_err)?);
            }
        }

        let (size, expected) = size.ok_or(LutError::Parse {
            line: 0,
            message: "missing LUT_3D_SIZE".to_string(),
        })?;
        if data.len() != expected {
            return Err(LutError::Parse {
                line: 0,
                message: format!("expected {expected} entries, found {}", data.len()),
            });
        }

        Ok(Self { title, size, data })
    }

    /// Look up a normalized RGB value with trilinear interpolation.
    ///
    /// Inputs outside `[0, 1]` are clamped to the table's domain.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let max = (self.size - 1) as f32;
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        let mut frac = [0.0f32; 3];
        for c in 0..3 {
            let unit = if rgb[c].is_nan() { 0.0 } else { rgb[c].clamp(0.0, 1.0) };
            let v = unit * max;
            let base = v.floor().min(max - 1.0);
            lo[c] = base as usize;
            hi[c] = lo[c] + 1;
            frac[c] = v - base;
        }

        let at = |r: usize, g: usize, b: usize| self.data[r + self.size * (g + self.size * b)];
        let lerp = |a: [f32; 3], b: [f32; 3], t: f32| -> [f32; 3] {
            std::array::from_fn(|c| a[c] + (b[c] - a[c]) * t)
        };

        let c00 = lerp(at(lo[0], lo[1], lo[2]), at(hi[0], lo[1], lo[2]), frac[0]);
        let c10 = lerp(at(lo[0], hi[1], lo[2]), at(hi[0], hi[1], lo[2]), frac[0]);
        let c01 = lerp(at(lo[0], lo[1], hi[2]), at(hi[0], lo[1], hi[2]), frac[0]);
        let c11 = lerp(at(lo[0], hi[1], hi[2]), at(hi[0], hi[1], hi[2]), frac[0]);
        let c0 = lerp(c00, c10, frac[1]);
        let c1 = lerp(c01, c11, frac[1]);
        lerp(c0, c1, frac[2])
    }

    /// Grade an 8-bit frame through this LUT.
    pub fn apply_to_frame(&self, frame: &Frame) -> Frame {
        let mut out = frame.clone();
        out.par_chunks_exact_mut(3).for_each(|px| {
            let graded = self.apply([px[0], px[1], px[2]].map(|v| v as f32 / CHANNEL_MAX));
            for c in 0..3 {
                px[c] = quantize(graded[c] * CHANNEL_MAX);
            }
        });
        out
    }
}

fn parse_triple(text: &str) -> Result<[f32; 3], String> {
    let mut values = [0.0f32; 3];
    let mut parts = text.split_whitespace();
    for value in &mut values {
        let part = parts.next().ok_or_else(|| format!("expected 3 values in {text:?}"))?;
        *value = part.parse().map_err(|e| format!("bad value {part:?}: {e}"))?;
    }
    if parts.next().is_some() {
        return Err(format!("expected 3 values in {text:?}"));
    }
    Ok(values)
}
