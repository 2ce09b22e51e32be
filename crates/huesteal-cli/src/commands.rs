//! Subcommand implementations.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use huesteal_core::analysis::filter_frames;
use huesteal_core::{
    ColorStatistics, Frame, FrameQuality, Lut3D, LutConfig, QualityThresholds, generate_lut,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Settings file contents. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lut: LutConfig,
    pub quality: QualityThresholds,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Serialize)]
struct FrameReport {
    path: PathBuf,
    width: u32,
    height: u32,
    quality: FrameQuality,
    accepted: bool,
}

#[derive(Serialize)]
struct InspectReport {
    frames: Vec<FrameReport>,
    pooled: ColorStatistics,
}

fn load_frame(path: &Path) -> anyhow::Result<Frame> {
    let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(image.to_rgb8())
}

fn load_frames(paths: &[PathBuf]) -> anyhow::Result<Vec<Frame>> {
    paths.iter().map(|p| load_frame(p)).collect()
}

pub fn generate(
    paths: &[PathBuf],
    output: &Path,
    settings: &Settings,
    filter: bool,
) -> anyhow::Result<()> {
    settings.lut.validate()?;

    let mut frames = load_frames(paths)?;
    if filter {
        let total = frames.len();
        frames = filter_frames(frames, &settings.quality);
        if frames.len() < total {
            warn!("quality filter dropped {} of {} frame(s)", total - frames.len(), total);
        }
        if frames.is_empty() {
            bail!(
                "no usable frames: every frame was too dark, too bright, or too flat \
                 (use --no-filter to keep them)"
            );
        }
    }

    let lut = generate_lut(&frames, &settings.lut)?;

    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    lut.write_cube(BufWriter::new(file))
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        "wrote {}³ LUT from {} frame(s) to {}",
        lut.size,
        frames.len(),
        output.display()
    );
    Ok(())
}

pub fn inspect(paths: &[PathBuf], thresholds: &QualityThresholds) -> anyhow::Result<()> {
    let frames = load_frames(paths)?;

    let reports = paths
        .iter()
        .zip(&frames)
        .map(|(path, frame)| {
            let quality = FrameQuality::measure(frame);
            FrameReport {
                path: path.clone(),
                width: frame.width(),
                height: frame.height(),
                quality,
                accepted: thresholds.accepts(&quality),
            }
        })
        .collect();

    let report = InspectReport {
        frames: reports,
        pooled: ColorStatistics::estimate_frames(&frames)?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn apply(lut_path: &Path, input: &Path, output: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(lut_path)
        .with_context(|| format!("reading {}", lut_path.display()))?;
    let lut = Lut3D::parse_cube(&text).with_context(|| format!("parsing {}", lut_path.display()))?;

    let frame = load_frame(input)?;
    let graded = lut.apply_to_frame(&frame);
    graded
        .save(output)
        .with_context(|| format!("saving {}", output.display()))?;

    info!("applied {} ({}³) to {}", lut_path.display(), lut.size, output.display());
    Ok(())
}
