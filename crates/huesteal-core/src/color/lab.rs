//! RGB ↔ CIELAB conversion.
//!
//! RGB is 8-bit-scaled sRGB (`0.0..=255.0`). Lab uses D65 with L in `0..100`
//! and signed a/b. The path is always
//! sRGB → linear RGB → XYZ → Lab, and the exact reverse.
//!
//! Conversions are unclamped: Lab values produced by a remap can land outside
//! the sRGB gamut, and the caller decides how to clamp.

use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{Lab, LinSrgb};
use rayon::prelude::*;

use crate::color::transfer::{SrgbTransfer, TransferFunction};
use crate::frame::{CHANNEL_MAX, quantize};

/// Convert an sRGB triple (0..255 scale) to CIELAB `[L, a, b]`.
pub fn rgb_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let tf = SrgbTransfer;
    let linear = LinSrgb::new(
        tf.to_linear(rgb[0] / CHANNEL_MAX),
        tf.to_linear(rgb[1] / CHANNEL_MAX),
        tf.to_linear(rgb[2] / CHANNEL_MAX),
    );
    let lab = Lab::<D65, f32>::from_color_unclamped(linear);
    [lab.l, lab.a, lab.b]
}

/// Convert an 8-bit sRGB triple to CIELAB.
pub fn rgb8_to_lab(rgb: [u8; 3]) -> [f32; 3] {
    rgb_to_lab([rgb[0] as f32, rgb[1] as f32, rgb[2] as f32])
}

/// Convert CIELAB back to sRGB on the 0..255 scale, without clamping.
pub fn lab_to_rgb(lab: [f32; 3]) -> [f32; 3] {
    let tf = SrgbTransfer;
    let linear = LinSrgb::<f32>::from_color_unclamped(Lab::<D65, f32>::new(lab[0], lab[1], lab[2]));
    [
        tf.to_encoded(linear.red) * CHANNEL_MAX,
        tf.to_encoded(linear.green) * CHANNEL_MAX,
        tf.to_encoded(linear.blue) * CHANNEL_MAX,
    ]
}

/// Convert CIELAB to a clamped, rounded 8-bit sRGB triple.
pub fn lab_to_rgb8(lab: [f32; 3]) -> [u8; 3] {
    let rgb = lab_to_rgb(lab);
    [quantize(rgb[0]), quantize(rgb[1]), quantize(rgb[2])]
}

/// Convert a batch of RGB triples to Lab. Output order matches input order.
pub fn rgb_batch_to_lab(rgb: &[[f32; 3]]) -> Vec<[f32; 3]> {
    rgb.par_iter().map(|&px| rgb_to_lab(px)).collect()
}

/// Convert a batch of Lab triples to unclamped RGB. Output order matches input order.
pub fn lab_batch_to_rgb(lab: &[[f32; 3]]) -> Vec<[f32; 3]> {
    lab.par_iter().map(|&px| lab_to_rgb(px)).collect()
}
