//! Frame representation and the 8-bit conversion rules shared by the engine.
//!
//! Every float → 8-bit conversion in the crate goes through [`quantize`], and
//! every out-of-range float channel is limited with [`clamp_channel`].

/// A decoded video frame: 8-bit RGB, row-major, `width × height × 3` bytes.
pub type Frame = image::RgbImage;

/// Largest 8-bit channel value as a float.
pub const CHANNEL_MAX: f32 = 255.0;

/// Number of pixels in a frame.
pub fn pixel_count(frame: &Frame) -> usize {
    frame.width() as usize * frame.height() as usize
}

/// Iterate the RGB triples of a frame in row-major order.
pub fn pixels(frame: &Frame) -> impl Iterator<Item = [u8; 3]> + '_ {
    frame.as_raw().chunks_exact(3).map(|px| [px[0], px[1], px[2]])
}

/// Limit a channel value to `[0, 255]`. NaN and negative zero map to `0.0`.
pub fn clamp_channel(value: f32) -> f32 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.min(CHANNEL_MAX)
    }
}

/// Convert a channel value to 8 bits: clamp, then round half away from zero.
pub fn quantize(value: f32) -> u8 {
    clamp_channel(value).round() as u8
}
