//! Color management — sRGB transfer curve and the RGB ↔ CIELAB converter.

pub mod lab;
pub mod transfer;

pub use lab::{lab_to_rgb, lab_to_rgb8, rgb8_to_lab, rgb_to_lab};
