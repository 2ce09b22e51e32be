//! Frame quality signals for the caller-side sampling filter.
//!
//! Candidate frames that are nearly black, blown out, or flat (fades, title
//! cards) skew the color statistics. These helpers measure Rec.709 luma
//! brightness and variance so a caller can drop such frames before analysis.
//! The engine itself never filters.

use serde::{Deserialize, Serialize};

use crate::frame::{self, Frame};

/// Brightness and contrast signal of one frame, on the 8-bit luma scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameQuality {
    /// Mean Rec.709 luma in `0..=255`.
    pub brightness: f64,
    /// Population variance of luma.
    pub variance: f64,
}

impl FrameQuality {
    /// Measure a frame. An empty frame reports zero brightness and variance.
    pub fn measure(frame: &Frame) -> Self {
        let n = frame::pixel_count(frame) as f64;
        if n < 1.0 {
            return Self { brightness: 0.0, variance: 0.0 };
        }

        let mut sum = 0.0_f64;
        let mut sum_sq = 0.0_f64;
        for [r, g, b] in frame::pixels(frame) {
            let luma = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64;
            sum += luma;
            sum_sq += luma * luma;
        }

        let brightness = sum / n;
        let variance = ((sum_sq / n) - brightness * brightness).max(0.0);
        Self { brightness, variance }
    }
}

/// Acceptance window for [`FrameQuality`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Frames darker than this mean luma are rejected.
    pub min_brightness: f64,
    /// Frames brighter than this mean luma are rejected.
    pub max_brightness: f64,
    /// Frames with less luma variance than this are rejected.
    pub min_variance: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_brightness: 20.0,
            max_brightness: 240.0,
            min_variance: 100.0,
        }
    }
}

impl QualityThresholds {
    /// True when the measured frame falls inside the window.
    pub fn accepts(&self, quality: &FrameQuality) -> bool {
        quality.brightness >= self.min_brightness
            && quality.brightness <= self.max_brightness
            && quality.variance >= self.min_variance
    }
}

/// Keep only the frames the thresholds accept, preserving order.
pub fn filter_frames(frames: Vec<Frame>, thresholds: &QualityThresholds) -> Vec<Frame> {
    frames
        .into_iter()
        .enumerate()
        .filter_map(|(index, frame)| {
            let quality = FrameQuality::measure(&frame);
            if thresholds.accepts(&quality) {
                Some(frame)
            } else {
                tracing::debug!(
                    "rejecting frame {index}: brightness {:.1}, variance {:.1}",
                    quality.brightness,
                    quality.variance
                );
                None
            }
        })
        .collect()
}
