//! Per-channel mean and standard deviation in CIELAB.
//!
//! Frames are reduced to [`Moments`] (count, mean, sum of squared deviations)
//! and merged as one pooled population, so a multi-frame estimate equals the
//! estimate over the concatenation of every sampled pixel. Averaging per-frame
//! standard deviations instead would drop the spread *between* frames.
//!
//! # Reference
//! - Welford (1962) — single-pass running variance
//! - Chan, Golub, LeVeque (1979) — pairwise merge of partial moments

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::lab::rgb8_to_lab;
use crate::error::LutError;
use crate::frame::{self, Frame};

/// Standard deviations at or below this (in Lab units) are treated as a flat
/// channel. Sits well above the f32 noise that neutral grays pick up on a/b.
pub const DEGENERATE_STD_EPSILON: f64 = 1e-3;

/// Partial first and second moments of a Lab sample population.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    /// Number of samples.
    pub count: u64,
    /// Running per-channel mean `[L, a, b]`.
    pub mean: [f64; 3],
    /// Per-channel sum of squared deviations from `mean`.
    pub m2: [f64; 3],
}

impl Moments {
    /// Accumulate moments over Lab samples, in iteration order.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut moments = Self::default();
        for sample in samples {
            moments.push(sample);
        }
        moments
    }

    /// Convert every pixel of a frame to Lab and accumulate its moments.
    pub fn from_frame(frame: &Frame) -> Self {
        Self::from_samples(frame::pixels(frame).map(rgb8_to_lab))
    }

    /// Add one Lab sample.
    pub fn push(&mut self, sample: [f32; 3]) {
        self.count += 1;
        let n = self.count as f64;
        for c in 0..3 {
            let x = sample[c] as f64;
            let delta = x - self.mean[c];
            self.mean[c] += delta / n;
            self.m2[c] += delta * (x - self.mean[c]);
        }
    }

    /// Combine two partial populations into the moments of their union.
    pub fn merge(self, other: Self) -> Self {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }

        let count = self.count + other.count;
        let (na, nb, n) = (self.count as f64, other.count as f64, count as f64);
        let mut mean = [0.0_f64; 3];
        let mut m2 = [0.0_f64; 3];
        for c in 0..3 {
            let delta = other.mean[c] - self.mean[c];
            mean[c] = self.mean[c] + delta * nb / n;
            m2[c] = self.m2[c] + other.m2[c] + delta * delta * na * nb / n;
        }

        Self { count, mean, m2 }
    }

    /// Population variance per channel. Zero for an empty population.
    pub fn variance(&self) -> [f64; 3] {
        if self.count == 0 {
            return [0.0; 3];
        }
        let n = self.count as f64;
        // Rounding can leave m2 a hair below zero.
        self.m2.map(|m2| (m2 / n).max(0.0))
    }
}

/// Mean and spread of one Lab channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    /// Channel mean.
    pub mean: f64,
    /// Population standard deviation, or `None` when the channel is flat.
    pub std_dev: Option<f64>,
}

impl ChannelStatistics {
    /// Build channel statistics, marking near-zero spreads as degenerate.
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev: (std_dev > DEGENERATE_STD_EPSILON).then_some(std_dev),
        }
    }

    /// True when the channel has no usable spread.
    pub fn is_degenerate(&self) -> bool {
        self.std_dev.is_none()
    }

    /// Standard deviation with flat channels reported as `0.0`.
    pub fn spread(&self) -> f64 {
        self.std_dev.unwrap_or(0.0)
    }
}

/// Per-channel Lab statistics `[L, a, b]` of a frame or frame set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStatistics {
    /// Lightness, green-red, and blue-yellow channels in that order.
    pub channels: [ChannelStatistics; 3],
}

impl ColorStatistics {
    /// Finalize accumulated moments. `None` for an empty population.
    pub fn from_moments(moments: &Moments) -> Option<Self> {
        if moments.count == 0 {
            return None;
        }
        let variance = moments.variance();
        let channels =
            std::array::from_fn(|c| ChannelStatistics::new(moments.mean[c], variance[c].sqrt()));
        Some(Self { channels })
    }

    /// Statistics of a single frame.
    pub fn estimate_frame(frame: &Frame) -> Result<Self, LutError> {
        Self::estimate_frames(std::slice::from_ref(frame))
    }

    /// Pooled statistics over every pixel of every frame.
    ///
    /// Per-frame moments are computed in parallel and merged in input order,
    /// so the result does not depend on thread scheduling.
    pub fn estimate_frames(frames: &[Frame]) -> Result<Self, LutError> {
        if frames.is_empty() {
            return Err(LutError::NoFrames);
        }
        if let Some(index) = frames.iter().position(|f| frame::pixel_count(f) == 0) {
            return Err(LutError::EmptyFrame { index });
        }

        let per_frame: Vec<Moments> = frames.par_iter().map(Moments::from_frame).collect();
        let pooled = per_frame.into_iter().fold(Moments::default(), Moments::merge);

        Self::from_moments(&pooled).ok_or(LutError::NoFrames)
    }

    /// Statistics over Lab samples that are already converted, e.g. a lattice.
    pub fn estimate_samples(samples: &[[f32; 3]]) -> Option<Self> {
        Self::from_moments(&Moments::from_samples(samples.iter().copied()))
    }

    /// Lightness channel.
    pub fn lightness(&self) -> &ChannelStatistics {
        &self.channels[0]
    }

    /// True when any channel is flat.
    pub fn has_degenerate_channel(&self) -> bool {
        self.channels.iter().any(ChannelStatistics::is_degenerate)
    }
}
