//! Frame analysis — CIELAB moment estimation and frame quality signals.

pub mod quality;
pub mod statistics;

pub use quality::{FrameQuality, QualityThresholds, filter_frames};
pub use statistics::{ChannelStatistics, ColorStatistics, Moments};
