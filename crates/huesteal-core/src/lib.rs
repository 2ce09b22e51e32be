//! Huesteal Core — color-statistics transfer engine.
//!
//! Analyzes decoded RGB frames in CIELAB, fits a mean/variance color model,
//! and bakes it into a 3D LUT that reproduces the grade on other footage.
//! No video decoding, storage, or GPU dependencies.

pub mod analysis;
pub mod color;
pub mod error;
pub mod frame;
pub mod transform;

// Re-exports for convenience.
pub use analysis::quality::{FrameQuality, QualityThresholds};
pub use analysis::statistics::{ChannelStatistics, ColorStatistics, Moments};
pub use error::LutError;
pub use frame::Frame;
pub use transform::lattice::Lattice;
pub use transform::lut::Lut3D;
pub use transform::params::LutConfig;
pub use transform::{generate_lut, generate_lut_from_statistics};
