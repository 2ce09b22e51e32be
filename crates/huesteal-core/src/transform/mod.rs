//! Transform pipeline — lattice construction, color transfer, and LUT output.

pub mod color_transfer;
pub mod lattice;
pub mod lut;
pub mod params;

use crate::analysis::statistics::ColorStatistics;
use crate::error::LutError;
use crate::frame::Frame;
use crate::transform::lattice::Lattice;
use crate::transform::lut::Lut3D;
use crate::transform::params::LutConfig;

/// Analyze frames and bake their color grade into a 3D LUT.
///
/// 1. Pool the Lab statistics of every pixel of every frame
/// 2. Build the identity lattice at `config.resolution`
/// 3. Remap the lattice's native Lab distribution onto the pooled one
/// 4. Convert back to RGB, clamp, and normalize
///
/// Fails only on structurally invalid input: no frames, an empty frame, or a
/// resolution outside `2..=MAX_RESOLUTION`. Flat channels are handled by the
/// transfer fallbacks.
pub fn generate_lut(frames: &[Frame], config: &LutConfig) -> Result<Lut3D, LutError> {
    config.validate()?;
    tracing::debug!(
        "generating {}³ LUT from {} frame(s)",
        config.resolution,
        frames.len()
    );

    let target = ColorStatistics::estimate_frames(frames)?;
    if target.has_degenerate_channel() {
        let flat: Vec<&str> = ["L", "a", "b"]
            .into_iter()
            .zip(&target.channels)
            .filter(|(_, channel)| channel.is_degenerate())
            .map(|(name, _)| name)
            .collect();
        tracing::debug!("flat channel(s) {flat:?}; using fallback transfer");
    }
    generate_lut_from_statistics(&target, config)
}

/// Bake a LUT for already-estimated target statistics.
pub fn generate_lut_from_statistics(
    target: &ColorStatistics,
    config: &LutConfig,
) -> Result<Lut3D, LutError> {
    config.validate()?;
    let lattice = Lattice::identity(config.resolution)?;
    color_transfer::transfer_lattice(&lattice, target, &config.title)
}
