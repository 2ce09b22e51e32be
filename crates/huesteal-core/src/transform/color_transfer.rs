//! Statistical color transfer in CIELAB (Reinhard et al. 2001).
//!
//! Each Lab channel of the lattice is re-centered and rescaled from its own
//! native distribution onto the analyzed footage's distribution:
//!
//! ```text
//! v' = (v − source_mean) / source_std × target_std + target_mean
//! ```
//!
//! Flat channels fall back instead of dividing by zero:
//! - target flat → every sample collapses to `target_mean`
//! - source flat → pure shift, `v − source_mean + target_mean`
//!
//! After the remap the result goes back to RGB and is clamped; Lab remaps
//! routinely leave the sRGB gamut.

use rayon::prelude::*;

use crate::analysis::statistics::{ChannelStatistics, ColorStatistics};
use crate::color::lab::{lab_to_rgb, rgb_batch_to_lab};
use crate::error::LutError;
use crate::frame::{CHANNEL_MAX, clamp_channel};
use crate::transform::lattice::Lattice;
use crate::transform::lut::Lut3D;

/// A per-channel affine remap from one Lab distribution onto another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransfer {
    /// Native distribution of the samples being remapped.
    pub source: ColorStatistics,
    /// Distribution to reproduce.
    pub target: ColorStatistics,
}

impl ColorTransfer {
    pub fn new(source: ColorStatistics, target: ColorStatistics) -> Self {
        Self { source, target }
    }

    /// Remap one value of Lab channel `channel` (0 = L, 1 = a, 2 = b).
    pub fn remap_channel(&self, channel: usize, value: f32) -> f32 {
        remap(&self.source.channels[channel], &self.target.channels[channel], value as f64) as f32
    }

    /// Remap a Lab triple.
    pub fn remap_lab(&self, lab: [f32; 3]) -> [f32; 3] {
        std::array::from_fn(|c| self.remap_channel(c, lab[c]))
    }
}

fn remap(source: &ChannelStatistics, target: &ChannelStatistics, value: f64) -> f64 {
    match (source.std_dev, target.std_dev) {
        (_, None) => target.mean,
        (None, Some(_)) => value - source.mean + target.mean,
        (Some(src_std), Some(dst_std)) => (value - source.mean) / src_std * dst_std + target.mean,
    }
}

/// Native Lab statistics of a lattice's own samples.
pub fn lattice_statistics(
    lab_points: &[[f32; 3]],
    size: usize,
) -> Result<ColorStatistics, LutError> {
    ColorStatistics::estimate_samples(lab_points).ok_or(LutError::InvalidResolution(size))
}

/// Transform every lattice point so the lattice's native distribution
/// matches `target`, and package the result as a LUT.
///
/// Output values are normalized to `[0, 1]`; lattice order is preserved.
pub fn transfer_lattice(
    lattice: &Lattice,
    target: &ColorStatistics,
    title: &str,
) -> Result<Lut3D, LutError> {
    let lab_points = rgb_batch_to_lab(lattice.points());
    let source = lattice_statistics(&lab_points, lattice.size())?;
    let transfer = ColorTransfer::new(source, *target);

    let data: Vec<[f32; 3]> = lab_points
        .par_iter()
        .map(|&lab| lab_to_rgb(transfer.remap_lab(lab)).map(|v| clamp_channel(v) / CHANNEL_MAX))
        .collect();

    Ok(Lut3D::new(title, lattice.size(), data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::statistics::Moments;

    fn stats(channels: [(f64, f64); 3]) -> ColorStatistics {
        ColorStatistics {
            channels: channels.map(|(mean, std)| ChannelStatistics::new(mean, std)),
        }
    }

    fn native(size: usize) -> (Lattice, Vec<[f32; 3]>, ColorStatistics) {
        let lattice = Lattice::identity(size).unwrap();
        let lab = rgb_batch_to_lab(lattice.points());
        let source = lattice_statistics(&lab, size).unwrap();
        (lattice, lab, source)
    }

    #[test]
    fn test_identity_transfer_leaves_lattice_unchanged() {
        let (lattice, _, source) = native(9);
        let lut = transfer_lattice(&lattice, &source, "identity").unwrap();
        for (point, value) in lattice.points().iter().zip(&lut.data) {
            for c in 0..3 {
                let expected = point[c] / 255.0;
                assert!(
                    (value[c] - expected).abs() < 1e-3,
                    "point {point:?} moved to {value:?}"
                );
            }
        }
    }

    #[test]
    fn test_remap_affine_formula() {
        let transfer = ColorTransfer::new(
            stats([(50.0, 10.0), (0.0, 20.0), (5.0, 2.0)]),
            stats([(40.0, 5.0), (10.0, 40.0), (-5.0, 1.0)]),
        );
        assert!((transfer.remap_channel(0, 60.0) - 45.0).abs() < 1e-5);
        assert!((transfer.remap_channel(1, -20.0) - (-30.0)).abs() < 1e-5);
        assert!((transfer.remap_channel(2, 9.0) - (-3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_flat_target_collapses_channel_to_mean() {
        let transfer = ColorTransfer::new(
            stats([(50.0, 10.0), (0.0, 20.0), (0.0, 20.0)]),
            stats([(70.0, 0.0), (0.0, 20.0), (0.0, 20.0)]),
        );
        for v in [0.0, 33.0, 100.0] {
            assert_eq!(transfer.remap_channel(0, v), 70.0);
        }
    }

    #[test]
    fn test_flat_source_shifts_without_rescale() {
        let transfer = ColorTransfer::new(
            stats([(50.0, 0.0), (0.0, 20.0), (0.0, 20.0)]),
            stats([(60.0, 30.0), (0.0, 20.0), (0.0, 20.0)]),
        );
        assert!((transfer.remap_channel(0, 45.0) - 55.0).abs() < 1e-5);
    }

    #[test]
    fn test_flat_channels_never_produce_non_finite_output() {
        let (lattice, _, _) = native(5);
        let targets = [
            stats([(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]),
            stats([(100.0, 0.0), (80.0, 0.0), (-80.0, 0.0)]),
            stats([(50.0, 0.0), (0.0, 30.0), (0.0, 0.0)]),
        ];
        for target in targets {
            let lut = transfer_lattice(&lattice, &target, "flat").unwrap();
            for value in &lut.data {
                assert!(
                    value.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)),
                    "{value:?}"
                );
            }
        }
    }

    #[test]
    fn test_fully_flat_target_produces_single_color() {
        let (lattice, _, _) = native(4);
        let target =
            ColorStatistics::from_moments(&Moments::from_samples([[60.0, 10.0, 20.0]])).unwrap();
        let lut = transfer_lattice(&lattice, &target, "flat").unwrap();
        let first = lut.data[0];
        assert!(lut.data.iter().all(|v| *v == first));
    }

    #[test]
    fn test_larger_target_std_strictly_widens_spread() {
        let (_, lab, source) = native(9);
        let spread_for = |channel: usize, target_std: f64| {
            let mut channels = source.channels.map(|c| (c.mean, c.spread()));
            channels[channel].1 = target_std;
            let transfer = ColorTransfer::new(source, stats(channels));
            let values: Vec<f32> = lab.iter().map(|&p| transfer.remap_lab(p)[channel]).collect();
            let max = values.iter().cloned().fold(f32::MIN, f32::max);
            let min = values.iter().cloned().fold(f32::MAX, f32::min);
            max - min
        };
        for channel in 0..3 {
            let spreads: Vec<f32> =
                [2.0, 8.0, 20.0, 45.0].iter().map(|&s| spread_for(channel, s)).collect();
            assert!(spreads.windows(2).all(|w| w[1] > w[0]), "channel {channel}: {spreads:?}");
        }
    }

    #[test]
    fn test_out_of_gamut_results_are_clamped() {
        let (lattice, _, source) = native(5);
        let mut target = source;
        target.channels[1].mean += 120.0;
        let lut = transfer_lattice(&lattice, &target, "push red").unwrap();

        assert!(lut.data.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
        // Pure red pushed further along +a saturates the red channel.
        assert_eq!(lut.data[lattice.index(4, 0, 0)][0], 1.0);
    }
}
