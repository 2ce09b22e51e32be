//! Identity sample lattice — the domain of the output LUT.

use crate::error::LutError;
use crate::frame::CHANNEL_MAX;
use crate::transform::params::check_resolution;

/// N³ evenly spaced RGB samples over `0..=255` per axis.
///
/// Points are stored red-fastest, blue-slowest: the point at lattice
/// coordinate `(r, g, b)` lives at index `r + N·g + N²·b`, which is also the
/// row order of a `.cube` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    size: usize,
    points: Vec<[f32; 3]>,
}

impl Lattice {
    /// Build the identity lattice for `size` samples per axis
    /// (`2..=MAX_RESOLUTION`).
    pub fn identity(size: usize) -> Result<Self, LutError> {
        check_resolution(size)?;

        let axis: Vec<f32> = (0..size).map(|i| axis_value(i, size)).collect();
        let mut points = Vec::with_capacity(size * size * size);
        for &b in &axis {
            for &g in &axis {
                for &r in &axis {
                    points.push([r, g, b]);
                }
            }
        }

        Ok(Self { size, points })
    }

    /// Samples per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All points in serialization order.
    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    /// Flat index of lattice coordinate `(r, g, b)`.
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        r + self.size * (g + self.size * b)
    }

    /// RGB value at lattice coordinate `(r, g, b)`.
    pub fn point(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.points[self.index(r, g, b)]
    }
}

/// Value of sample `i` on an axis with `size` samples: `i · 255 / (size − 1)`.
pub fn axis_value(i: usize, size: usize) -> f32 {
    (i as f64 * CHANNEL_MAX as f64 / (size - 1) as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rejects_small_sizes() {
        assert!(matches!(Lattice::identity(0), Err(LutError::InvalidResolution(0))));
        assert!(matches!(Lattice::identity(1), Err(LutError::InvalidResolution(1))));
    }

    #[test]
    fn test_identity_rejects_oversized_sizes() {
        assert!(matches!(
            Lattice::identity(3_000_000),
            Err(LutError::InvalidResolution(3_000_000))
        ));
        assert!(matches!(Lattice::identity(usize::MAX), Err(LutError::InvalidResolution(_))));
    }

    #[test]
    fn test_identity_has_cube_point_count_and_range() {
        let lattice = Lattice::identity(33).unwrap();
        assert_eq!(lattice.points().len(), 33 * 33 * 33);
        assert_eq!(lattice.points()[0], [0.0, 0.0, 0.0]);
        assert_eq!(*lattice.points().last().unwrap(), [255.0, 255.0, 255.0]);
    }

    #[test]
    fn test_identity_red_varies_fastest() {
        let lattice = Lattice::identity(3).unwrap();
        assert_eq!(lattice.points()[1], [127.5, 0.0, 0.0]);
        assert_eq!(lattice.points()[3], [0.0, 127.5, 0.0]);
        assert_eq!(lattice.points()[9], [0.0, 0.0, 127.5]);
    }

    #[test]
    fn test_point_matches_identity_formula() {
        let n = 5;
        let lattice = Lattice::identity(n).unwrap();
        for b in 0..n {
            for g in 0..n {
                for r in 0..n {
                    let expected = [r, g, b].map(|i| i as f32 * 255.0 / 4.0);
                    assert_eq!(lattice.point(r, g, b), expected);
                }
            }
        }
    }
}
