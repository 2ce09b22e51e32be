//! Generation settings shared by the engine and the CLI.

use serde::{Deserialize, Serialize};

use crate::error::LutError;

/// Canonical lattice resolution used by most grading tools.
pub const DEFAULT_RESOLUTION: usize = 33;

/// Largest lattice resolution accepted anywhere in the crate. 256³ entries
/// is well past what grading tools load (65 is the usual ceiling).
pub const MAX_RESOLUTION: usize = 256;

/// Default `.cube` title.
pub const DEFAULT_TITLE: &str = "Generated by huesteal";

/// Parameters for one LUT generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LutConfig {
    /// Samples per lattice axis, in `2..=MAX_RESOLUTION`.
    pub resolution: usize,
    /// Title written into the `.cube` header.
    pub title: String,
}

impl Default for LutConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl LutConfig {
    /// Config with a given resolution and the default title.
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Check the settings before any work is done.
    pub fn validate(&self) -> Result<(), LutError> {
        check_resolution(self.resolution)
    }
}

/// Reject resolutions outside `2..=MAX_RESOLUTION`.
pub fn check_resolution(resolution: usize) -> Result<(), LutError> {
    if !(2..=MAX_RESOLUTION).contains(&resolution) {
        return Err(LutError::InvalidResolution(resolution));
    }
    Ok(())
}
