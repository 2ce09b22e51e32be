//! Error types for LUT generation and `.cube` I/O.

/// Failures surfaced by the engine.
///
/// Numeric edge cases (flat channels, out-of-gamut results) are resolved
/// internally and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum LutError {
    /// No frames were supplied to the estimator.
    #[error("cannot analyze: no input frames")]
    NoFrames,
    /// A supplied frame has zero pixels.
    #[error("cannot analyze: frame {index} has no pixels")]
    EmptyFrame { index: usize },
    /// The lattice needs at least two samples per axis.
    #[error("LUT resolution must be at least 2, got {0}")]
    InvalidResolution(usize),
    /// The sink handed to the serializer failed.
    #[error("LUT I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A `.cube` document could not be parsed.
    #[error("invalid .cube data at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl LutError {
    /// True for the "no data to analyze" family of failures.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::NoFrames | Self::EmptyFrame { .. })
    }
}
