//! Error type shared by the detector and the peak detector.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(
        "max frequency must exceed min frequency and stay within range; \
         min detectable = {min_detectable:.2} Hz"
    )]
    InvalidFrequencyRange { min_detectable: f64 },

    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f64),

    #[error("tolerance must lie in [0, 1], got {0}")]
    InvalidTolerance(f64),

    #[error("invalid weighting type: {0}; available weighting types: A, B, C, D, CUSTOM, EMPTY")]
    UnknownWeighting(String),

    #[error("invalid weighting curve: {0}")]
    InvalidWeightingCurve(&'static str),

    #[error("min position ({min}) must be less than max position ({max})")]
    InvalidPeakBounds { min: f64, max: f64 },

    #[error("invalid peak order: {0}, must be one of [position, amplitude]")]
    UnknownPeakOrder(String),

    #[error("invalid frame size: expected {expected}, got {actual}")]
    FrameLength { expected: usize, actual: usize },

    #[error("invalid spectrum size: expected {expected}, got {actual}")]
    SpectrumLength { expected: usize, actual: usize },

    #[error("input length should be >= 2, got {0}")]
    InputTooShort(usize),

    #[error("no periodic candidate found in the configured period range")]
    NoPeakInRange,
}

impl Error {
    /// Errors raised while validating a configuration. These never go away on retry.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::InvalidFrequencyRange { .. }
                | Error::InvalidSampleRate(_)
                | Error::InvalidTolerance(_)
                | Error::UnknownWeighting(_)
                | Error::InvalidWeightingCurve(_)
                | Error::InvalidPeakBounds { .. }
                | Error::UnknownPeakOrder(_)
        )
    }

    /// Errors caused by the shape of the data handed to a detection call.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Error::FrameLength { .. } | Error::SpectrumLength { .. } | Error::InputTooShort(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
