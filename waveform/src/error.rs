//! Error type shared by the waveform algebra and excitation builder.

use thiserror::Error as ThisError;

/// The result type returned by waveform-algebra functions.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, sampling or processing waveforms.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required optional was absent and could not be derived from what
    /// was available (e.g. harmonics requested without a waveform).
    #[error("missing data: {0}")]
    MissingData(String),
    /// A derived quantity violated a precondition, e.g. a duty cycle that
    /// reached or exceeded 1.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
