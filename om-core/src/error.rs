//! The closed set of errors raised by the OpenMagnetics core and advisors.

use thiserror::Error as ThisError;

/// The result type returned by OpenMagnetics core functions.
pub type Result<T> = std::result::Result<T, Error>;

/// The error kinds raised across the OpenMagnetics workspace.
///
/// This set is intentionally closed: new failure modes should be expressed
/// as a new variant's message, not by introducing a parallel hierarchy.
#[derive(ThisError, Debug, Clone)]
pub enum Error {
    /// A required optional field was absent and could not be derived.
    #[error("missing data: {0}")]
    MissingData(String),
    /// The supplied design requirements are internally inconsistent.
    #[error("invalid design requirements: {0}")]
    InvalidDesignRequirements(String),
    /// A derived quantity violated a precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A geometric invariant was violated: collision, negative dimension,
    /// or a turn placed outside the winding window.
    #[error("geometry error: {0}")]
    Geometry(String),
    /// The external transient solver returned a non-success status.
    #[error("simulator failure: {0}")]
    SimulatorFailure(String),
    /// An unexpected branch was reached (e.g. an unsupported wire-type
    /// combination for a capacitance model).
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<waveform::Error> for Error {
    fn from(value: waveform::Error) -> Self {
        match value {
            waveform::Error::MissingData(message) => Error::MissingData(message),
            waveform::Error::InvalidInput(message) => Error::InvalidInput(message),
        }
    }
}
