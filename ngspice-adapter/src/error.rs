//! Errors raised while building netlists, invoking the external transient
//! solver, and parsing its output.

use thiserror::Error as ThisError;

/// The result type returned by this crate's functions.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the ngspice adapter.
///
/// Every variant converts into [`om_core::error::Error::SimulatorFailure`]
/// at the boundary where this crate hands results back to a converter or
/// coil-advisor caller.
#[derive(ThisError, Debug)]
pub enum Error {
    /// I/O error writing the netlist or run script, or reading the solver's
    /// output file.
    #[error("io error")]
    Io(#[from] std::io::Error),
    /// The run-script template failed to render.
    #[error("template error")]
    Template(#[from] tera::Error),
    /// The `ngspice` binary could not be located or is not executable.
    #[error("ngspice binary not available")]
    NotAvailable,
    /// `ngspice` exited with a non-zero status, or was killed after its
    /// timeout elapsed.
    #[error("ngspice run failed: {0}")]
    RunFailed(String),
    /// The solver's ASCII rawfile output could not be parsed.
    #[error("error parsing rawfile output: {0}")]
    RawfileParse(String),
    /// A waveform-name mapping referenced a signal the solver did not
    /// report.
    #[error("signal {0:?} not present in simulation output")]
    MissingSignal(String),
}

impl From<Error> for om_core::error::Error {
    fn from(value: Error) -> Self {
        om_core::error::Error::SimulatorFailure(value.to_string())
    }
}
