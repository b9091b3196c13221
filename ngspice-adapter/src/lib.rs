//! The circuit-simulator adapter: SPICE netlist
//! generation for a `(topology, magnetic, operating point)`, an external
//! transient-solver contract (`NgspiceRunner`), and the waveform-name
//! mapping that turns a solver's named series back into C2 excitations.
//!
//! Grounded on `ucb-substrate-substrate2`'s `tools/ngspice` crate: the
//! `thiserror` error shape, the tera-templated run script shelled out via
//! `/bin/bash`, and per-call `tempfile::TempDir` isolation for concurrent
//! invocations.

#![warn(missing_docs)]

pub mod error;
pub mod mapping;
pub mod netlist;
pub mod rawfile;
pub mod runner;
mod templates;

pub use error::{Error, Result};
pub use mapping::{to_operating_point, WaveformNameMapping};
pub use netlist::{build_netlist, NetlistRequest, OutputSpec};
pub use runner::{FakeNgspiceRunner, NgspiceRunner, ShellNgspiceRunner, SimulationConfig, SimulationResult};
