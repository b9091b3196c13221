//! Analytical and sampled periodic waveform algebra (C1), and the excitation
//! types that package per-winding voltage/current/magnetising-current
//! signals into an [`OperatingPointExcitation`] (C2).
//!
//! Every waveform here is periodic with period `1/frequency`; phase `0`
//! is the start of the ON-time for pulse-like analytical labels.

#![warn(missing_docs)]

pub mod error;
pub mod excitation;
pub mod fft;
pub mod harmonics;
pub mod label;
pub mod processed;
pub mod waveform;

pub use error::{Error, Result};
pub use excitation::{Conditions, OperatingPoint, OperatingPointExcitation};
pub use harmonics::Harmonics;
pub use label::{AnalyticalParams, WaveformLabel};
pub use processed::Processed;
pub use waveform::{SignalDescriptor, Waveform};
