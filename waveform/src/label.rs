//! Analytical waveform labels and their shape parameters.

use serde::{Deserialize, Serialize};

/// The recognised analytical waveform shapes.
///
/// One period, phase `0` is the start of the ON-interval. See the
/// per-variant parameter documentation in [`AnalyticalParams`] for the
/// closed-form piecewise definition of each shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum WaveformLabel {
    /// High for `D/f`, low for `(1-D)/f`.
    Rectangular,
    /// High for `D/f`, low for `(1-D)/f - Δ`, zero for `Δ`.
    RectangularWithDeadtime,
    /// Inverted phase of [`Self::Rectangular`] for a reflected secondary.
    SecondaryRectangular,
    /// Inverted phase of [`Self::RectangularWithDeadtime`].
    SecondaryRectangularWithDeadtime,
    /// Piecewise linear with a slope change at `t = D/f`.
    Triangular,
    /// Triangle completes before the dead-time, then zero.
    TriangularWithDeadtime,
    /// Ramp from `offset` to `offset+Ipp` over `D/f`, then zero.
    FlybackPrimary,
    /// [`Self::FlybackPrimary`] with an explicit dead-time segment.
    FlybackPrimaryWithDeadtime,
    /// Ramp down from `offset+Ipp` to `offset` during OFF, zero otherwise.
    FlybackSecondary,
    /// [`Self::FlybackSecondary`] with an explicit dead-time segment.
    FlybackSecondaryWithDeadtime,
    /// `offset + amp·sin(2πft)`.
    Sinusoidal,
}

/// The shape parameters of an analytical waveform. Every variant's fields
/// correspond exactly to the parameter list for that label's shape.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalyticalParams {
    /// `RECTANGULAR(Vpp, D, offset)`.
    Rectangular { vpp: f64, duty_cycle: f64, offset: f64 },
    /// `RECTANGULAR_WITH_DEADTIME(Vpp, D, offset, Δ)`.
    RectangularWithDeadtime {
        vpp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `SECONDARY_RECTANGULAR(Vpp, D, offset, Δ)`.
    SecondaryRectangular {
        vpp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `SECONDARY_RECTANGULAR_WITH_DEADTIME(Vpp, D, offset, Δ)`.
    SecondaryRectangularWithDeadtime {
        vpp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `TRIANGULAR(Ipp, D, offset)`.
    Triangular { ipp: f64, duty_cycle: f64, offset: f64 },
    /// `TRIANGULAR_WITH_DEADTIME(Ipp, D, offset, Δ)`.
    TriangularWithDeadtime {
        ipp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `FLYBACK_PRIMARY(Ipp, D, offset, Δ)`.
    FlybackPrimary {
        ipp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `FLYBACK_PRIMARY_WITH_DEADTIME(Ipp, D, offset, Δ)`.
    FlybackPrimaryWithDeadtime {
        ipp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `FLYBACK_SECONDARY(Ipp, D, offset, Δ)`.
    FlybackSecondary {
        ipp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `FLYBACK_SECONDARY_WITH_DEADTIME(Ipp, D, offset, Δ)`.
    FlybackSecondaryWithDeadtime {
        ipp: f64,
        duty_cycle: f64,
        offset: f64,
        deadtime: f64,
    },
    /// `SINUSOIDAL(amp, offset)`.
    Sinusoidal { amplitude: f64, offset: f64 },
}

impl AnalyticalParams {
    /// Returns the [`WaveformLabel`] this set of parameters belongs to.
    pub fn label(&self) -> WaveformLabel {
        match self {
            AnalyticalParams::Rectangular { .. } => WaveformLabel::Rectangular,
            AnalyticalParams::RectangularWithDeadtime { .. } => {
                WaveformLabel::RectangularWithDeadtime
            }
            AnalyticalParams::SecondaryRectangular { .. } => WaveformLabel::SecondaryRectangular,
            AnalyticalParams::SecondaryRectangularWithDeadtime { .. } => {
                WaveformLabel::SecondaryRectangularWithDeadtime
            }
            AnalyticalParams::Triangular { .. } => WaveformLabel::Triangular,
            AnalyticalParams::TriangularWithDeadtime { .. } => {
                WaveformLabel::TriangularWithDeadtime
            }
            AnalyticalParams::FlybackPrimary { .. } => WaveformLabel::FlybackPrimary,
            AnalyticalParams::FlybackPrimaryWithDeadtime { .. } => {
                WaveformLabel::FlybackPrimaryWithDeadtime
            }
            AnalyticalParams::FlybackSecondary { .. } => WaveformLabel::FlybackSecondary,
            AnalyticalParams::FlybackSecondaryWithDeadtime { .. } => {
                WaveformLabel::FlybackSecondaryWithDeadtime
            }
            AnalyticalParams::Sinusoidal { .. } => WaveformLabel::Sinusoidal,
        }
    }
}
