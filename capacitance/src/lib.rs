//! Stray-capacitance estimation for a wound coil.
//!
//! `om_core::geometry_model::Turn` only carries a centre point, so this
//! crate works against its own [`turn::TurnFootprint`], which a caller
//! derives from the wound geometry plus each winding's wire once. Every
//! formula here is a direct transcription of the cited papers as they
//! appear in the original stray-capacitance implementation: Massarini
//! (1998), the Biela-Kolar review, Duerdoth, and Albach's inductor-design
//! chapter.

pub mod adjacency;
pub mod energy;
pub mod insulation;
pub mod maxwell;
pub mod model;
pub mod turn;
pub mod voltage;

/// The permittivity of free space, in farads per metre.
pub const VACUUM_PERMITTIVITY: f64 = 8.8541878128e-12;

pub use adjacency::surrounding_turns;
pub use energy::{
    capacitance_among_turns, capacitance_among_windings, reference_voltage_rms_per_winding,
    InterWindingCapacitance, SixCapacitorNetwork, TripoleCapacitance,
};
pub use maxwell::{maxwell_capacitance_matrix, ScalarMatrixAtFrequency};
pub use model::{calculate_static_capacitance_between_two_turns, RoundWireModel};
pub use turn::{TurnFootprint, WindingWindowShape};
pub use voltage::{per_turn_voltages, TurnVoltageDivider};
