//! The OpenMagnetics core data model: the types and traits shared by the
//! converter synthesiser, coil advisor, wire advisor and stray-capacitance
//! engine.
//!
//! This crate defines *what a magnetic design is*; the advisor crates
//! (`converter`, `wire-adviser`, `coil-adviser`, `capacitance`) define *how
//! one is built and evaluated*.

pub mod arena;
pub mod catalogue;
pub mod coil;
pub mod dim;
pub mod error;
pub mod geometry_model;
pub mod inductance_model;
pub mod insulation;
pub mod magnetic;
pub mod requirements;
pub mod settings;
pub mod topology;
pub mod wire;

pub mod prelude {
    //! Re-exports of the most commonly used core types.
    pub use crate::arena::{Arena, Id};
    pub use crate::catalogue::{Catalogue, InMemoryCatalogue};
    pub use crate::coil::{Coil, Winding};
    pub use crate::dim::DimWithTol;
    pub use crate::error::{Error, Result};
    pub use crate::geometry_model::{
        CoilGeometry, Layer, LayerId, Section, SectionId, SectionType, Turn, TurnId, WindingIndex,
    };
    pub use crate::inductance_model::{InductanceModel, InductanceResult, ReluctanceInductanceModel};
    pub use crate::insulation::{InsulationType, WireSolidInsulationRequirements};
    pub use crate::magnetic::{Core, CoreMaterial, CoreShape, CoreShapeFamily, Gap, GapType, Magnetic};
    pub use crate::requirements::{DesignRequirements, InsulationRequirement};
    pub use crate::settings::{CoreLossesModel, Settings, SettingsBuilder, WireKindInclusion};
    pub use crate::topology::{IsolationSide, Topology};
    pub use crate::wire::{ConductorMaterial, Wire, WireKind};
}
