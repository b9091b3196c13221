//! Wire types: round, rectangular, foil, planar and litz conductors.

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

/// The conductor-material properties needed to evaluate AC behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConductorMaterial {
    /// Electrical resistivity at 20 °C, in ohm-metres.
    pub resistivity_20c: f64,
    /// Linear temperature coefficient of resistivity, per degree Celsius.
    pub temperature_coefficient: f64,
    /// Relative permeability of the conductor (1.0 for copper/aluminium).
    pub relative_permeability: f64,
}

impl ConductorMaterial {
    /// Annealed copper at 20 °C.
    pub const COPPER: ConductorMaterial = ConductorMaterial {
        resistivity_20c: 1.724e-8,
        temperature_coefficient: 0.00393,
        relative_permeability: 1.0,
    };

    /// Resistivity at `temperature_celsius`, from the linear model
    /// `ρ(T) = ρ₂₀·(1 + α·(T - 20))`.
    pub fn resistivity_at(&self, temperature_celsius: f64) -> f64 {
        self.resistivity_20c * (1.0 + self.temperature_coefficient * (temperature_celsius - 20.0))
    }
}

/// A round magnet wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundWire {
    /// The bare conductor diameter, in metres.
    pub conducting_diameter: f64,
    /// The diameter including insulation coating, in metres.
    pub outer_diameter: f64,
    /// The insulation coating grade (1, 2 or 3).
    pub grade: u8,
}

/// A rectangular magnet wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularWire {
    /// Bare conductor width, in metres.
    pub width: f64,
    /// Bare conductor height, in metres.
    pub height: f64,
    /// Width including insulation, in metres.
    pub outer_width: f64,
    /// Height including insulation, in metres.
    pub outer_height: f64,
    /// The insulation coating grade (1, 2 or 3).
    pub grade: u8,
}

/// A foil conductor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoilWire {
    /// Bare conductor width (the dimension spanning the winding window), in
    /// metres.
    pub width: f64,
    /// Bare conductor thickness, in metres.
    pub height: f64,
    /// Insulation coating thickness, in metres, applied to both faces.
    pub coating_thickness: f64,
}

/// A planar (PCB-trace-like) conductor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarWire {
    /// Bare conductor width, in metres.
    pub width: f64,
    /// Bare conductor thickness, in metres.
    pub height: f64,
    /// Relative permittivity of the surrounding dielectric.
    pub dielectric_relative_permittivity: f64,
}

/// A litz bundle of insulated round strands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitzWire {
    /// The individual strand, itself a round wire.
    pub strand_wire: RoundWire,
    /// The number of strands bundled together.
    pub number_strands: usize,
    /// The outer diameter of the served bundle, in metres.
    pub outer_diameter: f64,
}

/// The tagged variants of a wire's cross-section, dispatched exhaustively
/// rather than by runtime type check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireKind {
    /// A round magnet wire.
    Round(RoundWire),
    /// A rectangular magnet wire.
    Rectangular(RectangularWire),
    /// A foil conductor.
    Foil(FoilWire),
    /// A planar conductor.
    Planar(PlanarWire),
    /// A litz bundle.
    Litz(LitzWire),
}

/// A candidate wire: its cross-section plus the shared properties every
/// kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    /// The catalogue name of this wire.
    pub name: ArcStr,
    /// The cross-section and type-specific dimensions.
    pub kind: WireKind,
    /// The conductor material.
    pub material: ConductorMaterial,
    /// Insulation coating relative permittivity (used by the stray
    /// capacitance engine).
    pub coating_relative_permittivity: f64,
}

impl Wire {
    /// The widest conducting (bare-metal) dimension perpendicular to the
    /// winding axis.
    pub fn maximum_conducting_width(&self) -> f64 {
        match &self.kind {
            WireKind::Round(r) => r.conducting_diameter,
            WireKind::Rectangular(r) => r.width,
            WireKind::Foil(f) => f.width,
            WireKind::Planar(p) => p.width,
            WireKind::Litz(l) => l.outer_diameter,
        }
    }

    /// The widest conducting (bare-metal) dimension along the winding axis.
    pub fn maximum_conducting_height(&self) -> f64 {
        match &self.kind {
            WireKind::Round(r) => r.conducting_diameter,
            WireKind::Rectangular(r) => r.height,
            WireKind::Foil(f) => f.height,
            WireKind::Planar(p) => p.height,
            WireKind::Litz(l) => l.outer_diameter,
        }
    }

    /// The widest overall (insulated) dimension perpendicular to the
    /// winding axis.
    pub fn maximum_outer_width(&self) -> f64 {
        match &self.kind {
            WireKind::Round(r) => r.outer_diameter,
            WireKind::Rectangular(r) => r.outer_width,
            WireKind::Foil(f) => f.width + 2.0 * f.coating_thickness,
            WireKind::Planar(p) => p.width,
            WireKind::Litz(l) => l.outer_diameter,
        }
    }

    /// The widest overall (insulated) dimension along the winding axis.
    pub fn maximum_outer_height(&self) -> f64 {
        match &self.kind {
            WireKind::Round(r) => r.outer_diameter,
            WireKind::Rectangular(r) => r.outer_height,
            WireKind::Foil(f) => f.height + 2.0 * f.coating_thickness,
            WireKind::Planar(p) => p.height,
            WireKind::Litz(l) => l.outer_diameter,
        }
    }

    /// The insulation coating thickness, where defined.
    pub fn coating_thickness(&self) -> f64 {
        match &self.kind {
            WireKind::Round(r) => (r.outer_diameter - r.conducting_diameter) / 2.0,
            WireKind::Rectangular(r) => (r.outer_width - r.width) / 2.0,
            WireKind::Foil(f) => f.coating_thickness,
            WireKind::Planar(_) => 0.0,
            WireKind::Litz(l) => (l.outer_diameter - l.strand_wire.outer_diameter) / 2.0,
        }
    }

    /// The magnet-wire coating grade, where defined (litz bundles report
    /// their strand's grade).
    pub fn grade(&self) -> u8 {
        match &self.kind {
            WireKind::Round(r) => r.grade,
            WireKind::Rectangular(r) => r.grade,
            WireKind::Foil(_) | WireKind::Planar(_) => 1,
            WireKind::Litz(l) => l.strand_wire.grade,
        }
    }

    /// The bare conducting cross-sectional area, in square metres.
    pub fn conducting_area(&self) -> f64 {
        match &self.kind {
            WireKind::Round(r) => std::f64::consts::PI * (r.conducting_diameter / 2.0).powi(2),
            WireKind::Rectangular(r) => r.width * r.height,
            WireKind::Foil(f) => f.width * f.height,
            WireKind::Planar(p) => p.width * p.height,
            WireKind::Litz(l) => {
                l.number_strands as f64
                    * std::f64::consts::PI
                    * (l.strand_wire.conducting_diameter / 2.0).powi(2)
            }
        }
    }
}
