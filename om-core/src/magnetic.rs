//! Cores, core catalogue entries and the top-level `Magnetic` that pairs a
//! core with a wound coil.

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::coil::Coil;

/// The manufacturing family a [`CoreShape`] belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CoreShapeFamily {
    /// Pot-like double-E core (EE, ETD, EFD, EQ, ER, EP...).
    E,
    /// Pot core with a fully enclosed winding window.
    Pot,
    /// Planar E/EQ core (shallow height-to-width ratio).
    Planar,
    /// Toroidal (ring) core.
    Toroidal,
    /// U- or UI-shaped core.
    U,
}

/// A core-shape catalogue entry: the geometric family and the derived
/// quantities needed to evaluate magnetising inductance and winding-window
/// capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreShape {
    /// The catalogue name, e.g. `"ETD 34"`.
    pub name: ArcStr,
    /// The manufacturing family.
    pub family: CoreShapeFamily,
    /// Effective magnetic cross-sectional area, in square metres.
    pub effective_area: f64,
    /// Effective magnetic path length, in metres.
    pub effective_length: f64,
    /// Effective magnetic volume, in cubic metres.
    pub effective_volume: f64,
    /// The winding window's width (radial extent for E/pot cores, the
    /// dimension perpendicular to the threading axis for toroids), in
    /// metres.
    pub window_width: f64,
    /// The winding window's height (axial extent), in metres.
    pub window_height: f64,
}

/// A core-material catalogue entry: the permeability and loss properties
/// needed to evaluate saturation margin and core loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreMaterial {
    /// The catalogue name, e.g. `"3C97"`.
    pub name: ArcStr,
    /// Relative initial permeability, at 25 °C and low flux density.
    pub initial_permeability: f64,
    /// Saturation flux density, in tesla, at 100 °C.
    pub saturation_flux_density: f64,
    /// Curie temperature, in degrees Celsius.
    pub curie_temperature: f64,
    /// Steinmetz loss-model coefficients `(k, alpha, beta)` for
    /// `P_v = k · f^alpha · B^beta`, with `f` in hertz, `B` in tesla and
    /// `P_v` in watts per cubic metre.
    pub steinmetz: (f64, f64, f64),
}

impl CoreMaterial {
    /// Core-loss volumetric power density from the Steinmetz equation.
    pub fn core_loss_density(&self, frequency: f64, peak_flux_density: f64) -> f64 {
        let (k, alpha, beta) = self.steinmetz;
        k * frequency.powf(alpha) * peak_flux_density.powf(beta)
    }
}

/// The kind of air gap applied to a core leg.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum GapType {
    /// A machined gap ground into the centre leg.
    Ground,
    /// A gap formed by a spacer between core halves.
    Spacer,
    /// The residual gap of an ungapped, mated core.
    Residual,
}

/// A single air gap.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// The gap's kind.
    pub gap_type: GapType,
    /// The gap length, in metres.
    pub length: f64,
}

/// A core: a catalogue shape and material, an air-gap configuration, and a
/// stack count for cores assembled in parallel along their axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core {
    /// The catalogue name of the core shape.
    pub shape: ArcStr,
    /// The catalogue name of the core material.
    pub material: ArcStr,
    /// The air gaps applied, one per gapped leg (empty for an ungapped
    /// core).
    pub gapping: Vec<Gap>,
    /// The number of cores stacked in parallel along the winding axis.
    pub number_stacks: u32,
}

impl Core {
    /// The total air-gap length summed across all gapped legs.
    pub fn total_gap_length(&self) -> f64 {
        self.gapping.iter().map(|gap| gap.length).sum()
    }

    /// Whether the core carries any gap other than the residual mating gap.
    pub fn is_gapped(&self) -> bool {
        self.gapping.iter().any(|gap| gap.gap_type != GapType::Residual)
    }
}

/// Manufacturer metadata attached to a synthesised design, carried through
/// unchanged for reporting purposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerInfo {
    /// The manufacturer's name.
    pub name: Option<ArcStr>,
    /// The manufacturer's part number or reference.
    pub reference: Option<ArcStr>,
}

/// A complete magnetic component: a core paired with its wound coil.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Magnetic {
    /// The core.
    pub core: Core,
    /// The coil, with or without wound geometry.
    pub coil: Coil,
    /// Optional manufacturer metadata.
    pub manufacturer_info: Option<ManufacturerInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_gap_length_sums_all_legs() {
        let core = Core {
            shape: "ETD 34".into(),
            material: "3C97".into(),
            gapping: vec![
                Gap { gap_type: GapType::Ground, length: 0.0005 },
                Gap { gap_type: GapType::Residual, length: 0.00001 },
            ],
            number_stacks: 1,
        };
        assert!((core.total_gap_length() - 0.00051).abs() < 1e-12);
        assert!(core.is_gapped());
    }

    #[test]
    fn core_loss_density_follows_steinmetz() {
        let material = CoreMaterial {
            name: "3C97".into(),
            initial_permeability: 3000.0,
            saturation_flux_density: 0.41,
            curie_temperature: 220.0,
            steinmetz: (1.0, 1.5, 2.5),
        };
        let density = material.core_loss_density(100_000.0, 0.1);
        assert!(density > 0.0);
    }
}
