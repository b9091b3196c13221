//! Windings and the coil that bundles them together with their wound
//! geometry.

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::geometry_model::{CoilGeometry, WindingIndex};
use crate::insulation::WireSolidInsulationRequirements;
use crate::topology::IsolationSide;
use crate::wire::Wire;

/// One winding of the coil: a number of turns, wound in some number of
/// parallel paths, of a single wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Winding {
    /// A human-readable name, e.g. `"primary"`.
    pub name: ArcStr,
    /// Which isolation side this winding is referenced to.
    pub isolation_side: IsolationSide,
    /// The number of series turns.
    pub number_turns: u32,
    /// The number of parallel paths sharing those turns.
    pub number_parallels: u32,
    /// The wire this winding is wound with.
    pub wire: Wire,
    /// The solid-insulation requirement the wire must satisfy.
    pub insulation_requirement: WireSolidInsulationRequirements,
}

impl Winding {
    /// The total number of physical turns, `number_turns * number_parallels`.
    pub fn total_physical_turns(&self) -> u32 {
        self.number_turns * self.number_parallels
    }
}

/// The complete coil: its windings, in winding order, and their wound
/// geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coil {
    /// The windings, indexed by [`WindingIndex`].
    pub windings: Vec<Winding>,
    /// The wound geometry, if winding has been performed.
    pub geometry: Option<CoilGeometry>,
}

impl Coil {
    /// Creates a coil with the given windings and no geometry yet.
    pub fn new(windings: Vec<Winding>) -> Self {
        Self { windings, geometry: None }
    }

    /// The winding at `index`, if present.
    pub fn winding(&self, index: WindingIndex) -> Option<&Winding> {
        self.windings.get(index.0 as usize)
    }

    /// The number of windings.
    pub fn number_of_windings(&self) -> usize {
        self.windings.len()
    }

    /// The mean length of wire consumed by `index`'s turns, in metres, once
    /// wound.
    pub fn mean_turn_length(&self, index: WindingIndex) -> Option<f64> {
        let geometry = self.geometry.as_ref()?;
        let lengths: Vec<f64> = geometry
            .turns
            .values()
            .filter(|turn| turn.winding_index == index)
            .map(|turn| turn.length)
            .collect();
        if lengths.is_empty() {
            return None;
        }
        Some(lengths.iter().sum::<f64>() / lengths.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{ConductorMaterial, RoundWire, WireKind};

    fn sample_wire() -> Wire {
        Wire {
            name: "sample".into(),
            kind: WireKind::Round(RoundWire {
                conducting_diameter: 0.0005,
                outer_diameter: 0.00055,
                grade: 1,
            }),
            material: ConductorMaterial::COPPER,
            coating_relative_permittivity: 3.0,
        }
    }

    #[test]
    fn total_physical_turns_multiplies_parallels() {
        let winding = Winding {
            name: "primary".into(),
            isolation_side: IsolationSide::PRIMARY,
            number_turns: 10,
            number_parallels: 3,
            wire: sample_wire(),
            insulation_requirement: WireSolidInsulationRequirements::functional(),
        };
        assert_eq!(winding.total_physical_turns(), 30);
    }

    #[test]
    fn mean_turn_length_is_none_before_winding() {
        let coil = Coil::new(vec![Winding {
            name: "primary".into(),
            isolation_side: IsolationSide::PRIMARY,
            number_turns: 10,
            number_parallels: 1,
            wire: sample_wire(),
            insulation_requirement: WireSolidInsulationRequirements::functional(),
        }]);
        assert_eq!(coil.mean_turn_length(WindingIndex(0)), None);
    }
}
