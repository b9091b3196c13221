//! The coil's physical geometry tree: sections, layers and turns, owned by
//! arenas and addressed by typed ids rather than optional back-references
//!.

use arcstr::ArcStr;
use geometry::prelude::*;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Id};

/// A zero-based ordinal identifying one winding among the coil's windings.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct WindingIndex(pub u16);

/// A [`crate::geometry_model::Section`]'s id.
pub type SectionId = Id<Section>;
/// A [`Layer`]'s id.
pub type LayerId = Id<Layer>;
/// A [`Turn`]'s id.
pub type TurnId = Id<Turn>;

/// What a section is used for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum SectionType {
    /// Carries current: holds one or more windings' layers.
    Conduction,
    /// Pure insulation: no layers, only a dielectric gap.
    Insulation,
}

/// A vertical (along the winding axis) slice of a section, holding one
/// winding's turns at one radial/axial position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// A human-readable name, e.g. `"primary layer 1"`.
    pub name: ArcStr,
    /// The layer's footprint within the winding window.
    pub rect: Rect,
    /// Which winding this layer belongs to, if it carries current.
    pub winding_index: Option<WindingIndex>,
    /// The turns placed in this layer, in winding order.
    pub turns: Vec<TurnId>,
}

impl Layer {
    /// Creates an empty layer.
    pub fn new(name: impl Into<ArcStr>, rect: Rect, winding_index: Option<WindingIndex>) -> Self {
        Self { name: name.into(), rect, winding_index, turns: Vec::new() }
    }
}

/// A radial (toroid) or axial (concentric bobbin) partition of the winding
/// window, containing one or more [`Layer`]s or acting as a pure insulation
/// gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// A human-readable name, e.g. `"primary section"`.
    pub name: ArcStr,
    /// The section's footprint within the winding window.
    pub rect: Rect,
    /// The section's role.
    pub section_type: SectionType,
    /// Which winding this section carries, for conduction sections; `None`
    /// for insulation sections.
    pub winding_index: Option<WindingIndex>,
    /// The layers contained in this section, in radial/axial order.
    pub layers: Vec<LayerId>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(
        name: impl Into<ArcStr>,
        rect: Rect,
        section_type: SectionType,
        winding_index: Option<WindingIndex>,
    ) -> Self {
        Self { name: name.into(), rect, section_type, winding_index, layers: Vec::new() }
    }
}

/// A single turn of conductor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// A human-readable name, e.g. `"primary parallel 0 turn 3"`.
    pub name: ArcStr,
    /// The turn's centre position within the winding window.
    pub coordinates: Point,
    /// Which winding this turn belongs to.
    pub winding_index: WindingIndex,
    /// Which parallel path of the winding this turn belongs to.
    pub parallel_index: u16,
    /// The length of wire consumed by this turn, in metres (the mean turn
    /// length at this turn's position).
    pub length: f64,
    /// The layer this turn is placed in.
    pub layer: LayerId,
}

/// The coil's full geometry tree, owning every [`Section`], [`Layer`] and
/// [`Turn`] through arenas and an ordered list of top-level sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoilGeometry {
    /// All sections, addressed by [`SectionId`].
    pub sections: Arena<Section>,
    /// All layers, addressed by [`LayerId`].
    pub layers: Arena<Layer>,
    /// All turns, addressed by [`TurnId`].
    pub turns: Arena<Turn>,
    /// The top-level sections, in radial/axial order from the core window's
    /// origin outward.
    pub section_order: Vec<SectionId>,
}

impl CoilGeometry {
    /// Creates an empty geometry tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `section` to [`Self::section_order`], returning its id.
    pub fn push_section(&mut self, section: Section) -> SectionId {
        let id = self.sections.insert(section);
        self.section_order.push(id);
        id
    }

    /// Appends `layer` to `section`'s layer list, returning its id.
    pub fn push_layer(&mut self, section: SectionId, layer: Layer) -> Option<LayerId> {
        let id = self.layers.insert(layer);
        self.sections.get_mut(section)?.layers.push(id);
        Some(id)
    }

    /// Appends `turn` to `layer`'s turn list, returning its id.
    pub fn push_turn(&mut self, layer: LayerId, turn: Turn) -> Option<TurnId> {
        let id = self.turns.insert(turn);
        self.layers.get_mut(layer)?.turns.push(id);
        Some(id)
    }

    /// The total number of turns placed belonging to `winding_index`.
    pub fn turns_in_winding(&self, winding_index: WindingIndex) -> usize {
        self.turns.values().filter(|turn| turn.winding_index == winding_index).count()
    }

    /// All turns overlapping `rect`, used by the stray-capacitance engine's
    /// adjacency search and by collision checks during winding.
    pub fn turns_overlapping(&self, rect: &Rect) -> Vec<TurnId> {
        self.turns
            .iter()
            .filter(|(_, turn)| rect.overlaps(&Rect::from_dims(turn.coordinates, Dims { width: 0.0, height: 0.0 })))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_section_layer_turn_links_up() {
        let mut geometry = CoilGeometry::new();
        let section = geometry.push_section(Section::new(
            "primary section",
            Rect::from_dims(Point::zero(), Dims { width: 1.0, height: 1.0 }),
            SectionType::Conduction,
            Some(WindingIndex(0)),
        ));
        let layer = geometry
            .push_layer(
                section,
                Layer::new(
                    "primary layer 1",
                    Rect::from_dims(Point::zero(), Dims { width: 1.0, height: 0.1 }),
                    Some(WindingIndex(0)),
                ),
            )
            .unwrap();
        geometry
            .push_turn(
                layer,
                Turn {
                    name: "primary turn 0".into(),
                    coordinates: Point::zero(),
                    winding_index: WindingIndex(0),
                    parallel_index: 0,
                    length: 0.01,
                    layer,
                },
            )
            .unwrap();

        assert_eq!(geometry.sections.get(section).unwrap().layers.len(), 1);
        assert_eq!(geometry.layers.get(layer).unwrap().turns.len(), 1);
        assert_eq!(geometry.turns_in_winding(WindingIndex(0)), 1);
    }
}
