//! Geometric winding: dividing the bobbin window into sections, inserting
//! insulation, and packing layers and turns.

use geometry::prelude::*;
use om_core::coil::Winding;
use om_core::geometry_model::{CoilGeometry, Layer, Section, SectionType, Turn, WindingIndex};
use om_core::magnetic::CoreShape;

use crate::combination::InsulationCombination;
use crate::pattern::Pattern;

/// Minimum fraction of the winding window every winding is guaranteed,
/// even if its nominal power share would otherwise round it below this.
const MINIMUM_WINDING_SHARE: f64 = 0.05;

/// Margin-tape thickness used when a combination requires one, in metres.
const MARGIN_TAPE_THICKNESS: f64 = 0.0005;

/// A representative dielectric strength used to size insulation-layer
/// thickness from a required withstand voltage, in volts per metre.
const INSULATION_DIELECTRIC_STRENGTH: f64 = 2.0e7;

/// Tiles `pattern` across `repetitions` copies, producing the full section
/// winding-index order.
pub fn tile_pattern(pattern: &Pattern, repetitions: u32) -> Vec<usize> {
    let mut tiled = Vec::with_capacity(pattern.len() * repetitions as usize);
    for _ in 0..repetitions {
        tiled.extend_from_slice(pattern);
    }
    tiled
}

/// Computes each tiled section's proportional share of the winding window,
/// re-normalised so every winding gets at least [`MINIMUM_WINDING_SHARE`].
pub fn section_proportions(tiled_pattern: &[usize], average_power_per_winding: &[f64]) -> Vec<f64> {
    let raw: Vec<f64> = tiled_pattern
        .iter()
        .map(|&winding| average_power_per_winding.get(winding).copied().unwrap_or(1.0).max(1e-9))
        .collect();
    let total: f64 = raw.iter().sum();
    let mut proportions: Vec<f64> = raw.iter().map(|value| value / total).collect();

    let deficit: f64 = proportions
        .iter()
        .filter(|&&p| p < MINIMUM_WINDING_SHARE)
        .map(|&p| MINIMUM_WINDING_SHARE - p)
        .sum();
    if deficit > 0.0 {
        let donors_total: f64 = proportions.iter().filter(|&&p| p >= MINIMUM_WINDING_SHARE).sum();
        for proportion in proportions.iter_mut() {
            if *proportion < MINIMUM_WINDING_SHARE {
                *proportion = MINIMUM_WINDING_SHARE;
            } else if donors_total > 0.0 {
                *proportion -= deficit * (*proportion / donors_total);
            }
        }
    }
    proportions
}

/// Divides the bobbin window along the winding orientation into sections
/// sized by `proportions`, one per entry of `tiled_pattern`.
pub fn wind_by_sections(
    shape: &CoreShape,
    orientation: Orientation,
    proportions: &[f64],
    tiled_pattern: &[usize],
) -> CoilGeometry {
    let mut geometry = CoilGeometry::new();
    let axis_extent = match orientation {
        Orientation::Overlapping => shape.window_width,
        Orientation::Contiguous => shape.window_height,
    };
    let cross_extent = match orientation {
        Orientation::Overlapping => shape.window_height,
        Orientation::Contiguous => shape.window_width,
    };

    let mut offset = -axis_extent / 2.0;
    for (&winding, &proportion) in tiled_pattern.iter().zip(proportions.iter()) {
        let extent = axis_extent * proportion;
        let center_offset = offset + extent / 2.0;
        let (width, height) = match orientation {
            Orientation::Overlapping => (extent, cross_extent),
            Orientation::Contiguous => (cross_extent, extent),
        };
        let center = match orientation {
            Orientation::Overlapping => Point::new(center_offset, 0.0),
            Orientation::Contiguous => Point::new(0.0, center_offset),
        };
        geometry.push_section(Section::new(
            format!("winding {winding} section"),
            Rect::from_dims(center, Dims::new(width, height)),
            SectionType::Conduction,
            Some(WindingIndex(winding as u16)),
        ));
        offset += extent;
    }
    geometry
}

/// Inserts insulation sections between adjacent conduction sections whose
/// windings carry different winding indices, sized from the combination's
/// withstand-voltage requirement.
pub fn calculate_insulation(
    geometry: &mut CoilGeometry,
    combination: &InsulationCombination,
    orientation: Orientation,
    allow_margin_tape: bool,
) {
    let mut new_order = Vec::with_capacity(geometry.section_order.len());
    let original_sections = geometry.section_order.clone();

    for (index, &section_id) in original_sections.iter().enumerate() {
        new_order.push(section_id);
        if index + 1 >= original_sections.len() {
            continue;
        }
        let this_winding = geometry.sections.get(section_id).unwrap().winding_index;
        let next_winding = geometry.sections.get(original_sections[index + 1]).unwrap().winding_index;
        if this_winding.is_none() || this_winding == next_winding {
            continue;
        }
        let this_winding = this_winding.unwrap().0 as usize;

        let requirement = &combination.per_winding[this_winding];
        let thickness = if allow_margin_tape && requirement.max_grade.is_some() {
            MARGIN_TAPE_THICKNESS
        } else {
            (requirement.withstand_voltage / INSULATION_DIELECTRIC_STRENGTH).max(1e-5)
        };

        let neighbour_rect = geometry.sections.get(section_id).unwrap().rect;
        let (width, height, center) = match orientation {
            Orientation::Overlapping => {
                (thickness, neighbour_rect.height(), Point::new(neighbour_rect.right() + thickness / 2.0, 0.0))
            }
            Orientation::Contiguous => {
                (neighbour_rect.width(), thickness, Point::new(0.0, neighbour_rect.top() + thickness / 2.0))
            }
        };
        let insulation_id = geometry.sections.insert(Section::new(
            "insulation",
            Rect::from_dims(center, Dims::new(width, height)),
            SectionType::Insulation,
            None,
        ));
        new_order.push(insulation_id);
    }

    geometry.section_order = new_order;
}

/// Packs turns into layers within each conduction section, for the given
/// per-winding wire and turn count. Returns `false`
/// if any turn cannot be placed without violating the window bounds or
/// colliding with another turn.
pub fn wind(geometry: &mut CoilGeometry, windings: &[Winding], orientation: Orientation) -> bool {
    let section_ids = geometry.section_order.clone();

    let mut sections_per_winding = vec![0usize; windings.len()];
    for &section_id in &section_ids {
        let section = geometry.sections.get(section_id).unwrap();
        if section.section_type == SectionType::Conduction {
            if let Some(winding_index) = section.winding_index {
                sections_per_winding[winding_index.0 as usize] += 1;
            }
        }
    }
    let mut turns_left: Vec<u32> = windings.iter().map(|w| w.total_physical_turns()).collect();
    let mut sections_left = sections_per_winding.clone();

    for &section_id in &section_ids {
        let section = geometry.sections.get(section_id).unwrap();
        if section.section_type != SectionType::Conduction {
            continue;
        }
        let Some(winding_index) = section.winding_index else { continue };
        let winding_index = winding_index.0 as usize;
        let Some(winding) = windings.get(winding_index) else { continue };
        let section_rect = section.rect;

        let remaining_sections = sections_left[winding_index].max(1) as u32;
        let total_turns = turns_left[winding_index].div_ceil(remaining_sections);
        turns_left[winding_index] -= total_turns;
        sections_left[winding_index] = sections_left[winding_index].saturating_sub(1);

        let wire_width = winding.wire.maximum_outer_width();
        let wire_height = winding.wire.maximum_outer_height();
        if wire_width <= 0.0 || wire_height <= 0.0 {
            return false;
        }

        let (turns_per_layer, layer_pitch, turn_pitch) = match orientation {
            Orientation::Overlapping => {
                let per_layer = (section_rect.height() / wire_height).floor().max(1.0) as u32;
                (per_layer, wire_width, wire_height)
            }
            Orientation::Contiguous => {
                let per_layer = (section_rect.width() / wire_width).floor().max(1.0) as u32;
                (per_layer, wire_height, wire_width)
            }
        };

        let number_layers = total_turns.div_ceil(turns_per_layer.max(1));

        let layer_axis_origin = match orientation {
            Orientation::Overlapping => section_rect.left(),
            Orientation::Contiguous => section_rect.bottom(),
        };

        let mut placed_turns: Vec<Rect> = Vec::new();
        let mut turns_remaining = total_turns;
        for layer_index in 0..number_layers {
            let layer_axis_center =
                layer_axis_origin + layer_pitch * (layer_index as f64 + 0.5);
            let layer_rect = match orientation {
                Orientation::Overlapping => Rect::from_dims(
                    Point::new(layer_axis_center, section_rect.center().y),
                    Dims::new(layer_pitch, section_rect.height()),
                ),
                Orientation::Contiguous => Rect::from_dims(
                    Point::new(section_rect.center().x, layer_axis_center),
                    Dims::new(section_rect.width(), layer_pitch),
                ),
            };
            if !section_rect.overlaps(&layer_rect) && layer_index > 0 {
                return false;
            }

            let layer_id = geometry.push_layer(
                section_id,
                Layer::new(format!("winding {winding_index} layer {layer_index}"), layer_rect, Some(WindingIndex(winding_index as u16))),
            );
            let Some(layer_id) = layer_id else { return false };

            let turns_this_layer = turns_remaining.min(turns_per_layer);
            let cross_origin = match orientation {
                Orientation::Overlapping => section_rect.bottom(),
                Orientation::Contiguous => section_rect.left(),
            };
            for turn_in_layer in 0..turns_this_layer {
                let cross_center = cross_origin + turn_pitch * (turn_in_layer as f64 + 0.5);
                let coordinates = match orientation {
                    Orientation::Overlapping => Point::new(layer_axis_center, cross_center),
                    Orientation::Contiguous => Point::new(cross_center, layer_axis_center),
                };
                let turn_rect = Rect::from_dims(coordinates, Dims::new(wire_width, wire_height));
                if placed_turns.iter().any(|existing| existing.overlaps(&turn_rect)) {
                    return false;
                }
                placed_turns.push(turn_rect);

                let turn_id = geometry.push_turn(
                    layer_id,
                    Turn {
                        name: format!(
                            "winding {winding_index} layer {layer_index} turn {turn_in_layer}"
                        )
                        .into(),
                        coordinates,
                        winding_index: WindingIndex(winding_index as u16),
                        parallel_index: (turn_in_layer % winding.number_parallels.max(1)) as u16,
                        length: mean_turn_length(&coordinates),
                        layer: layer_id,
                    },
                );
                if turn_id.is_none() {
                    return false;
                }
            }
            turns_remaining -= turns_this_layer;
        }
    }
    true
}

/// The mean one-turn length at a position; for a concentric (non-toroidal)
/// bobbin this is the circumference at the turn's radial offset from the
/// winding axis.
fn mean_turn_length(coordinates: &Point) -> f64 {
    2.0 * std::f64::consts::PI * coordinates.x.abs().max(1e-4)
}

/// Shrinks every section's bounding box to its tightest enclosing turns
/// plus a margin-tape allowance, and re-centres it. Sections with no turns (insulation, or
/// conduction sections that failed to wind) are left unchanged.
pub fn delimit_and_compact(geometry: &mut CoilGeometry, margin: f64) {
    let section_ids = geometry.section_order.clone();
    for section_id in section_ids {
        let layer_ids = geometry.sections.get(section_id).unwrap().layers.clone();
        let mut turn_rects = Vec::new();
        for layer_id in &layer_ids {
            let Some(layer) = geometry.layers.get(*layer_id) else { continue };
            for turn_id in &layer.turns {
                if let Some(turn) = geometry.turns.get(*turn_id) {
                    turn_rects.push(turn.coordinates);
                }
            }
        }
        if turn_rects.is_empty() {
            continue;
        }

        let min_x = turn_rects.iter().map(|p| p.x).fold(f64::INFINITY, f64::min) - margin;
        let max_x = turn_rects.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) + margin;
        let min_y = turn_rects.iter().map(|p| p.y).fold(f64::INFINITY, f64::min) - margin;
        let max_y = turn_rects.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max) + margin;

        let new_rect = Rect::from_dims(
            Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            Dims::new(max_x - min_x, max_y - min_y),
        );
        geometry.sections.get_mut(section_id).unwrap().rect = new_rect;
    }
}

#[cfg(test)]
mod tests {
    use om_core::magnetic::CoreShapeFamily;

    use super::*;

    fn sample_shape() -> CoreShape {
        CoreShape {
            name: "ETD 34".into(),
            family: CoreShapeFamily::E,
            effective_area: 97.1e-6,
            effective_length: 78.6e-3,
            effective_volume: 7640e-9,
            window_width: 6e-3,
            window_height: 20e-3,
        }
    }

    #[test]
    fn section_proportions_guarantee_minimum_share() {
        let tiled = vec![0, 1];
        let proportions = section_proportions(&tiled, &[1000.0, 1.0]);
        assert!(proportions[1] >= MINIMUM_WINDING_SHARE - 1e-9);
        assert!((proportions.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wind_by_sections_covers_the_window() {
        let shape = sample_shape();
        let tiled = vec![0, 1];
        let proportions = section_proportions(&tiled, &[1.0, 1.0]);
        let geometry = wind_by_sections(&shape, Orientation::Overlapping, &proportions, &tiled);
        assert_eq!(geometry.section_order.len(), 2);
        let total_width: f64 = geometry.sections.values().map(|s| s.rect.width()).sum();
        assert!((total_width - shape.window_width).abs() < 1e-9);
    }
}
