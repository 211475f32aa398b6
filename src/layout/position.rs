use std::collections::BTreeMap;

use super::types::CardLayout;
use crate::card::CardVisual;
use crate::config::{LayoutConfig, SurfaceConfig};
use crate::ir::{FamilyGraph, PersonId};

/// Buckets people into generation rows. Row membership follows the graph
/// traversal, so a person's partners land next to them and child subtrees
/// stay contiguous in the row below.
pub(super) fn generation_rows(graph: &FamilyGraph) -> Vec<Vec<PersonId>> {
    let mut rows: Vec<Vec<PersonId>> = Vec::new();
    for person in graph.traversal() {
        let generation = graph.person(person).generation as usize;
        if rows.len() <= generation {
            rows.resize_with(generation + 1, Vec::new);
        }
        rows[generation].push(person);
    }
    rows
}

/// Centers each row on the surface. The vertical slot is a pure function of
/// the generation index, so a row left empty after filtering leaves a gap
/// instead of shifting the rows below it.
pub(super) fn place_cards(
    rows: &[Vec<PersonId>],
    cards: &BTreeMap<PersonId, CardVisual>,
    config: &LayoutConfig,
    surface: &SurfaceConfig,
) -> BTreeMap<PersonId, CardLayout> {
    let (center_x, _) = surface.center();
    let row_height = config.card.height();
    let pitch = row_height + config.spacing.vertical_gap;
    let gap = config.spacing.minimum_gap;

    let mut placed = BTreeMap::new();
    for (generation, row) in rows.iter().enumerate() {
        let present: Vec<(PersonId, f32, f32)> = row
            .iter()
            .filter_map(|id| cards.get(id).map(|visual| (*id, visual.width, visual.height)))
            .collect();
        if present.is_empty() {
            continue;
        }

        let total: f32 = present.iter().map(|(_, width, _)| *width).sum::<f32>()
            + (present.len() - 1) as f32 * gap;
        let y = generation as f32 * pitch + row_height / 2.0;
        let mut left = center_x - total / 2.0;
        for (id, width, height) in present {
            placed.insert(id, CardLayout { x: left + width / 2.0, y, width, height });
            left += width + gap;
        }
    }
    placed
}
