mod connectors;
mod generation;
mod order;
mod position;
pub(crate) mod types;
pub use types::*;

pub use generation::assign_generations;
pub use order::order_relationships;

use std::collections::BTreeMap;

use crate::card::CardVisual;
use crate::config::{LayoutConfig, SurfaceConfig};
use crate::ir::{FamilyGraph, PersonId};

/// Full geometry pass over a graph whose generations are assigned and whose
/// relationships are ordered: one placed card per person with a visual,
/// plus every connector those placements imply.
pub fn compute_layout(
    graph: &FamilyGraph,
    cards: &BTreeMap<PersonId, CardVisual>,
    config: &LayoutConfig,
    surface: &SurfaceConfig,
) -> Layout {
    let generations = position::generation_rows(graph);
    let placed = position::place_cards(&generations, cards, config, surface);
    let mut layout = Layout {
        cards: placed,
        partner_lines: BTreeMap::new(),
        trunks: BTreeMap::new(),
        branches: BTreeMap::new(),
        generations,
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };
    connectors::attach_connectors(graph, &mut layout, config);

    let mut bounds: Option<(f32, f32, f32, f32)> = None;
    for card in layout.cards.values() {
        bounds = Some(match bounds {
            None => (card.left(), card.top(), card.right(), card.bottom()),
            Some((left, top, right, bottom)) => (
                left.min(card.left()),
                top.min(card.top()),
                right.max(card.right()),
                bottom.max(card.bottom()),
            ),
        });
    }
    if let Some((left, top, right, bottom)) = bounds {
        layout.left = left;
        layout.top = top;
        layout.width = right - left;
        layout.height = bottom - top;
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageAsset;
    use crate::config::PrimaryPolicy;

    fn prepared(source: &str) -> FamilyGraph {
        let mut graph = FamilyGraph::from_json5(source).unwrap();
        assign_generations(&mut graph).unwrap();
        order_relationships(&mut graph, PrimaryPolicy::default());
        graph
    }

    fn uniform_cards(graph: &FamilyGraph) -> BTreeMap<PersonId, CardVisual> {
        graph
            .traversal()
            .into_iter()
            .map(|id| {
                (
                    id,
                    CardVisual {
                        width: 128.0,
                        height: 168.0,
                        stroke: "#FFFFFF".to_string(),
                        label: graph.person(id).name.clone(),
                        image: ImageAsset::placeholder(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn married_couple_with_children_gets_all_three_connector_kinds() {
        let graph = prepared(
            r#"{
                id: "r", name: "Root",
                relationships: [{
                    partner: { id: "q", name: "Q" },
                    married: true,
                    children: [{ id: "a", name: "A" }, { id: "b", name: "B" }],
                }],
            }"#,
        );
        let layout = compute_layout(
            &graph,
            &uniform_cards(&graph),
            &LayoutConfig::default(),
            &SurfaceConfig::default(),
        );

        assert_eq!(layout.cards.len(), 4);
        assert_eq!(layout.partner_lines.len(), 1);
        assert_eq!(layout.trunks.len(), 1);
        assert_eq!(layout.branches.len(), 2);

        let relationship = graph.person(graph.root).relationships[0];
        let line = &layout.partner_lines[&relationship];
        assert!(!line.dashed);
        let trunk = &layout.trunks[&relationship];
        assert!(!trunk.dashed);
        // Trunk hangs off the partner line midpoint and spans the vertical gap.
        let (mid_x, mid_y) = line.segment.midpoint();
        assert_eq!(trunk.segment.x1, mid_x);
        assert_eq!(trunk.segment.y1, mid_y);
        assert_eq!(trunk.segment.y2 - trunk.segment.y1, 200.0);

        for &child in &graph.relationship(relationship).children {
            let branch = &layout.branches[&child];
            let card = &layout.cards[&child];
            assert_eq!(branch.vertical.x1, card.x);
            assert_eq!(branch.vertical.y2, card.top());
            assert_eq!(branch.horizontal.y1, trunk.segment.y2);
        }
    }

    #[test]
    fn single_parent_trunk_drops_from_the_card_center() {
        let graph = prepared(
            r#"{
                id: "r", name: "Root",
                relationships: [{ children: [{ id: "a", name: "A" }] }],
            }"#,
        );
        let layout = compute_layout(
            &graph,
            &uniform_cards(&graph),
            &LayoutConfig::default(),
            &SurfaceConfig::default(),
        );

        assert!(layout.partner_lines.is_empty());
        let relationship = graph.person(graph.root).relationships[0];
        let trunk = &layout.trunks[&relationship];
        let root_card = &layout.cards[&graph.root];
        assert_eq!(trunk.segment.x1, root_card.x);
        assert_eq!(trunk.segment.y1, root_card.y);
        assert!(!trunk.dashed);
    }

    #[test]
    fn childless_relationship_contributes_no_trunk() {
        let graph = prepared(
            r#"{
                id: "r", name: "Root",
                relationships: [{ partner: { id: "q", name: "Q" } }],
            }"#,
        );
        let layout = compute_layout(
            &graph,
            &uniform_cards(&graph),
            &LayoutConfig::default(),
            &SurfaceConfig::default(),
        );
        assert_eq!(layout.partner_lines.len(), 1);
        assert!(layout.trunks.is_empty());
        assert!(layout.branches.is_empty());
    }

    #[test]
    fn unmarried_partner_line_is_dashed() {
        let graph = prepared(
            r#"{
                id: "r", name: "Root",
                relationships: [{ partner: { id: "q", name: "Q" }, married: false }],
            }"#,
        );
        let layout = compute_layout(
            &graph,
            &uniform_cards(&graph),
            &LayoutConfig::default(),
            &SurfaceConfig::default(),
        );
        let relationship = graph.person(graph.root).relationships[0];
        assert!(layout.partner_lines[&relationship].dashed);
    }

    #[test]
    fn secondary_relationship_connectors_are_dashed() {
        let graph = prepared(
            r#"{
                id: "r", name: "Root",
                relationships: [
                    { partner: { id: "q", name: "Q" }, married: true, children: [{ id: "a", name: "A" }] },
                    { partner: { id: "s", name: "S" }, married: true, children: [{ id: "b", name: "B" }] },
                ],
            }"#,
        );
        let layout = compute_layout(
            &graph,
            &uniform_cards(&graph),
            &LayoutConfig::default(),
            &SurfaceConfig::default(),
        );

        let order = &graph.person(graph.root).relationships;
        let secondary = order[1];
        assert!(layout.partner_lines[&secondary].dashed);
        assert!(layout.trunks[&secondary].dashed);
        let child = graph.relationship(secondary).children[0];
        assert!(layout.branches[&child].dashed);

        // The secondary trunk leaves the line off-midpoint, by half the
        // line length minus the card radius.
        let line = &layout.partner_lines[&secondary].segment;
        let trunk = &layout.trunks[&secondary].segment;
        let (mid_x, _) = line.midpoint();
        let expected = mid_x + (line.x2 - line.x1) / 2.0 - 64.0;
        assert_eq!(trunk.x1, expected);
    }

    #[test]
    fn bounds_cover_exactly_the_placed_cards() {
        let graph = prepared(
            r#"{
                id: "r", name: "Root",
                relationships: [{
                    partner: { id: "q", name: "Q" },
                    married: true,
                    children: [{ id: "a", name: "A" }],
                }],
            }"#,
        );
        let layout = compute_layout(
            &graph,
            &uniform_cards(&graph),
            &LayoutConfig::default(),
            &SurfaceConfig::default(),
        );

        // Top row spans two cards and one gap, centered on x = 600.
        assert_eq!(layout.left, 600.0 - 456.0 / 2.0);
        assert_eq!(layout.width, 456.0);
        assert_eq!(layout.top, 0.0);
        assert_eq!(layout.height, 368.0 + 168.0);
    }
}
