use super::types::{BranchLine, CardLayout, Layout, PartnerLine, Segment, TrunkLine};
use crate::config::LayoutConfig;
use crate::ir::FamilyGraph;

/// Derives every connector from the placed cards. A relationship whose
/// endpoints were never placed contributes nothing; missing pieces are
/// skipped rather than drawn dangling.
pub(super) fn attach_connectors(graph: &FamilyGraph, layout: &mut Layout, config: &LayoutConfig) {
    let radius = config.card.radius;
    for relationship in &graph.relationships {
        let partner = relationship.partner.and_then(|partner_id| {
            let anchor = layout.cards.get(&relationship.anchor)?;
            let partner = layout.cards.get(&partner_id)?;
            Some(partner_segment(anchor, partner, radius))
        });
        if let Some(segment) = partner {
            layout.partner_lines.insert(
                relationship.id,
                PartnerLine {
                    segment,
                    dashed: !(relationship.married && relationship.primary),
                },
            );
        }

        if relationship.children.is_empty() {
            continue;
        }
        let origin = match partner {
            Some(segment) => trunk_origin(&segment, relationship.primary, radius),
            None => {
                let Some(anchor) = layout.cards.get(&relationship.anchor) else {
                    continue;
                };
                (anchor.x, anchor.y)
            }
        };
        let trunk = vertical_drop(origin, config.spacing.vertical_gap);
        layout.trunks.insert(
            relationship.id,
            TrunkLine { segment: trunk, dashed: !relationship.primary },
        );

        for &child in &relationship.children {
            let Some(child_card) = layout.cards.get(&child) else {
                continue;
            };
            let (horizontal, vertical) = branch_segments(&trunk, child_card, config.line.stroke_width);
            layout.branches.insert(
                child,
                BranchLine { horizontal, vertical, dashed: !relationship.primary },
            );
        }
    }
}

/// Horizontal line from the anchor's right edge to the partner's left edge,
/// raised half a card radius above center so it reads as linking the
/// portraits rather than the name bands.
pub(super) fn partner_segment(anchor: &CardLayout, partner: &CardLayout, radius: f32) -> Segment {
    Segment {
        x1: anchor.right(),
        y1: anchor.y - radius / 2.0,
        x2: partner.left(),
        y2: partner.y - radius / 2.0,
    }
}

/// Where the trunk leaves a partner line. Primary relationships drop from
/// the midpoint; later ones shift right so their trunk hugs the partner's
/// card instead of crossing the primary trunk.
pub(super) fn trunk_origin(partner_line: &Segment, primary: bool, radius: f32) -> (f32, f32) {
    let (mut x, y) = partner_line.midpoint();
    if !primary {
        x += (partner_line.x2 - partner_line.x1) / 2.0 - radius;
    }
    (x, y)
}

pub(super) fn vertical_drop(origin: (f32, f32), length: f32) -> Segment {
    Segment { x1: origin.0, y1: origin.1, x2: origin.0, y2: origin.1 + length }
}

/// L-shaped branch: across from the trunk's foot to the child's column,
/// then down to the child's top edge. When the trunk sits right of the
/// child the horizontal run starts one stroke width later so the corner
/// does not overshoot the joint.
pub(super) fn branch_segments(
    trunk: &Segment,
    child: &CardLayout,
    trunk_stroke_width: f32,
) -> (Segment, Segment) {
    let start = if trunk.x2 > child.x { trunk.x2 + trunk_stroke_width } else { trunk.x2 };
    let horizontal = Segment { x1: start, y1: trunk.y2, x2: child.x, y2: trunk.y2 };
    let vertical = Segment { x1: child.x, y1: trunk.y2, x2: child.x, y2: child.top() };
    (horizontal, vertical)
}
