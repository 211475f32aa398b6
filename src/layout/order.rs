use crate::config::PrimaryPolicy;
use crate::ir::FamilyGraph;

/// Rewrites every person's relationship list into presentation order and
/// marks primaries. Both policies sort stably, so peers keep their input
/// order.
///
/// Under [`PrimaryPolicy::ChildrenFirst`] partner-less relationships come
/// first and each one with children is primary, along with the first
/// partnered relationship. Under [`PrimaryPolicy::MarriedFirst`] married
/// relationships come first and only the first partnered one is primary.
pub fn order_relationships(graph: &mut FamilyGraph, policy: PrimaryPolicy) {
    for index in 0..graph.people.len() {
        let mut order = graph.people[index].relationships.clone();
        match policy {
            PrimaryPolicy::ChildrenFirst => order.sort_by_key(|&id| {
                let relationship = &graph.relationships[id.index()];
                (relationship.partner.is_some(), !relationship.married)
            }),
            PrimaryPolicy::MarriedFirst => {
                order.sort_by_key(|&id| !graph.relationships[id.index()].married);
            }
        }

        let mut partnered_seen = false;
        for &id in &order {
            let relationship = &graph.relationships[id.index()];
            let primary = if relationship.partner.is_none() {
                policy == PrimaryPolicy::ChildrenFirst && !relationship.children.is_empty()
            } else if partnered_seen {
                false
            } else {
                partnered_seen = true;
                true
            };
            graph.relationships[id.index()].primary = primary;
        }
        graph.people[index].relationships = order;
    }
}
