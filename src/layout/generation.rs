use std::collections::VecDeque;

use crate::ir::{FamilyGraph, PersonId, StructureError};

/// Assigns a generation depth to every reachable person. The root sits at
/// generation 0, children one below their anchor, partners on the same row
/// as the person they married into. A person reachable at two different
/// depths is a structural error, never silently re-assigned.
pub fn assign_generations(graph: &mut FamilyGraph) -> Result<(), StructureError> {
    let mut assigned: Vec<Option<u32>> = vec![None; graph.people.len()];
    assigned[graph.root.index()] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(graph.root);
    while let Some(person) = queue.pop_front() {
        let Some(depth) = assigned[person.index()] else {
            continue;
        };
        for &relationship_id in &graph.person(person).relationships {
            let relationship = graph.relationship(relationship_id);
            if let Some(partner) = relationship.partner {
                record(graph, &mut assigned, partner, depth)?;
            }
            for &child in &relationship.children {
                record(graph, &mut assigned, child, depth + 1)?;
                queue.push_back(child);
            }
        }
    }

    for (person, depth) in graph.people.iter_mut().zip(&assigned) {
        person.generation = depth.unwrap_or(0);
    }
    Ok(())
}

fn record(
    graph: &FamilyGraph,
    assigned: &mut [Option<u32>],
    person: PersonId,
    depth: u32,
) -> Result<(), StructureError> {
    match assigned[person.index()] {
        None => {
            assigned[person.index()] = Some(depth);
            Ok(())
        }
        Some(existing) if existing == depth => Ok(()),
        Some(existing) => Err(StructureError::GenerationConflict {
            key: graph.person(person).key.clone(),
            assigned: existing,
            conflicting: depth,
        }),
    }
}
