use crate::ir::FamilyGraph;
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub generations: Vec<Vec<String>>,
    pub cards: Vec<CardDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct CardDump {
    pub key: String,
    pub name: String,
    pub generation: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub kind: String,
    /// Anchor key for partner and trunk lines, child key for branches.
    pub owner: String,
    pub dashed: bool,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, graph: &FamilyGraph) -> Self {
        let generations = layout
            .generations
            .iter()
            .map(|row| row.iter().map(|&id| graph.person(id).key.clone()).collect())
            .collect();

        let cards = layout
            .cards
            .iter()
            .map(|(&id, card)| {
                let person = graph.person(id);
                CardDump {
                    key: person.key.clone(),
                    name: person.name.clone(),
                    generation: person.generation,
                    x: card.x,
                    y: card.y,
                    width: card.width,
                    height: card.height,
                }
            })
            .collect();

        let mut connectors = Vec::new();
        for (&id, line) in &layout.partner_lines {
            let segment = line.segment;
            connectors.push(ConnectorDump {
                kind: "partner".to_string(),
                owner: graph.person(graph.relationship(id).anchor).key.clone(),
                dashed: line.dashed,
                points: vec![[segment.x1, segment.y1], [segment.x2, segment.y2]],
            });
        }
        for (&id, trunk) in &layout.trunks {
            let segment = trunk.segment;
            connectors.push(ConnectorDump {
                kind: "trunk".to_string(),
                owner: graph.person(graph.relationship(id).anchor).key.clone(),
                dashed: trunk.dashed,
                points: vec![[segment.x1, segment.y1], [segment.x2, segment.y2]],
            });
        }
        for (&child, branch) in &layout.branches {
            connectors.push(ConnectorDump {
                kind: "branch".to_string(),
                owner: graph.person(child).key.clone(),
                dashed: branch.dashed,
                points: vec![
                    [branch.horizontal.x1, branch.horizontal.y1],
                    [branch.horizontal.x2, branch.horizontal.y2],
                    [branch.vertical.x2, branch.vertical.y2],
                ],
            });
        }

        LayoutDump {
            left: layout.left,
            top: layout.top,
            width: layout.width,
            height: layout.height,
            generations,
            cards,
            connectors,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, graph: &FamilyGraph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
