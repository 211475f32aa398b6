use std::collections::{BTreeMap, BTreeSet};

use crate::assets::ImageAsset;
use crate::card::CardVisual;
use crate::config::Config;
use crate::ir::{FamilyGraph, PersonId, RelationshipId};
use crate::layout::Layout;
use crate::theme::Shadow;

/// Identifies one drawable in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectId {
    Card(PersonId),
    Connector(ConnectorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectorId {
    /// Horizontal line between the two partners of a relationship.
    Partner(RelationshipId),
    /// Vertical drop below a relationship with children.
    Trunk(RelationshipId),
    /// L-shaped run to one child, keyed by the child.
    Branch(PersonId),
}

impl ObjectId {
    pub fn is_card(&self) -> bool {
        matches!(self, ObjectId::Card(_))
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, ObjectId::Connector(_))
    }
}

#[derive(Debug, Clone)]
pub struct CardShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub fill: String,
    pub label: String,
    pub text_color: String,
    pub image: ImageAsset,
}

#[derive(Debug, Clone)]
pub struct LineShape {
    /// Two points for straight connectors, three for the branch bend.
    pub points: Vec<(f32, f32)>,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub enum SceneShape {
    Card(CardShape),
    Line(LineShape),
}

impl SceneShape {
    /// Axis-aligned bounds as (left, top, right, bottom).
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        match self {
            SceneShape::Card(card) => (
                card.x - card.width / 2.0,
                card.y - card.height / 2.0,
                card.x + card.width / 2.0,
                card.y + card.height / 2.0,
            ),
            SceneShape::Line(line) => {
                let mut left = f32::INFINITY;
                let mut top = f32::INFINITY;
                let mut right = f32::NEG_INFINITY;
                let mut bottom = f32::NEG_INFINITY;
                for &(x, y) in &line.points {
                    left = left.min(x);
                    top = top.min(y);
                    right = right.max(x);
                    bottom = bottom.max(y);
                }
                (left, top, right, bottom)
            }
        }
    }

    pub fn center(&self) -> (f32, f32) {
        let (left, top, right, bottom) = self.bounds();
        ((left + right) / 2.0, (top + bottom) / 2.0)
    }
}

/// One drawable with its current style. Highlighting mutates the style
/// fields in place and restores them from theme and config defaults.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: SceneShape,
    pub stroke: String,
    pub stroke_width: f32,
    pub dashed: bool,
    pub shadow: Option<Shadow>,
}

/// Retained display list. Paint order is the `order` vector, back to front;
/// lookups go through the id map.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    order: Vec<ObjectId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds on top of everything already present. Re-adding an id replaces
    /// the object but keeps its position in the paint order.
    pub fn insert(&mut self, object: SceneObject) {
        let id = object.id;
        if self.objects.insert(id, object).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            self.order.retain(|&other| other != id);
        }
        removed
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in paint order, back to front.
    pub fn paint_order(&self) -> &[ObjectId] {
        &self.order
    }

    /// Objects in paint order, back to front.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    pub fn bring_to_front(&mut self, id: ObjectId) {
        if let Some(index) = self.order.iter().position(|&other| other == id) {
            let id = self.order.remove(index);
            self.order.push(id);
        }
    }

    pub fn send_to_back(&mut self, id: ObjectId) {
        if let Some(index) = self.order.iter().position(|&other| other == id) {
            let id = self.order.remove(index);
            self.order.insert(0, id);
        }
    }

    /// Union of every object's bounds as (left, top, right, bottom).
    /// `None` for an empty scene.
    pub fn content_bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let mut bounds: Option<(f32, f32, f32, f32)> = None;
        for object in self.objects.values() {
            let (left, top, right, bottom) = object.shape.bounds();
            bounds = Some(match bounds {
                None => (left, top, right, bottom),
                Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
            });
        }
        bounds
    }

    /// Rebuilds the paint order into three bands: plain connectors at the
    /// back, highlighted connectors above them, cards on top. Order within
    /// each band is preserved.
    pub fn restack(&mut self, highlighted: &BTreeSet<ObjectId>) {
        let mut back = Vec::with_capacity(self.order.len());
        let mut raised = Vec::new();
        let mut cards = Vec::new();
        for &id in &self.order {
            if id.is_card() {
                cards.push(id);
            } else if highlighted.contains(&id) {
                raised.push(id);
            } else {
                back.push(id);
            }
        }
        back.extend(raised);
        back.extend(cards);
        self.order = back;
    }
}

/// Assembles the display list from placed geometry: connectors first in
/// relationship order, then cards in traversal order, so cards start out on
/// top of every line.
pub fn build_scene(
    graph: &FamilyGraph,
    visuals: &BTreeMap<PersonId, CardVisual>,
    layout: &Layout,
    config: &Config,
) -> Scene {
    let mut scene = Scene::new();
    let line_width = config.layout.line.stroke_width;
    let connector_stroke = config.theme.connector_color.clone();
    let opacity = config.theme.connector_opacity;

    let line = |id: ConnectorId, points: Vec<(f32, f32)>, dashed: bool| SceneObject {
        id: ObjectId::Connector(id),
        shape: SceneShape::Line(LineShape { points, opacity }),
        stroke: connector_stroke.clone(),
        stroke_width: line_width,
        dashed,
        shadow: None,
    };

    for relationship in &graph.relationships {
        if let Some(partner) = layout.partner_lines.get(&relationship.id) {
            let segment = partner.segment;
            scene.insert(line(
                ConnectorId::Partner(relationship.id),
                vec![(segment.x1, segment.y1), (segment.x2, segment.y2)],
                partner.dashed,
            ));
        }
        if let Some(trunk) = layout.trunks.get(&relationship.id) {
            let segment = trunk.segment;
            scene.insert(line(
                ConnectorId::Trunk(relationship.id),
                vec![(segment.x1, segment.y1), (segment.x2, segment.y2)],
                trunk.dashed,
            ));
        }
        for &child in &relationship.children {
            if let Some(branch) = layout.branches.get(&child) {
                scene.insert(line(
                    ConnectorId::Branch(child),
                    vec![
                        (branch.horizontal.x1, branch.horizontal.y1),
                        (branch.horizontal.x2, branch.horizontal.y2),
                        (branch.vertical.x2, branch.vertical.y2),
                    ],
                    branch.dashed,
                ));
            }
        }
    }

    for person in graph.traversal() {
        let Some(card) = layout.cards.get(&person) else {
            continue;
        };
        let Some(visual) = visuals.get(&person) else {
            continue;
        };
        scene.insert(SceneObject {
            id: ObjectId::Card(person),
            shape: SceneShape::Card(CardShape {
                x: card.x,
                y: card.y,
                width: card.width,
                height: card.height,
                corner_radius: config.layout.card.corner_radius,
                fill: config.theme.card_fill.clone(),
                label: visual.label.clone(),
                text_color: config.theme.card_text_color.clone(),
                image: visual.image.clone(),
            }),
            stroke: visual.stroke.clone(),
            stroke_width: config.layout.card.stroke_width,
            dashed: false,
            shadow: Some(config.theme.card_shadow.clone()),
        });
    }
    scene
}
