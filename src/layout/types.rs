use std::collections::BTreeMap;

use crate::ir::{PersonId, RelationshipId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Segment {
    pub fn midpoint(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// Placed card; `x`/`y` is the center point.
#[derive(Debug, Clone)]
pub struct CardLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CardLayout {
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct PartnerLine {
    pub segment: Segment,
    pub dashed: bool,
}

#[derive(Debug, Clone)]
pub struct TrunkLine {
    pub segment: Segment,
    pub dashed: bool,
}

/// L-shaped run from a trunk's foot to one child's top edge.
#[derive(Debug, Clone)]
pub struct BranchLine {
    pub horizontal: Segment,
    pub vertical: Segment,
    pub dashed: bool,
}

/// Geometry side tables keyed by the ids of the domain records that own
/// them. Domain records themselves never carry layout state.
#[derive(Debug, Clone)]
pub struct Layout {
    pub cards: BTreeMap<PersonId, CardLayout>,
    pub partner_lines: BTreeMap<RelationshipId, PartnerLine>,
    pub trunks: BTreeMap<RelationshipId, TrunkLine>,
    pub branches: BTreeMap<PersonId, BranchLine>,
    /// Row membership per generation, in presentation order.
    pub generations: Vec<Vec<PersonId>>,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}
