use std::collections::BTreeSet;

use crate::config::Config;
use crate::ir::{FamilyGraph, PersonId, RelationshipId};
use crate::scene::{ConnectorId, ObjectId, Scene};

/// Focus state. A lock is only released by a background click or a click on
/// another person; hovering never changes a locked highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Idle,
    Previewing(PersonId),
    Locked(PersonId),
}

impl Focus {
    pub fn person(&self) -> Option<PersonId> {
        match self {
            Focus::Idle => None,
            Focus::Previewing(person) | Focus::Locked(person) => Some(*person),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Focus::Locked(_))
    }
}

/// Everything one focused person lights up. Only ids actually present in
/// the scene are collected, so a missing card or connector is silently
/// nothing to highlight rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    pub people: BTreeSet<PersonId>,
    pub connectors: BTreeSet<ConnectorId>,
}

impl HighlightSet {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.connectors.is_empty()
    }

    pub fn object_ids(&self) -> BTreeSet<ObjectId> {
        self.people
            .iter()
            .map(|&person| ObjectId::Card(person))
            .chain(self.connectors.iter().map(|&connector| ObjectId::Connector(connector)))
            .collect()
    }
}

/// Computes the highlight set induced by focusing `person`.
///
/// Three shapes of traversal: the root and a married-in partner have no
/// ancestor chain, so they light up a single level around themselves; a
/// descendant walks the parent chain all the way to the root and also
/// lights up their own partner and children. Siblings of the focused
/// person stay dark.
pub fn collect_family_context(graph: &FamilyGraph, scene: &Scene, person: PersonId) -> HighlightSet {
    let mut set = HighlightSet::default();
    include_person(&mut set, scene, person);

    let record = graph.person(person);
    if let Some(relationship_id) = record.married_into {
        let relationship = graph.relationship(relationship_id);
        include_person(&mut set, scene, relationship.anchor);
        expand_relationship(graph, scene, &mut set, relationship_id);
        return set;
    }

    let mut current = person;
    while let Some((anchor, relationship_id)) = graph.person(current).parent {
        include_person(&mut set, scene, anchor);
        let relationship = graph.relationship(relationship_id);
        if let Some(partner) = relationship.partner {
            include_person(&mut set, scene, partner);
            include_connector(&mut set, scene, ConnectorId::Partner(relationship_id));
        }
        include_connector(&mut set, scene, ConnectorId::Branch(current));
        include_connector(&mut set, scene, ConnectorId::Trunk(relationship_id));
        current = anchor;
    }

    // Root and descendant alike light up their own nuclear families.
    for &relationship_id in &record.relationships {
        expand_relationship(graph, scene, &mut set, relationship_id);
    }
    set
}

fn expand_relationship(
    graph: &FamilyGraph,
    scene: &Scene,
    set: &mut HighlightSet,
    relationship_id: RelationshipId,
) {
    let relationship = graph.relationship(relationship_id);
    if let Some(partner) = relationship.partner {
        include_person(set, scene, partner);
        include_connector(set, scene, ConnectorId::Partner(relationship_id));
    }
    for &child in &relationship.children {
        include_person(set, scene, child);
        include_connector(set, scene, ConnectorId::Branch(child));
    }
    include_connector(set, scene, ConnectorId::Trunk(relationship_id));
}

fn include_person(set: &mut HighlightSet, scene: &Scene, person: PersonId) {
    if scene.contains(ObjectId::Card(person)) {
        set.people.insert(person);
    }
}

fn include_connector(set: &mut HighlightSet, scene: &Scene, connector: ConnectorId) {
    if scene.contains(ObjectId::Connector(connector)) {
        set.connectors.insert(connector);
    }
}

/// Puts the highlight styling onto every object in the set: cards get the
/// highlight shadow, connectors get the highlight stroke and width. Card
/// strokes keep their gender color.
pub fn apply_highlight(scene: &mut Scene, set: &HighlightSet, config: &Config) {
    for &person in &set.people {
        if let Some(object) = scene.get_mut(ObjectId::Card(person)) {
            object.shadow = Some(config.theme.highlight_shadow());
        }
    }
    for &connector in &set.connectors {
        if let Some(object) = scene.get_mut(ObjectId::Connector(connector)) {
            object.stroke = config.theme.highlight_color.clone();
            object.stroke_width = config.layout.line.highlight_stroke_width;
        }
    }
}

/// Restores every object in the set to its default appearance, including
/// the default card shadow.
pub fn reset_highlight(scene: &mut Scene, set: &HighlightSet, config: &Config) {
    for &person in &set.people {
        if let Some(object) = scene.get_mut(ObjectId::Card(person)) {
            object.shadow = Some(config.theme.card_shadow.clone());
        }
    }
    for &connector in &set.connectors {
        if let Some(object) = scene.get_mut(ObjectId::Connector(connector)) {
            object.stroke = config.theme.connector_color.clone();
            object.stroke_width = config.layout.line.stroke_width;
        }
    }
}

/// Owns the focus state and the currently applied set. Every focus change
/// runs a full reverse-then-apply cycle, so highlight state never leaks
/// when focus jumps straight from one person to another.
#[derive(Debug, Default)]
pub struct Highlighter {
    focus: Focus,
    active: HighlightSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn active(&self) -> &HighlightSet {
        &self.active
    }

    /// Hover preview. Returns false without touching the scene while a
    /// click holds the lock.
    pub fn pointer_enter(
        &mut self,
        graph: &FamilyGraph,
        scene: &mut Scene,
        config: &Config,
        person: PersonId,
    ) -> bool {
        if self.focus.is_locked() {
            return false;
        }
        self.refocus(graph, scene, config, person);
        self.focus = Focus::Previewing(person);
        true
    }

    /// Ends a hover preview. A locked highlight stays put.
    pub fn pointer_leave(&mut self, scene: &mut Scene, config: &Config) -> bool {
        match self.focus {
            Focus::Previewing(_) => {
                self.clear(scene, config);
                true
            }
            Focus::Idle | Focus::Locked(_) => false,
        }
    }

    /// Click always takes the lock, replacing any previous preview or lock.
    pub fn click(
        &mut self,
        graph: &FamilyGraph,
        scene: &mut Scene,
        config: &Config,
        person: PersonId,
    ) {
        self.refocus(graph, scene, config, person);
        self.focus = Focus::Locked(person);
    }

    /// Click on empty surface: release the lock and restore defaults.
    pub fn background_click(&mut self, scene: &mut Scene, config: &Config) {
        self.clear(scene, config);
    }

    /// Re-applies the current focus onto a freshly built scene. The old
    /// active set pointed at objects that no longer exist, so it is dropped
    /// rather than reversed.
    pub fn reapply(&mut self, graph: &FamilyGraph, scene: &mut Scene, config: &Config) {
        self.active = HighlightSet::default();
        if let Some(person) = self.focus.person() {
            self.refocus(graph, scene, config, person);
        }
    }

    fn refocus(&mut self, graph: &FamilyGraph, scene: &mut Scene, config: &Config, person: PersonId) {
        reset_highlight(scene, &self.active, config);
        let set = collect_family_context(graph, scene, person);
        apply_highlight(scene, &set, config);
        scene.restack(&set.object_ids());
        self.active = set;
    }

    fn clear(&mut self, scene: &mut Scene, config: &Config) {
        reset_highlight(scene, &self.active, config);
        self.active = HighlightSet::default();
        self.focus = Focus::Idle;
        scene.restack(&BTreeSet::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::assets::ImageAsset;
    use crate::card::CardVisual;
    use crate::config::PrimaryPolicy;
    use crate::layout::{assign_generations, compute_layout, order_relationships};
    use crate::scene::build_scene;

    fn stage(source: &str) -> (FamilyGraph, Scene, Config) {
        let config = Config::default();
        let mut graph = FamilyGraph::from_json5(source).unwrap();
        assign_generations(&mut graph).unwrap();
        order_relationships(&mut graph, PrimaryPolicy::default());
        let visuals: BTreeMap<_, _> = graph
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
            .collect();
        let layout = compute_layout(&graph, &visuals, &config.layout, &config.surface);
        let scene = build_scene(&graph, &visuals, &layout, &config);
        (graph, scene, config)
    }

    const NUCLEAR: &str = r#"{
        id: "r", name: "Root",
        relationships: [{
            partner: { id: "q", name: "Q" },
            married: true,
            children: [{ id: "a", name: "A" }, { id: "b", name: "B" }],
        }],
    }"#;

    fn person(graph: &FamilyGraph, key: &str) -> PersonId {
        graph.person_by_key(key).unwrap()
    }

    #[test]
    fn clicking_a_child_lights_parents_but_not_siblings() {
        let (graph, scene, _) = stage(NUCLEAR);
        let set = collect_family_context(&graph, &scene, person(&graph, "a"));

        let expected_people: BTreeSet<_> =
            [person(&graph, "a"), person(&graph, "r"), person(&graph, "q")].into_iter().collect();
        assert_eq!(set.people, expected_people);

        let relationship = graph.person(graph.root).relationships[0];
        let expected_connectors: BTreeSet<_> = [
            ConnectorId::Partner(relationship),
            ConnectorId::Trunk(relationship),
            ConnectorId::Branch(person(&graph, "a")),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.connectors, expected_connectors);
    }

    #[test]
    fn focusing_the_root_lights_every_relationship_level() {
        let (graph, scene, _) = stage(NUCLEAR);
        let set = collect_family_context(&graph, &scene, graph.root);

        for key in ["r", "q", "a", "b"] {
            assert!(set.people.contains(&person(&graph, key)), "missing {key}");
        }
        let relationship = graph.person(graph.root).relationships[0];
        assert!(set.connectors.contains(&ConnectorId::Partner(relationship)));
        assert!(set.connectors.contains(&ConnectorId::Trunk(relationship)));
        assert!(set.connectors.contains(&ConnectorId::Branch(person(&graph, "a"))));
        assert!(set.connectors.contains(&ConnectorId::Branch(person(&graph, "b"))));
    }

    #[test]
    fn focusing_a_married_in_partner_stays_on_one_level() {
        let (graph, scene, _) = stage(
            r#"{
                id: "r", name: "Root",
                relationships: [{
                    partner: { id: "q", name: "Q" },
                    married: true,
                    children: [{
                        id: "a", name: "A",
                        relationships: [{
                            partner: { id: "p", name: "P" },
                            married: true,
                            children: [{ id: "x", name: "X" }],
                        }],
                    }],
                }],
            }"#,
        );
        let set = collect_family_context(&graph, &scene, person(&graph, "p"));

        // P, the spouse A they married, and their child X; nothing above A.
        let expected_people: BTreeSet<_> =
            [person(&graph, "p"), person(&graph, "a"), person(&graph, "x")].into_iter().collect();
        assert_eq!(set.people, expected_people);

        let relationship = graph.person(person(&graph, "a")).relationships[0];
        assert!(set.connectors.contains(&ConnectorId::Partner(relationship)));
        assert!(set.connectors.contains(&ConnectorId::Trunk(relationship)));
        assert!(set.connectors.contains(&ConnectorId::Branch(person(&graph, "x"))));
        assert_eq!(set.connectors.len(), 3);
    }

    #[test]
    fn deep_descendant_walks_to_the_root_and_lights_their_own_family() {
        let (graph, scene, _) = stage(
            r#"{
                id: "r", name: "Root",
                relationships: [{
                    partner: { id: "q", name: "Q" },
                    married: true,
                    children: [{
                        id: "a", name: "A",
                        relationships: [{
                            partner: { id: "p", name: "P" },
                            married: true,
                            children: [{ id: "x", name: "X" }],
                        }],
                    }, { id: "b", name: "B" }],
                }],
            }"#,
        );
        let set = collect_family_context(&graph, &scene, person(&graph, "a"));

        for key in ["a", "r", "q", "p", "x"] {
            assert!(set.people.contains(&person(&graph, key)), "missing {key}");
        }
        // The sibling stays dark even though the walk passes its parents.
        assert!(!set.people.contains(&person(&graph, "b")));
        assert!(!set.connectors.contains(&ConnectorId::Branch(person(&graph, "b"))));
    }

    #[test]
    fn childless_relationship_contributes_no_trunk_to_the_set() {
        let (graph, scene, _) = stage(
            r#"{
                id: "r", name: "Root",
                relationships: [{ partner: { id: "q", name: "Q" }, married: true }],
            }"#,
        );
        let set = collect_family_context(&graph, &scene, graph.root);
        assert!(set.connectors.contains(&ConnectorId::Partner(RelationshipId(0))));
        assert!(!set.connectors.contains(&ConnectorId::Trunk(RelationshipId(0))));
    }

    #[test]
    fn lock_suppresses_hover_until_background_click() {
        let (graph, mut scene, config) = stage(NUCLEAR);
        let mut highlighter = Highlighter::new();

        highlighter.click(&graph, &mut scene, &config, person(&graph, "a"));
        assert!(highlighter.focus().is_locked());
        assert!(!highlighter.pointer_enter(&graph, &mut scene, &config, person(&graph, "b")));
        assert!(!highlighter.pointer_leave(&mut scene, &config));
        assert_eq!(highlighter.focus().person(), Some(person(&graph, "a")));

        highlighter.background_click(&mut scene, &config);
        assert_eq!(highlighter.focus(), Focus::Idle);
        assert!(highlighter.active().is_empty());
        assert!(highlighter.pointer_enter(&graph, &mut scene, &config, person(&graph, "b")));
    }

    #[test]
    fn moving_the_preview_reverses_the_previous_highlight_first() {
        let (graph, mut scene, config) = stage(NUCLEAR);
        let mut highlighter = Highlighter::new();

        let a = person(&graph, "a");
        let b = person(&graph, "b");
        highlighter.pointer_enter(&graph, &mut scene, &config, a);
        let branch_a = ObjectId::Connector(ConnectorId::Branch(a));
        assert_eq!(scene.get(branch_a).unwrap().stroke, config.theme.highlight_color);

        highlighter.pointer_enter(&graph, &mut scene, &config, b);
        assert_eq!(scene.get(branch_a).unwrap().stroke, config.theme.connector_color);
        let branch_b = ObjectId::Connector(ConnectorId::Branch(b));
        assert_eq!(scene.get(branch_b).unwrap().stroke, config.theme.highlight_color);
    }

    #[test]
    fn highlight_then_reset_restores_defaults_including_the_card_shadow() {
        let (graph, mut scene, config) = stage(NUCLEAR);
        let a = person(&graph, "a");
        let card_a = ObjectId::Card(a);
        let before = scene.get(card_a).unwrap().clone();

        let set = collect_family_context(&graph, &scene, a);
        apply_highlight(&mut scene, &set, &config);
        assert_eq!(
            scene.get(card_a).unwrap().shadow.as_ref().map(|shadow| shadow.blur),
            Some(config.theme.highlight_shadow_blur)
        );

        reset_highlight(&mut scene, &set, &config);
        let after = scene.get(card_a).unwrap();
        assert_eq!(after.shadow, before.shadow);
        assert_eq!(after.stroke, before.stroke);
        assert_eq!(after.stroke_width, before.stroke_width);
    }

    #[test]
    fn refocus_restacks_highlighted_connectors_between_plain_lines_and_cards() {
        let (graph, mut scene, config) = stage(NUCLEAR);
        let mut highlighter = Highlighter::new();
        highlighter.click(&graph, &mut scene, &config, person(&graph, "a"));

        let order = scene.paint_order();
        let position = |id: ObjectId| order.iter().position(|&other| other == id).unwrap();
        let plain = position(ObjectId::Connector(ConnectorId::Branch(person(&graph, "b"))));
        let raised = position(ObjectId::Connector(ConnectorId::Branch(person(&graph, "a"))));
        let first_card = order.iter().position(|id| id.is_card()).unwrap();
        assert!(plain < raised);
        assert!(raised < first_card);
        assert!(order[first_card..].iter().all(|id| id.is_card()));
    }
}
