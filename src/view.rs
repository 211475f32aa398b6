use std::collections::BTreeMap;

use crate::assets::{AssetLoader, ImageAsset};
use crate::card::{CardRenderer, CardVisual};
use crate::config::Config;
use crate::highlight::{Focus, HighlightSet, Highlighter};
use crate::ir::{FamilyGraph, Person, PersonId, StructureError};
use crate::layout::{Layout, assign_generations, compute_layout, order_relationships};
use crate::scene::{Scene, build_scene};

pub type ClickCallback = Box<dyn FnMut(&Person)>;

/// An assembled tree: the graph, its geometry, the retained scene, and the
/// highlight coordinator, behind one key-addressed pointer interface.
pub struct TreeView {
    graph: FamilyGraph,
    config: Config,
    visuals: BTreeMap<PersonId, CardVisual>,
    layout: Layout,
    scene: Scene,
    highlighter: Highlighter,
    click_callbacks: BTreeMap<PersonId, ClickCallback>,
}

impl TreeView {
    pub fn from_json5(
        source: &str,
        config: Config,
        assets: &dyn AssetLoader,
        cards: &dyn CardRenderer,
    ) -> Result<Self, StructureError> {
        let graph = FamilyGraph::from_json5(source)?;
        Self::build(graph, config, assets, cards)
    }

    /// Runs the whole construction pipeline: generations, relationship
    /// order, card visuals in presentation order, then layout and scene.
    /// Structural problems abort before anything is drawn; a failed image
    /// load only downgrades that one card to the placeholder portrait.
    pub fn build(
        mut graph: FamilyGraph,
        config: Config,
        assets: &dyn AssetLoader,
        cards: &dyn CardRenderer,
    ) -> Result<Self, StructureError> {
        assign_generations(&mut graph)?;
        order_relationships(&mut graph, config.layout.primary_policy);

        let mut visuals = BTreeMap::new();
        for person in graph.traversal() {
            let record = graph.person(person);
            let image = match &record.image {
                Some(reference) => assets
                    .load(reference)
                    .unwrap_or_else(|_| ImageAsset::placeholder()),
                None => ImageAsset::placeholder(),
            };
            visuals.insert(person, cards.render(record, &image, &config));
        }

        let layout = compute_layout(&graph, &visuals, &config.layout, &config.surface);
        let scene = build_scene(&graph, &visuals, &layout, &config);
        Ok(Self {
            graph,
            config,
            visuals,
            layout,
            scene,
            highlighter: Highlighter::new(),
            click_callbacks: BTreeMap::new(),
        })
    }

    pub fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn focus(&self) -> Focus {
        self.highlighter.focus()
    }

    pub fn highlighted(&self) -> &HighlightSet {
        self.highlighter.active()
    }

    /// Registers a callback for one person, called after a click on them
    /// has been fully processed. At most one callback per person; a second
    /// registration replaces the first.
    pub fn on_person_click(
        &mut self,
        key: &str,
        callback: impl FnMut(&Person) + 'static,
    ) -> Result<(), StructureError> {
        let person = self.graph.require_person(key)?;
        self.click_callbacks.insert(person, Box::new(callback));
        Ok(())
    }

    /// Hover onto a person's card. Returns whether a preview was applied;
    /// a locked highlight suppresses previews entirely.
    pub fn pointer_enter(&mut self, key: &str) -> Result<bool, StructureError> {
        let person = self.graph.require_person(key)?;
        Ok(self
            .highlighter
            .pointer_enter(&self.graph, &mut self.scene, &self.config, person))
    }

    /// Hover off the current card. Returns whether a preview was cleared.
    pub fn pointer_leave(&mut self) -> bool {
        self.highlighter.pointer_leave(&mut self.scene, &self.config)
    }

    pub fn pointer_click(&mut self, key: &str) -> Result<(), StructureError> {
        let person = self.graph.require_person(key)?;
        self.highlighter
            .click(&self.graph, &mut self.scene, &self.config, person);
        if let Some(callback) = self.click_callbacks.get_mut(&person) {
            callback(self.graph.person(person));
        }
        Ok(())
    }

    pub fn background_click(&mut self) {
        self.highlighter.background_click(&mut self.scene, &self.config);
    }

    /// Re-lays the tree out on a new surface size and carries the current
    /// focus over to the rebuilt scene.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.surface.width = width;
        self.config.surface.height = height;
        self.layout = compute_layout(&self.graph, &self.visuals, &self.config.layout, &self.config.surface);
        self.scene = build_scene(&self.graph, &self.visuals, &self.layout, &self.config);
        self.highlighter.reapply(&self.graph, &mut self.scene, &self.config);
    }
}
