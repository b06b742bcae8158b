// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host scene graph.
//!
//! A small stand-in for the engine side of the step system:
//! - Named nodes in a tree with deterministic child order
//! - Active flags and active-in-hierarchy checks
//! - The handful of component values step payloads mutate
//! - An outbox for named events fired by event steps

use crate::steps::StepComponent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A UI graphic (color, optional text and sprite)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiElement {
    /// RGBA color
    pub color: [f32; 4],
    /// Text content, for text elements
    pub text: Option<String>,
    /// Sprite name, for image elements
    pub sprite: Option<String>,
}

impl Default for UiElement {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            text: None,
            sprite: None,
        }
    }
}

/// Value of an animator parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimatorValue {
    /// Float parameter
    Float(f32),
    /// Integer parameter
    Int(i32),
    /// Boolean parameter
    Bool(bool),
}

/// Animator parameters of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animator {
    /// Parameters in declaration order
    pub params: IndexMap<String, AnimatorValue>,
    /// Triggers fired so far, oldest first
    pub fired_triggers: Vec<String>,
}

impl Animator {
    /// Get a parameter value
    pub fn get(&self, name: &str) -> Option<AnimatorValue> {
        self.params.get(name).copied()
    }

    /// Set a parameter value
    pub fn set(&mut self, name: &str, value: AnimatorValue) {
        self.params.insert(name.to_string(), value);
    }

    /// Fire a trigger
    pub fn trigger(&mut self, name: &str) {
        self.fired_triggers.push(name.to_string());
    }
}

/// A node in the scene
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique node ID
    pub id: NodeId,
    /// Node name
    pub name: String,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Children in hierarchy order
    pub children: Vec<NodeId>,
    /// Active flag of the node itself
    pub active: bool,
    /// World position
    pub position: [f32; 3],
    /// UI graphic, if any
    pub ui: Option<UiElement>,
    /// Animator, if any
    pub animator: Option<Animator>,
    /// Step components attached to this node, in component order
    pub steps: Vec<StepComponent>,
}

impl Node {
    /// Create a new active node with no components
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            active: true,
            position: [0.0; 3],
            ui: None,
            animator: None,
            steps: Vec::new(),
        }
    }

    /// Attach a UI graphic
    pub fn with_ui(mut self, ui: UiElement) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Attach an animator
    pub fn with_animator(mut self, animator: Animator) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Attach a step component
    pub fn with_step(mut self, step: StepComponent) -> Self {
        self.steps.push(step);
        self
    }
}

/// Declarative node tree, as stored in scene files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    /// Node name
    pub name: String,
    /// Active flag
    #[serde(default = "default_true")]
    pub active: bool,
    /// Position
    #[serde(default)]
    pub position: [f32; 3],
    /// UI graphic
    #[serde(default)]
    pub ui: Option<UiElement>,
    /// Animator
    #[serde(default)]
    pub animator: Option<Animator>,
    /// Step components
    #[serde(default)]
    pub steps: Vec<StepComponent>,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

fn default_true() -> bool {
    true
}

/// The scene graph
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: IndexMap<NodeId, Node>,
    roots: Vec<NodeId>,
    events: Vec<String>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from declarative root nodes
    pub fn from_defs(defs: &[NodeDef]) -> Self {
        let mut scene = Self::new();
        for def in defs {
            scene.insert_def(def, None);
        }
        scene
    }

    fn insert_def(&mut self, def: &NodeDef, parent: Option<NodeId>) -> NodeId {
        let mut node = Node::new(def.name.clone()).with_position(def.position);
        node.active = def.active;
        node.ui = def.ui.clone();
        node.animator = def.animator.clone();
        node.steps = def.steps.clone();

        let id = self.add(node, parent);
        for child in &def.children {
            self.insert_def(child, Some(id));
        }
        id
    }

    /// Add a node under `parent` (or as a root), returning its ID
    pub fn add(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = node.id;
        node.parent = parent;
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => {
                node.parent = None;
                self.roots.push(id);
            }
        }
        self.nodes.insert(id, node);
        id
    }

    /// Get a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Root nodes in order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Node count
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node name, or an empty string for unknown nodes
    pub fn name(&self, id: NodeId) -> &str {
        self.nodes.get(&id).map(|n| n.name.as_str()).unwrap_or("")
    }

    /// Find a node by a `/`-separated path of names starting at a root
    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = *self.roots.iter().find(|id| self.name(**id) == first)?;

        for segment in segments {
            current = *self
                .get(current)?
                .children
                .iter()
                .find(|id| self.name(**id) == segment)?;
        }
        Some(current)
    }

    /// All descendants of `root` in pre-order, excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(root, &mut out);
        out
    }

    fn collect_descendants(&self, parent: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&parent) else {
            return;
        };
        for &child in &node.children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Whether the node and all of its ancestors are active
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(&node_id) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Set the active flag of a node; returns false if the node is unknown
    pub fn set_active(&mut self, id: NodeId, active: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.active = active;
                true
            }
            None => false,
        }
    }

    /// Push a named event into the outbox
    pub fn emit_event(&mut self, name: impl Into<String>) {
        self.events.push(name.into());
    }

    /// Take all fired events, oldest first
    pub fn take_events(&mut self) -> Vec<String> {
        std::mem::take(&mut self.events)
    }

    /// Full `/`-separated path of a node
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|n| self.nodes.get(&n)) {
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let root = scene.add(Node::new("Chain"), None);
        let a = scene.add(Node::new("A"), Some(root));
        scene.add(Node::new("A1"), Some(a));
        scene.add(Node::new("B"), Some(root));
        (scene, root)
    }

    #[test]
    fn test_descendants_pre_order() {
        let (scene, root) = sample();
        let names: Vec<_> = scene
            .descendants(root)
            .into_iter()
            .map(|id| scene.name(id).to_string())
            .collect();
        assert_eq!(names, vec!["A", "A1", "B"]);
    }

    #[test]
    fn test_find_path() {
        let (scene, _) = sample();
        let a1 = scene.find_path("Chain/A/A1").unwrap();
        assert_eq!(scene.name(a1), "A1");
        assert_eq!(scene.path_of(a1), "Chain/A/A1");
        assert!(scene.find_path("Chain/C").is_none());
        assert!(scene.find_path("").is_none());
    }

    #[test]
    fn test_active_in_hierarchy() {
        let (mut scene, _) = sample();
        let a = scene.find_path("Chain/A").unwrap();
        let a1 = scene.find_path("Chain/A/A1").unwrap();
        assert!(scene.is_active_in_hierarchy(a1));

        scene.set_active(a, false);
        assert!(!scene.is_active_in_hierarchy(a1));
        assert!(scene.get(a1).unwrap().active);
    }

    #[test]
    fn test_event_outbox() {
        let mut scene = Scene::new();
        scene.emit_event("door_open");
        scene.emit_event("door_close");
        assert_eq!(scene.take_events(), vec!["door_open", "door_close"]);
        assert!(scene.take_events().is_empty());
    }
}
