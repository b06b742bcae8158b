// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hierarchy panel - Node tree view with active step highlighting.
//!
//! While play mode is on, the panel carries an [`ActiveHighlight`] that
//! follows chain snapshots. The node hosting an active step is drawn with a
//! yellow background and black bold italic text.

use std::collections::{HashMap, HashSet};

use egui::RichText;
use stepchain::ui::{ACTIVE_BACKGROUND, ACTIVE_TEXT};
use stepchain::{ChainEvent, ChainSnapshot, NodeId, Scene};

/// Tracks which nodes host an active step, per chain
#[derive(Debug, Default)]
pub struct ActiveHighlight {
    /// Active step hosts keyed by chain name
    nodes: HashMap<String, HashSet<NodeId>>,
    /// Set when a chain reported changes since the last repaint
    repaint: bool,
}

impl ActiveHighlight {
    /// Create an empty highlight
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from a chain's snapshot and the events drained from it
    pub fn observe(&mut self, snapshot: &ChainSnapshot, events: &[ChainEvent]) {
        if !events.is_empty() {
            self.repaint = true;
        }

        let hosts: HashSet<NodeId> = snapshot
            .steps
            .iter()
            .flatten()
            .filter(|s| s.active)
            .map(|s| s.node)
            .collect();

        if hosts.is_empty() {
            self.nodes.remove(&snapshot.name);
        } else {
            self.nodes.insert(snapshot.name.clone(), hosts);
        }
    }

    /// Whether the node hosts an active step in any observed chain
    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.nodes.values().any(|hosts| hosts.contains(&node))
    }

    /// All highlighted nodes
    pub fn highlighted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.values().flatten().copied()
    }

    /// Take the repaint flag
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }
}

/// How a hierarchy row is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    /// Hosts an active step
    Highlighted,
    /// Normal text
    Normal,
    /// Node is inactive in the hierarchy
    Dimmed,
}

/// A visible row of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Node shown in the row
    pub node: NodeId,
    /// Tree depth
    pub depth: usize,
    /// Whether the node has children
    pub has_children: bool,
}

/// The hierarchy panel showing the node tree
#[derive(Debug, Default)]
pub struct HierarchyPanel {
    /// Search filter
    pub filter: String,
    /// Show inactive nodes
    pub show_hidden: bool,
    /// Expanded state per node
    pub expanded: HashSet<NodeId>,
    /// Selected node
    pub selected: Option<NodeId>,
    /// Active step highlighting, attached in play mode
    pub highlight: Option<ActiveHighlight>,
}

impl HierarchyPanel {
    /// Create a new hierarchy panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed chain changes to the highlight, if attached
    pub fn observe(&mut self, snapshot: &ChainSnapshot, events: &[ChainEvent]) {
        if let Some(highlight) = self.highlight.as_mut() {
            highlight.observe(snapshot, events);
        }
    }

    /// Style of a node's row
    pub fn row_style(&self, node: NodeId, scene: &Scene) -> RowStyle {
        if self.highlight.as_ref().is_some_and(|h| h.is_highlighted(node)) {
            RowStyle::Highlighted
        } else if scene.is_active_in_hierarchy(node) {
            RowStyle::Normal
        } else {
            RowStyle::Dimmed
        }
    }

    /// Rows currently visible, in tree order
    pub fn rows(&self, scene: &Scene) -> Vec<Row> {
        let mut rows = Vec::new();
        for &root in scene.roots() {
            self.collect_rows(scene, root, 0, &mut rows);
        }
        rows
    }

    fn collect_rows(&self, scene: &Scene, id: NodeId, depth: usize, rows: &mut Vec<Row>) {
        let Some(node) = scene.get(id) else {
            return;
        };

        // Filter check
        if !self.filter.is_empty() {
            let filter = self.filter.to_lowercase();
            let matches_filter = node.name.to_lowercase().contains(&filter);
            let any_child_matches = node
                .children
                .iter()
                .any(|child| scene.name(*child).to_lowercase().contains(&filter));

            if !matches_filter && !any_child_matches {
                return;
            }
        }

        // Hidden check (based on active flag)
        if !node.active && !self.show_hidden {
            return;
        }

        rows.push(Row {
            node: id,
            depth,
            has_children: !node.children.is_empty(),
        });

        if self.expanded.contains(&id) {
            for &child in &node.children {
                self.collect_rows(scene, child, depth + 1, rows);
            }
        }
    }

    /// Expand every node
    pub fn expand_all(&mut self, scene: &Scene) {
        let mut stack: Vec<NodeId> = scene.roots().to_vec();
        while let Some(id) = stack.pop() {
            self.expanded.insert(id);
            if let Some(node) = scene.get(id) {
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Collapse every node
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Render the hierarchy panel
    pub fn ui(&mut self, ui: &mut egui::Ui, scene: &Scene) {
        if self.highlight.as_mut().is_some_and(ActiveHighlight::take_repaint) {
            ui.ctx().request_repaint();
        }

        // Toolbar
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.filter)
                    .hint_text("Search...")
                    .desired_width(ui.available_width() - 40.0),
            );

            ui.menu_button("...", |ui| {
                ui.checkbox(&mut self.show_hidden, "Show Hidden");
                if ui.button("Expand All").clicked() {
                    self.expand_all(scene);
                    ui.close_menu();
                }
                if ui.button("Collapse All").clicked() {
                    self.collapse_all();
                    ui.close_menu();
                }
            });
        });

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            let rows = self.rows(scene);
            if rows.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No nodes in scene");
                });
                return;
            }

            for row in rows {
                self.render_row(ui, row, scene);
            }
        });
    }

    fn render_row(&mut self, ui: &mut egui::Ui, row: Row, scene: &Scene) {
        let is_selected = self.selected == Some(row.node);
        let is_expanded = self.expanded.contains(&row.node);

        ui.horizontal(|ui| {
            ui.add_space(row.depth as f32 * 16.0);

            if row.has_children {
                let icon = if is_expanded { "v" } else { ">" };
                if ui.small_button(icon).clicked() {
                    if is_expanded {
                        self.expanded.remove(&row.node);
                    } else {
                        self.expanded.insert(row.node);
                    }
                }
            } else {
                ui.add_space(20.0);
            }

            let name = scene.name(row.node);
            let text = match self.row_style(row.node, scene) {
                RowStyle::Highlighted => RichText::new(name)
                    .color(ACTIVE_TEXT)
                    .background_color(ACTIVE_BACKGROUND)
                    .strong()
                    .italics(),
                RowStyle::Normal => RichText::new(name),
                RowStyle::Dimmed => RichText::new(name).color(ui.style().visuals.weak_text_color()),
            };

            let response = ui.selectable_label(is_selected, text);
            if response.clicked() {
                self.selected = Some(row.node);
            }
            response.on_hover_text(scene.path_of(row.node));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepchain::{ChainConfig, FrameInput, Node, StepChain, StepComponent, StepKind};

    fn setup() -> (Scene, StepChain, NodeId, Vec<NodeId>) {
        let mut scene = Scene::new();
        let root = scene.add(Node::new("Chain"), None);
        let steps: Vec<NodeId> = ["Intro", "Outro"]
            .into_iter()
            .map(|name| {
                let hold = StepKind::WaitForInput {
                    keys: vec!["Space".into()],
                };
                scene.add(Node::new(name).with_step(StepComponent::new(hold)), Some(root))
            })
            .collect();
        let chain = StepChain::discover(ChainConfig::named("Tour"), &scene, root).unwrap();
        (scene, chain, root, steps)
    }

    #[test]
    fn test_highlight_follows_active_step() {
        let (mut scene, mut chain, _, steps) = setup();
        let mut highlight = ActiveHighlight::new();

        chain.initialize(&mut scene).unwrap();
        highlight.observe(&chain.snapshot(), &chain.take_events());
        assert!(highlight.is_highlighted(steps[0]));
        assert!(!highlight.is_highlighted(steps[1]));
        assert!(highlight.take_repaint());
        assert!(!highlight.take_repaint());

        chain.update(0.016, &FrameInput::none().with_key("Space"), &mut scene).unwrap();
        highlight.observe(&chain.snapshot(), &chain.take_events());
        assert!(!highlight.is_highlighted(steps[0]));
        assert!(highlight.is_highlighted(steps[1]));

        chain.restart(&mut scene).unwrap();
        highlight.observe(&chain.snapshot(), &chain.take_events());
        assert_eq!(highlight.highlighted().count(), 0);
    }

    #[test]
    fn test_quiet_frame_does_not_request_repaint() {
        let (mut scene, mut chain, _, _) = setup();
        let mut highlight = ActiveHighlight::new();
        chain.initialize(&mut scene).unwrap();
        highlight.observe(&chain.snapshot(), &chain.take_events());
        highlight.take_repaint();

        chain.update(0.016, &FrameInput::none(), &mut scene).unwrap();
        highlight.observe(&chain.snapshot(), &chain.take_events());
        assert!(!highlight.take_repaint());
    }

    #[test]
    fn test_row_style_without_highlight() {
        let (mut scene, mut chain, root, steps) = setup();
        let mut panel = HierarchyPanel::new();
        chain.initialize(&mut scene).unwrap();
        panel.observe(&chain.snapshot(), &chain.take_events());

        // Nothing is highlighted until play mode attaches the highlight
        assert_eq!(panel.row_style(steps[0], &scene), RowStyle::Normal);

        panel.highlight = Some(ActiveHighlight::new());
        panel.observe(&chain.snapshot(), &[]);
        assert_eq!(panel.row_style(steps[0], &scene), RowStyle::Highlighted);

        scene.set_active(root, false);
        assert_eq!(panel.row_style(steps[1], &scene), RowStyle::Dimmed);
    }

    #[test]
    fn test_rows_follow_expansion_and_filter() {
        let (scene, _, root, steps) = setup();
        let mut panel = HierarchyPanel::new();
        assert_eq!(panel.rows(&scene).len(), 1);

        panel.expand_all(&scene);
        let rows = panel.rows(&scene);
        assert_eq!(rows.iter().map(|r| r.node).collect::<Vec<_>>(), vec![root, steps[0], steps[1]]);
        assert_eq!(rows[1].depth, 1);
        assert!(rows[0].has_children);

        panel.filter = "out".into();
        let rows = panel.rows(&scene);
        assert_eq!(rows.iter().map(|r| r.node).collect::<Vec<_>>(), vec![root, steps[1]]);

        panel.collapse_all();
        assert_eq!(panel.rows(&scene).len(), 1);
    }

    #[test]
    fn test_ui_renders_and_consumes_repaint() {
        let (mut scene, mut chain, _, _) = setup();
        let mut panel = HierarchyPanel::new();
        panel.highlight = Some(ActiveHighlight::new());
        panel.expand_all(&scene);
        chain.initialize(&mut scene).unwrap();
        panel.observe(&chain.snapshot(), &chain.take_events());

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel.ui(ui, &scene));
        });
        assert!(!panel.highlight.as_mut().unwrap().take_repaint());
    }

    #[test]
    fn test_hidden_nodes_need_show_hidden() {
        let (mut scene, _, _, steps) = setup();
        let mut panel = HierarchyPanel::new();
        panel.expand_all(&scene);
        scene.set_active(steps[0], false);
        assert_eq!(panel.rows(&scene).len(), 2);

        panel.show_hidden = true;
        assert_eq!(panel.rows(&scene).len(), 3);
    }
}
