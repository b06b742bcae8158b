// SPDX-License-Identifier: MIT OR Apache-2.0
//! Inspector panel - Step component editor.
//!
//! Each step component on the selected node gets a section. A component
//! whose runtime step is active shows an "Active Step!" banner on top.
//! Fields are filtered by kind: an animation step only shows the value
//! field matching its parameter type.

use std::collections::HashSet;

use egui::RichText;
use stepchain::ui::{ACTIVE_BACKGROUND, ACTIVE_TEXT};
use stepchain::{
    ActiveBehaviour, AnimationParam, ChainSnapshot, NodeId, Scene, StepComponent, StepKind, StepView,
};

use crate::property::{self, DrawResult, PropertyMeta};

/// Banner text of an active step
pub const ACTIVE_BANNER: &str = "Active Step!";

/// A field of a step component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Log message
    Message,
    /// Event step ends right after activation
    EndImmediately,
    /// Events fired on activation
    OnActivate,
    /// Events fired on end
    OnEnd,
    /// Events fired on restart
    OnRestart,
    /// Target node path
    Target,
    /// Set-active behaviour
    Behaviour,
    /// Set-active initial state forcing
    ForceInitialState,
    /// Teleport destination
    Destination,
    /// Animator node path
    Animator,
    /// Animator parameter name
    Parameter,
    /// Animator parameter type
    ParamType,
    /// Float value
    FloatValue,
    /// Int value
    IntValue,
    /// Bool value
    BoolValue,
    /// UI color
    Color,
    /// UI sprite
    Sprite,
    /// UI text
    Text,
    /// Append text
    Additive,
    /// Wait duration
    Seconds,
    /// Keys that end a wait
    Keys,
    /// Buttons that end a wait
    Buttons,
}

impl Field {
    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Field::Message => "Message",
            Field::EndImmediately => "End Immediately",
            Field::OnActivate => "On Activate",
            Field::OnEnd => "On End",
            Field::OnRestart => "On Restart",
            Field::Target => "Target",
            Field::Behaviour => "Behaviour",
            Field::ForceInitialState => "Force Initial State",
            Field::Destination => "Destination",
            Field::Animator => "Animator",
            Field::Parameter => "Parameter",
            Field::ParamType => "Parameter Type",
            Field::FloatValue => "Float Value",
            Field::IntValue => "Int Value",
            Field::BoolValue => "Bool Value",
            Field::Color => "Color",
            Field::Sprite => "Sprite",
            Field::Text => "Text",
            Field::Additive => "Additive",
            Field::Seconds => "Seconds",
            Field::Keys => "Keys",
            Field::Buttons => "Buttons",
        }
    }
}

/// Fields shown for a step kind, in display order
pub fn visible_fields(kind: &StepKind) -> Vec<Field> {
    match kind {
        StepKind::Log { .. } => vec![Field::Message],
        StepKind::Event { .. } => vec![Field::EndImmediately, Field::OnActivate, Field::OnEnd, Field::OnRestart],
        StepKind::SetActive { .. } => vec![Field::Target, Field::Behaviour, Field::ForceInitialState],
        StepKind::Teleport { .. } => vec![Field::Target, Field::Destination],
        StepKind::Animation { value, .. } => {
            let mut fields = vec![Field::Animator, Field::Parameter, Field::ParamType];
            match value {
                AnimationParam::Float(_) => fields.push(Field::FloatValue),
                AnimationParam::Int(_) => fields.push(Field::IntValue),
                AnimationParam::Bool(_) => fields.push(Field::BoolValue),
                AnimationParam::Trigger => {}
            }
            fields
        }
        StepKind::Restart => Vec::new(),
        StepKind::Color { .. } => vec![Field::Target, Field::Color],
        StepKind::Image { .. } => vec![Field::Target, Field::Sprite],
        StepKind::Text { .. } => vec![Field::Target, Field::Text, Field::Additive],
        StepKind::Wait { .. } => vec![Field::Seconds],
        StepKind::WaitForInput { .. } => vec![Field::Keys],
        StepKind::WaitForButton { .. } => vec![Field::Buttons],
    }
}

/// Display value of a field, or `None` if the kind has no such field
pub fn field_value(kind: &StepKind, field: Field) -> Option<String> {
    let value = match (kind, field) {
        (StepKind::Log { message }, Field::Message) => message.clone(),
        (StepKind::Event { end_immediately, .. }, Field::EndImmediately) => end_immediately.to_string(),
        (StepKind::Event { on_activate, .. }, Field::OnActivate) => on_activate.join(", "),
        (StepKind::Event { on_end, .. }, Field::OnEnd) => on_end.join(", "),
        (StepKind::Event { on_restart, .. }, Field::OnRestart) => on_restart.join(", "),
        (
            StepKind::SetActive { target, .. }
            | StepKind::Teleport { target, .. }
            | StepKind::Color { target, .. }
            | StepKind::Image { target, .. }
            | StepKind::Text { target, .. },
            Field::Target,
        ) => target.clone(),
        (StepKind::SetActive { behaviour, .. }, Field::Behaviour) => format!("{behaviour:?}"),
        (StepKind::SetActive { force_initial_state, .. }, Field::ForceInitialState) => {
            force_initial_state.to_string()
        }
        (StepKind::Teleport { destination, .. }, Field::Destination) => destination.clone(),
        (StepKind::Animation { animator, .. }, Field::Animator) => animator.clone(),
        (StepKind::Animation { parameter, .. }, Field::Parameter) => parameter.clone(),
        (StepKind::Animation { value, .. }, Field::ParamType) => value.type_name().to_string(),
        (StepKind::Animation { value: AnimationParam::Float(v), .. }, Field::FloatValue) => v.to_string(),
        (StepKind::Animation { value: AnimationParam::Int(v), .. }, Field::IntValue) => v.to_string(),
        (StepKind::Animation { value: AnimationParam::Bool(v), .. }, Field::BoolValue) => v.to_string(),
        (StepKind::Color { color, .. }, Field::Color) => format!("{color:?}"),
        (StepKind::Image { sprite, .. }, Field::Sprite) => sprite.clone().unwrap_or_else(|| "None".to_string()),
        (StepKind::Text { text, .. }, Field::Text) => text.clone(),
        (StepKind::Text { additive, .. }, Field::Additive) => additive.to_string(),
        (StepKind::Wait { seconds }, Field::Seconds) => format!("{seconds}s"),
        (StepKind::WaitForInput { keys }, Field::Keys) => keys.join(", "),
        (StepKind::WaitForButton { buttons }, Field::Buttons) => buttons.join(", "),
        _ => return None,
    };
    Some(value)
}

/// Plain-text rendering of a component section
pub fn describe(component: &StepComponent, active: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if active {
        lines.push(format!("[{ACTIVE_BANNER}]"));
    }

    let mut header = component.kind.label().to_string();
    if !component.enabled {
        header.push_str(" (disabled)");
    }
    lines.push(header);

    for field in visible_fields(&component.kind) {
        if let Some(value) = field_value(&component.kind, field) {
            lines.push(format!("  {}: {value}", field.label()));
        }
    }
    lines
}

/// Runtime views of the steps hosted by a node, in component order
pub fn step_views_for(snapshot: &ChainSnapshot, node: NodeId) -> Vec<&StepView> {
    snapshot.steps.iter().flatten().filter(|s| s.node == node).collect()
}

/// The inspector panel for editing step components
#[derive(Debug)]
pub struct InspectorPanel {
    /// Component sections that are collapsed, by index
    collapsed: HashSet<usize>,
}

impl InspectorPanel {
    /// Create a new inspector panel
    pub fn new() -> Self {
        Self {
            collapsed: HashSet::new(),
        }
    }

    /// Render the inspector for `node`.
    ///
    /// `snapshot` marks active steps. Fields are read-only unless
    /// `editable`. Returns true if a component changed.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        scene: &mut Scene,
        node: Option<NodeId>,
        snapshot: Option<&ChainSnapshot>,
        editable: bool,
    ) -> bool {
        let Some(node_id) = node else {
            ui.centered_and_justified(|ui| {
                ui.label("No node selected");
            });
            return false;
        };

        let path = scene.path_of(node_id);
        let Some(node) = scene.get_mut(node_id) else {
            return false;
        };

        ui.label(RichText::new(&node.name).strong()).on_hover_text(path);
        ui.separator();

        if node.steps.is_empty() {
            ui.label("No step components");
            return false;
        }

        let views = snapshot.map(|s| step_views_for(s, node_id)).unwrap_or_default();
        let mut changed = false;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, component) in node.steps.iter_mut().enumerate() {
                let active = views.get(index).is_some_and(|v| v.active);
                changed |= self.component_section(ui, index, component, active, editable);
            }
        });

        changed
    }

    fn component_section(
        &mut self,
        ui: &mut egui::Ui,
        index: usize,
        component: &mut StepComponent,
        active: bool,
        editable: bool,
    ) -> bool {
        if active {
            let banner = RichText::new(format!("   {ACTIVE_BANNER}"))
                .color(ACTIVE_TEXT)
                .background_color(ACTIVE_BACKGROUND)
                .strong();
            ui.label(banner);
        }

        let mut result = DrawResult::Unchanged;
        let expanded = !self.collapsed.contains(&index);

        ui.horizontal(|ui| {
            let icon = if expanded { "v" } else { ">" };
            if ui.small_button(icon).clicked() {
                if expanded {
                    self.collapsed.insert(index);
                } else {
                    self.collapsed.remove(&index);
                }
            }
            let response = ui.add_enabled(editable, egui::Checkbox::without_text(&mut component.enabled));
            if response.changed() {
                result = DrawResult::Changed;
            }
            ui.label(RichText::new(component.kind.label()).strong());
        });

        if expanded {
            ui.indent(("step_component", index), |ui| {
                for field in visible_fields(&component.kind) {
                    let meta = field_meta(field, editable);
                    result = result.or(draw_field(ui, &mut component.kind, field, &meta));
                }
            });
        }

        ui.separator();
        result.is_changed()
    }
}

impl Default for InspectorPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn field_meta(field: Field, editable: bool) -> PropertyMeta {
    let mut meta = PropertyMeta::new(field.label());
    meta.read_only = !editable;
    match field {
        Field::Seconds => meta.with_min(0.0).with_step(0.05).with_suffix("s"),
        Field::Target | Field::Destination | Field::Animator => meta.with_tooltip("Node path, e.g. Canvas/Label"),
        Field::EndImmediately => meta.with_tooltip("Otherwise another step or the host must end it"),
        _ => meta,
    }
}

fn draw_field(ui: &mut egui::Ui, kind: &mut StepKind, field: Field, meta: &PropertyMeta) -> DrawResult {
    match (kind, field) {
        (StepKind::Log { message }, Field::Message) => property::draw_string(ui, message, meta),
        (StepKind::Event { end_immediately, .. }, Field::EndImmediately) => {
            property::draw_bool(ui, end_immediately, meta)
        }
        (StepKind::Event { on_activate, .. }, Field::OnActivate) => property::draw_string_list(ui, on_activate, meta),
        (StepKind::Event { on_end, .. }, Field::OnEnd) => property::draw_string_list(ui, on_end, meta),
        (StepKind::Event { on_restart, .. }, Field::OnRestart) => property::draw_string_list(ui, on_restart, meta),
        (
            StepKind::SetActive { target, .. }
            | StepKind::Teleport { target, .. }
            | StepKind::Color { target, .. }
            | StepKind::Image { target, .. }
            | StepKind::Text { target, .. },
            Field::Target,
        ) => property::draw_string(ui, target, meta),
        (StepKind::SetActive { behaviour, .. }, Field::Behaviour) => property::draw_enum(
            ui,
            behaviour,
            &[
                (ActiveBehaviour::Activate, "Activate"),
                (ActiveBehaviour::Deactivate, "Deactivate"),
            ],
            meta,
        ),
        (StepKind::SetActive { force_initial_state, .. }, Field::ForceInitialState) => {
            property::draw_bool(ui, force_initial_state, meta)
        }
        (StepKind::Teleport { destination, .. }, Field::Destination) => property::draw_string(ui, destination, meta),
        (StepKind::Animation { animator, .. }, Field::Animator) => property::draw_string(ui, animator, meta),
        (StepKind::Animation { parameter, .. }, Field::Parameter) => property::draw_string(ui, parameter, meta),
        (StepKind::Animation { value, .. }, Field::ParamType) => draw_param_type(ui, value, meta),
        (StepKind::Animation { value: AnimationParam::Float(v), .. }, Field::FloatValue) => {
            property::draw_f32(ui, v, meta)
        }
        (StepKind::Animation { value: AnimationParam::Int(v), .. }, Field::IntValue) => property::draw_i32(ui, v, meta),
        (StepKind::Animation { value: AnimationParam::Bool(v), .. }, Field::BoolValue) => {
            property::draw_bool(ui, v, meta)
        }
        (StepKind::Color { color, .. }, Field::Color) => property::draw_color4(ui, color, meta),
        (StepKind::Image { sprite, .. }, Field::Sprite) => property::draw_optional_string(ui, sprite, meta),
        (StepKind::Text { text, .. }, Field::Text) => property::draw_string(ui, text, meta),
        (StepKind::Text { additive, .. }, Field::Additive) => property::draw_bool(ui, additive, meta),
        (StepKind::Wait { seconds }, Field::Seconds) => property::draw_f32(ui, seconds, meta),
        (StepKind::WaitForInput { keys }, Field::Keys) => property::draw_string_list(ui, keys, meta),
        (StepKind::WaitForButton { buttons }, Field::Buttons) => property::draw_string_list(ui, buttons, meta),
        _ => DrawResult::Unchanged,
    }
}

/// Switching the type resets the value to that type's default
fn draw_param_type(ui: &mut egui::Ui, value: &mut AnimationParam, meta: &PropertyMeta) -> DrawResult {
    let mut type_name = value.type_name();
    let result = property::draw_enum(
        ui,
        &mut type_name,
        &[("Float", "Float"), ("Int", "Int"), ("Bool", "Bool"), ("Trigger", "Trigger")],
        meta,
    );
    if result.is_changed() && type_name != value.type_name() {
        *value = match type_name {
            "Float" => AnimationParam::Float(0.0),
            "Int" => AnimationParam::Int(0),
            "Bool" => AnimationParam::Bool(false),
            _ => AnimationParam::Trigger,
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepchain::{ChainConfig, Node, StepChain};

    fn animation(value: AnimationParam) -> StepKind {
        StepKind::Animation {
            animator: "Player".into(),
            parameter: "speed".into(),
            value,
        }
    }

    #[test]
    fn test_animation_shows_only_matching_value() {
        let float = visible_fields(&animation(AnimationParam::Float(1.5)));
        assert!(float.contains(&Field::FloatValue));
        assert!(!float.contains(&Field::IntValue));
        assert!(!float.contains(&Field::BoolValue));

        let int = visible_fields(&animation(AnimationParam::Int(2)));
        assert!(int.contains(&Field::IntValue));
        assert!(!int.contains(&Field::FloatValue));

        let trigger = visible_fields(&animation(AnimationParam::Trigger));
        assert_eq!(trigger, vec![Field::Animator, Field::Parameter, Field::ParamType]);
    }

    #[test]
    fn test_every_visible_field_has_a_value() {
        let kinds = vec![
            StepKind::Log { message: "hi".into() },
            StepKind::Event {
                end_immediately: true,
                on_activate: vec!["open".into()],
                on_end: Vec::new(),
                on_restart: Vec::new(),
            },
            StepKind::SetActive {
                target: "Door".into(),
                behaviour: ActiveBehaviour::Deactivate,
                force_initial_state: false,
            },
            StepKind::Teleport {
                target: "Player".into(),
                destination: "Spawn".into(),
            },
            animation(AnimationParam::Bool(true)),
            StepKind::Restart,
            StepKind::Color {
                target: "Label".into(),
                color: [1.0, 0.0, 0.0, 1.0],
            },
            StepKind::Image {
                target: "Icon".into(),
                sprite: None,
            },
            StepKind::Text {
                target: "Label".into(),
                text: "Go".into(),
                additive: false,
            },
            StepKind::Wait { seconds: 2.0 },
            StepKind::WaitForInput { keys: vec!["Space".into()] },
            StepKind::WaitForButton { buttons: vec!["Ok".into()] },
        ];

        for kind in &kinds {
            for field in visible_fields(kind) {
                assert!(field_value(kind, field).is_some(), "{} has no {:?}", kind.label(), field);
            }
        }
        assert_eq!(field_value(&StepKind::Restart, Field::Target), None);
    }

    #[test]
    fn test_describe_marks_active_step() {
        let component = StepComponent::new(StepKind::Wait { seconds: 1.5 });
        let lines = describe(&component, true);
        assert_eq!(lines[0], "[Active Step!]");
        assert_eq!(lines[1], "Wait Step");
        assert_eq!(lines[2], "  Seconds: 1.5s");

        let disabled = StepComponent::disabled(StepKind::Restart);
        assert_eq!(describe(&disabled, false), vec!["Restart Step (disabled)".to_string()]);
    }

    #[test]
    fn test_ui_renders_selected_node() {
        let mut scene = Scene::new();
        let root = scene.add(Node::new("Chain"), None);
        let host = scene.add(
            Node::new("Host")
                .with_step(StepComponent::new(animation(AnimationParam::Float(1.0))))
                .with_step(StepComponent::new(StepKind::WaitForInput { keys: vec!["Space".into()] })),
            Some(root),
        );
        let mut chain = StepChain::discover(ChainConfig::default(), &scene, root).unwrap();
        let snapshot = chain.snapshot();
        chain.initialize(&mut scene).unwrap();

        let mut panel = InspectorPanel::new();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert!(!panel.ui(ui, &mut scene, Some(host), Some(&snapshot), false));
                assert!(!panel.ui(ui, &mut scene, None, None, true));
            });
        });
    }

    #[test]
    fn test_step_views_follow_component_order() {
        let mut scene = Scene::new();
        let root = scene.add(Node::new("Chain"), None);
        let hold = || StepKind::WaitForInput { keys: vec!["Space".into()] };
        let host = scene.add(
            Node::new("Host")
                .with_step(StepComponent::new(hold()))
                .with_step(StepComponent::new(hold())),
            Some(root),
        );
        let other = scene.add(Node::new("Other").with_step(StepComponent::new(hold())), Some(root));

        let mut chain = StepChain::discover(ChainConfig::default(), &scene, root).unwrap();
        chain.initialize(&mut scene).unwrap();
        let snapshot = chain.snapshot();

        let views = step_views_for(&snapshot, host);
        assert_eq!(views.len(), 2);
        assert!(views[0].active);
        assert!(!views[1].active);
        assert_eq!(step_views_for(&snapshot, other).len(), 1);
    }
}
