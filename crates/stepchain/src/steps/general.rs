// SPDX-License-Identifier: MIT OR Apache-2.0
//! General-purpose steps: logging, events, node toggles, teleports,
//! animator parameters and chain restarts.

use super::{ActiveBehaviour, AnimationParam};
use crate::scene::{Animator, AnimatorValue};
use crate::step::{StepBehavior, StepContext};

/// Logs a message, then ends
#[derive(Debug, Clone)]
pub struct LogStep {
    message: String,
}

impl LogStep {
    /// Create a log step
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl StepBehavior for LogStep {
    fn kind(&self) -> &'static str {
        "Log"
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        tracing::info!("[{}] {}", ctx.step_name(), self.message);
        ctx.end();
    }
}

/// Fires named events on activation, end and restart
#[derive(Debug, Clone, Default)]
pub struct EventStep {
    /// End right after activation
    pub end_immediately: bool,
    /// Events fired on activation
    pub on_activate: Vec<String>,
    /// Events fired on end
    pub on_end: Vec<String>,
    /// Events fired on restart
    pub on_restart: Vec<String>,
}

fn fire(ctx: &mut StepContext<'_>, events: &[String]) {
    for event in events {
        ctx.scene.emit_event(event.clone());
    }
}

impl StepBehavior for EventStep {
    fn kind(&self) -> &'static str {
        "Event"
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        fire(ctx, &self.on_activate);
        if self.end_immediately {
            ctx.end();
        }
    }

    fn on_end(&mut self, ctx: &mut StepContext<'_>) {
        fire(ctx, &self.on_end);
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        fire(ctx, &self.on_restart);
    }
}

/// Turns a node on or off
#[derive(Debug, Clone)]
pub struct SetActiveStep {
    target: String,
    behaviour: ActiveBehaviour,
    force_initial_state: bool,
    prev_state: Option<bool>,
}

impl SetActiveStep {
    /// Create a set-active step
    pub fn new(target: impl Into<String>, behaviour: ActiveBehaviour, force_initial_state: bool) -> Self {
        Self {
            target: target.into(),
            behaviour,
            force_initial_state,
            prev_state: None,
        }
    }
}

impl StepBehavior for SetActiveStep {
    fn kind(&self) -> &'static str {
        "SetActive"
    }

    fn on_start(&mut self, ctx: &mut StepContext<'_>) {
        let Some(node) = ctx.resolve(&self.target) else {
            return;
        };
        if self.force_initial_state {
            ctx.scene.set_active(node, !self.behaviour.target_state());
        }
        self.prev_state = ctx.scene.get(node).map(|n| n.active);
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        if let Some(node) = ctx.resolve(&self.target) {
            self.prev_state = ctx.scene.get(node).map(|n| n.active);
            ctx.scene.set_active(node, self.behaviour.target_state());
        }
        ctx.end();
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        let Some(prev) = self.prev_state else {
            return;
        };
        if let Some(node) = ctx.resolve(&self.target) {
            ctx.scene.set_active(node, prev);
        }
    }
}

/// Moves a node to another node's position
#[derive(Debug, Clone)]
pub struct TeleportStep {
    target: String,
    destination: String,
    prev_position: Option<[f32; 3]>,
}

impl TeleportStep {
    /// Create a teleport step
    pub fn new(target: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            destination: destination.into(),
            prev_position: None,
        }
    }
}

impl StepBehavior for TeleportStep {
    fn kind(&self) -> &'static str {
        "Teleport"
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        let target = ctx.resolve(&self.target);
        let destination = ctx
            .resolve(&self.destination)
            .and_then(|d| ctx.scene.get(d))
            .map(|d| d.position);

        if let (Some(node), Some(position)) = (target.and_then(|t| ctx.scene.get_mut(t)), destination) {
            self.prev_position = Some(node.position);
            node.position = position;
        }
        ctx.end();
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        let Some(prev) = self.prev_position.take() else {
            return;
        };
        if let Some(node) = ctx.resolve(&self.target).and_then(|t| ctx.scene.get_mut(t)) {
            node.position = prev;
        }
    }
}

/// Sets an animator parameter or fires a trigger
#[derive(Debug, Clone)]
pub struct AnimationStep {
    animator: String,
    parameter: String,
    value: AnimationParam,
    prev_value: Option<AnimatorValue>,
}

impl AnimationStep {
    /// Create an animation step
    pub fn new(animator: impl Into<String>, parameter: impl Into<String>, value: AnimationParam) -> Self {
        Self {
            animator: animator.into(),
            parameter: parameter.into(),
            value,
            prev_value: None,
        }
    }

    fn animator_mut<'s>(&self, ctx: &'s mut StepContext<'_>) -> Option<&'s mut Animator> {
        let node = ctx.resolve(&self.animator)?;
        let animator = ctx.scene.get_mut(node)?.animator.as_mut();
        if animator.is_none() {
            tracing::warn!(path = %self.animator, "Node has no animator");
        }
        animator
    }
}

impl StepBehavior for AnimationStep {
    fn kind(&self) -> &'static str {
        "Animation"
    }

    fn on_start(&mut self, ctx: &mut StepContext<'_>) {
        if matches!(self.value, AnimationParam::Trigger) {
            return;
        }
        let prev = self.animator_mut(ctx).and_then(|a| a.get(&self.parameter));
        self.prev_value = prev;
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        let value = self.value;
        let parameter = self.parameter.clone();
        if let Some(animator) = self.animator_mut(ctx) {
            let prev = animator.get(&parameter);
            match value {
                AnimationParam::Float(v) => animator.set(&parameter, AnimatorValue::Float(v)),
                AnimationParam::Int(v) => animator.set(&parameter, AnimatorValue::Int(v)),
                AnimationParam::Bool(v) => animator.set(&parameter, AnimatorValue::Bool(v)),
                AnimationParam::Trigger => animator.trigger(&parameter),
            }
            if !matches!(value, AnimationParam::Trigger) {
                self.prev_value = prev;
            }
        }
        ctx.end();
    }

    fn on_restart(&mut self, ctx: &mut StepContext<'_>) {
        let Some(prev) = self.prev_value else {
            return;
        };
        let parameter = self.parameter.clone();
        if let Some(animator) = self.animator_mut(ctx) {
            animator.set(&parameter, prev);
        }
    }
}

/// Ends itself, then rewinds the chain and plays it again
#[derive(Debug, Clone, Copy, Default)]
pub struct RestartStep;

impl StepBehavior for RestartStep {
    fn kind(&self) -> &'static str {
        "Restart"
    }

    fn on_activate(&mut self, ctx: &mut StepContext<'_>) {
        ctx.end();
        ctx.restart_chain();
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ChainConfig;
    use crate::scene::{Animator, AnimatorValue, Node, NodeId, Scene};
    use crate::steps::{ActiveBehaviour, AnimationParam, StepComponent, StepKind};
    use crate::StepChain;

    fn chain_with(scene: &mut Scene, kinds: Vec<StepKind>) -> StepChain {
        let root = scene.add(Node::new("Chain"), None);
        for (i, kind) in kinds.into_iter().enumerate() {
            let node = Node::new(format!("Step{i}")).with_step(StepComponent::new(kind));
            scene.add(node, Some(root));
        }
        let mut config = ChainConfig::named("Test");
        config.play_on_start = false;
        let mut chain = StepChain::discover(config, scene, root).unwrap();
        chain.initialize(scene).unwrap();
        chain
    }

    fn wait_forever() -> StepKind {
        StepKind::WaitForInput { keys: vec!["Never".into()] }
    }

    #[test]
    fn test_event_step_fires_events() {
        let mut scene = Scene::new();
        let mut chain = chain_with(
            &mut scene,
            vec![
                StepKind::Event {
                    end_immediately: true,
                    on_activate: vec!["opened".into()],
                    on_end: vec!["closed".into()],
                    on_restart: vec!["reset".into()],
                },
                wait_forever(),
            ],
        );

        chain.play(&mut scene).unwrap();
        assert_eq!(scene.take_events(), vec!["opened", "closed"]);
        assert_eq!(chain.current_index(), Some(1));

        chain.restart(&mut scene).unwrap();
        assert_eq!(scene.take_events(), vec!["reset"]);
    }

    #[test]
    fn test_event_step_waits_for_external_end() {
        let mut scene = Scene::new();
        let mut chain = chain_with(
            &mut scene,
            vec![StepKind::Event {
                end_immediately: false,
                on_activate: Vec::new(),
                on_end: Vec::new(),
                on_restart: Vec::new(),
            }],
        );

        chain.play(&mut scene).unwrap();
        assert!(chain.is_playing());

        let id = chain.current_step().unwrap().id();
        chain.end_step(id, &mut scene).unwrap();
        assert!(!chain.is_playing());
    }

    #[test]
    fn test_set_active_step_restores_on_restart() {
        let mut scene = Scene::new();
        let door = scene.add(Node::new("Door"), None);
        let mut chain = chain_with(
            &mut scene,
            vec![
                StepKind::SetActive {
                    target: "Door".into(),
                    behaviour: ActiveBehaviour::Deactivate,
                    force_initial_state: false,
                },
                wait_forever(),
            ],
        );

        chain.play(&mut scene).unwrap();
        assert!(!scene.get(door).unwrap().active);

        chain.restart(&mut scene).unwrap();
        assert!(scene.get(door).unwrap().active);
    }

    #[test]
    fn test_set_active_step_forces_initial_state() {
        let mut scene = Scene::new();
        let door = scene.add(Node::new("Door"), None);
        chain_with(
            &mut scene,
            vec![StepKind::SetActive {
                target: "Door".into(),
                behaviour: ActiveBehaviour::Activate,
                force_initial_state: true,
            }],
        );
        assert!(!scene.get(door).unwrap().active);
    }

    #[test]
    fn test_teleport_step_moves_and_restores() {
        let mut scene = Scene::new();
        let player = scene.add(Node::new("Player").with_position([1.0, 0.0, 0.0]), None);
        scene.add(Node::new("Spawn").with_position([5.0, 2.0, -1.0]), None);
        let mut chain = chain_with(
            &mut scene,
            vec![
                StepKind::Teleport {
                    target: "Player".into(),
                    destination: "Spawn".into(),
                },
                wait_forever(),
            ],
        );

        chain.play(&mut scene).unwrap();
        assert_eq!(scene.get(player).unwrap().position, [5.0, 2.0, -1.0]);

        chain.restart(&mut scene).unwrap();
        assert_eq!(scene.get(player).unwrap().position, [1.0, 0.0, 0.0]);
    }

    fn animated_scene() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let mut animator = Animator::default();
        animator.set("speed", AnimatorValue::Float(1.0));
        let hero = scene.add(Node::new("Hero").with_animator(animator), None);
        (scene, hero)
    }

    #[test]
    fn test_animation_step_sets_and_restores_param() {
        let (mut scene, hero) = animated_scene();
        let mut chain = chain_with(
            &mut scene,
            vec![
                StepKind::Animation {
                    animator: "Hero".into(),
                    parameter: "speed".into(),
                    value: AnimationParam::Float(3.5),
                },
                wait_forever(),
            ],
        );

        chain.play(&mut scene).unwrap();
        let animator = scene.get(hero).unwrap().animator.as_ref().unwrap();
        assert_eq!(animator.get("speed"), Some(AnimatorValue::Float(3.5)));

        chain.restart(&mut scene).unwrap();
        let animator = scene.get(hero).unwrap().animator.as_ref().unwrap();
        assert_eq!(animator.get("speed"), Some(AnimatorValue::Float(1.0)));
    }

    #[test]
    fn test_animation_step_fires_trigger() {
        let (mut scene, hero) = animated_scene();
        let mut chain = chain_with(
            &mut scene,
            vec![StepKind::Animation {
                animator: "Hero".into(),
                parameter: "jump".into(),
                value: AnimationParam::Trigger,
            }],
        );

        chain.play(&mut scene).unwrap();
        let animator = scene.get(hero).unwrap().animator.as_ref().unwrap();
        assert_eq!(animator.fired_triggers, vec!["jump"]);
        assert!(animator.get("jump").is_none());
    }

    #[test]
    fn test_missing_target_still_completes() {
        let mut scene = Scene::new();
        let mut chain = chain_with(
            &mut scene,
            vec![StepKind::Teleport {
                target: "Nobody".into(),
                destination: "Nowhere".into(),
            }],
        );

        chain.play(&mut scene).unwrap();
        assert!(!chain.is_playing());
    }

    #[test]
    fn test_restart_step_replays_chain() {
        let mut scene = Scene::new();
        let mut chain = chain_with(
            &mut scene,
            vec![
                StepKind::Event {
                    end_immediately: true,
                    on_activate: vec!["intro".into()],
                    on_end: Vec::new(),
                    on_restart: Vec::new(),
                },
                StepKind::Wait { seconds: 1.0 },
                StepKind::Restart,
                wait_forever(),
            ],
        );

        chain.play(&mut scene).unwrap();
        assert_eq!(scene.take_events(), vec!["intro"]);
        assert_eq!(chain.current_index(), Some(1));

        chain.update(1.5, &Default::default(), &mut scene).unwrap();
        assert_eq!(scene.take_events(), vec!["intro"]);
        assert_eq!(chain.current_index(), Some(1));
    }
}
