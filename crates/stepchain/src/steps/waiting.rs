// SPDX-License-Identifier: MIT OR Apache-2.0
//! Steps that wait for time or input before ending.
//!
//! Nothing blocks: the chain ticks the active step once per frame and the
//! step ends itself when its condition is met. Ending or restarting a step
//! early drops whatever it was waiting for.

use crate::input::FrameInput;
use crate::step::{StepBehavior, StepContext};

/// Waits a number of seconds
#[derive(Debug, Clone)]
pub struct WaitStep {
    seconds: f32,
    remaining: Option<f32>,
}

impl WaitStep {
    /// Create a wait step; negative durations are clamped to zero
    pub fn new(seconds: f32) -> Self {
        Self {
            seconds: seconds.max(0.0),
            remaining: None,
        }
    }

    /// Seconds left, while waiting
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }
}

impl StepBehavior for WaitStep {
    fn kind(&self) -> &'static str {
        "Wait"
    }

    fn on_activate(&mut self, _ctx: &mut StepContext<'_>) {
        self.remaining = Some(self.seconds);
    }

    fn on_end(&mut self, _ctx: &mut StepContext<'_>) {
        self.remaining = None;
    }

    fn on_restart(&mut self, _ctx: &mut StepContext<'_>) {
        self.remaining = None;
    }

    fn on_update(&mut self, dt: f32, _input: &FrameInput, ctx: &mut StepContext<'_>) {
        let Some(remaining) = self.remaining.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            ctx.end();
        }
    }
}

/// Waits for one of a set of keys
#[derive(Debug, Clone)]
pub struct WaitForInputStep {
    keys: Vec<String>,
    waiting: bool,
}

impl WaitForInputStep {
    /// Create a wait-for-input step
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys, waiting: false }
    }
}

impl StepBehavior for WaitForInputStep {
    fn kind(&self) -> &'static str {
        "WaitForInput"
    }

    fn on_activate(&mut self, _ctx: &mut StepContext<'_>) {
        self.waiting = true;
    }

    fn on_end(&mut self, _ctx: &mut StepContext<'_>) {
        self.waiting = false;
    }

    fn on_restart(&mut self, _ctx: &mut StepContext<'_>) {
        self.waiting = false;
    }

    fn on_update(&mut self, _dt: f32, input: &FrameInput, ctx: &mut StepContext<'_>) {
        if self.waiting && self.keys.iter().any(|k| input.key_down(k)) {
            ctx.end();
        }
    }
}

/// Waits for a click on one of a set of buttons
#[derive(Debug, Clone)]
pub struct WaitForButtonStep {
    buttons: Vec<String>,
    listening: bool,
}

impl WaitForButtonStep {
    /// Create a wait-for-button step
    pub fn new(buttons: Vec<String>) -> Self {
        Self {
            buttons,
            listening: false,
        }
    }
}

impl StepBehavior for WaitForButtonStep {
    fn kind(&self) -> &'static str {
        "WaitForButton"
    }

    fn on_activate(&mut self, _ctx: &mut StepContext<'_>) {
        self.listening = true;
    }

    fn on_end(&mut self, _ctx: &mut StepContext<'_>) {
        self.listening = false;
    }

    fn on_restart(&mut self, _ctx: &mut StepContext<'_>) {
        self.listening = false;
    }

    fn on_update(&mut self, _dt: f32, input: &FrameInput, ctx: &mut StepContext<'_>) {
        if !self.listening {
            return;
        }
        // Buttons that are inactive in the hierarchy do not deliver clicks
        let scene = &*ctx.scene;
        let pressed = self.buttons.iter().any(|b| {
            input.was_clicked(b)
                && scene
                    .find_path(b)
                    .is_some_and(|node| scene.is_active_in_hierarchy(node))
        });
        if pressed {
            ctx.end();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ChainConfig;
    use crate::input::FrameInput;
    use crate::scene::{Node, NodeId, Scene};
    use crate::steps::{StepComponent, StepKind};
    use crate::StepChain;

    fn chain_with(kinds: Vec<StepKind>) -> (Scene, StepChain) {
        let mut scene = Scene::new();
        let root = scene.add(Node::new("Chain"), None);
        for (i, kind) in kinds.into_iter().enumerate() {
            scene.add(Node::new(format!("Step{i}")).with_step(StepComponent::new(kind)), Some(root));
        }
        let chain = StepChain::discover(ChainConfig::default(), &scene, root).unwrap();
        (scene, chain)
    }

    #[test]
    fn test_wait_step_ends_after_duration() {
        let (mut scene, mut chain) = chain_with(vec![
            StepKind::Wait { seconds: 1.0 },
            StepKind::Wait { seconds: 1.0 },
        ]);
        chain.initialize(&mut scene).unwrap();
        let idle = FrameInput::none();

        chain.update(0.5, &idle, &mut scene).unwrap();
        assert_eq!(chain.current_index(), Some(0));

        chain.update(0.6, &idle, &mut scene).unwrap();
        assert_eq!(chain.current_index(), Some(1));

        // The second wait starts from its full duration
        chain.update(0.75, &idle, &mut scene).unwrap();
        assert_eq!(chain.current_index(), Some(1));
        chain.update(0.25, &idle, &mut scene).unwrap();
        assert!(!chain.is_playing());
    }

    #[test]
    fn test_zero_wait_ends_on_next_frame() {
        let (mut scene, mut chain) = chain_with(vec![StepKind::Wait { seconds: 0.0 }]);
        chain.initialize(&mut scene).unwrap();
        assert!(chain.is_playing());

        chain.update(0.0, &FrameInput::none(), &mut scene).unwrap();
        assert!(!chain.is_playing());
    }

    #[test]
    fn test_restarted_wait_is_cancelled() {
        let (mut scene, mut chain) = chain_with(vec![StepKind::Wait { seconds: 1.0 }]);
        chain.initialize(&mut scene).unwrap();
        chain.update(0.9, &FrameInput::none(), &mut scene).unwrap();

        chain.restart(&mut scene).unwrap();
        chain.update(5.0, &FrameInput::none(), &mut scene).unwrap();
        assert_eq!(chain.current_index(), None);
        assert!(chain.steps().flatten().all(|s| !s.active()));
    }

    #[test]
    fn test_wait_for_input_needs_listed_key() {
        let (mut scene, mut chain) = chain_with(vec![StepKind::WaitForInput {
            keys: vec!["Space".into(), "Return".into()],
        }]);
        chain.initialize(&mut scene).unwrap();

        chain.update(0.016, &FrameInput::none().with_key("Escape"), &mut scene).unwrap();
        assert!(chain.is_playing());

        chain.update(0.016, &FrameInput::none().with_key("Return"), &mut scene).unwrap();
        assert!(!chain.is_playing());
    }

    fn add_buttons(scene: &mut Scene) -> (NodeId, NodeId) {
        let canvas = scene.add(Node::new("Canvas"), None);
        let ok = scene.add(Node::new("Ok"), Some(canvas));
        scene.add(Node::new("Cancel"), Some(canvas));
        (canvas, ok)
    }

    #[test]
    fn test_wait_for_button_needs_listed_button() {
        let (mut scene, mut chain) = chain_with(vec![StepKind::WaitForButton {
            buttons: vec!["Canvas/Ok".into()],
        }]);
        add_buttons(&mut scene);
        chain.initialize(&mut scene).unwrap();

        chain.update(0.016, &FrameInput::none().with_click("Canvas/Cancel"), &mut scene).unwrap();
        assert!(chain.is_playing());

        chain.update(0.016, &FrameInput::none().with_click("Canvas/Ok"), &mut scene).unwrap();
        assert!(!chain.is_playing());
    }

    #[test]
    fn test_wait_for_button_ignores_inactive_button() {
        let (mut scene, mut chain) = chain_with(vec![StepKind::WaitForButton {
            buttons: vec!["Canvas/Ok".into(), "Canvas/Missing".into()],
        }]);
        let (canvas, ok) = add_buttons(&mut scene);
        scene.set_active(ok, false);
        chain.initialize(&mut scene).unwrap();
        let click = FrameInput::none().with_click("Canvas/Ok").with_click("Canvas/Missing");

        chain.update(0.016, &click, &mut scene).unwrap();
        assert!(chain.is_playing());

        scene.set_active(ok, true);
        scene.set_active(canvas, false);
        chain.update(0.016, &click, &mut scene).unwrap();
        assert!(chain.is_playing());

        scene.set_active(canvas, true);
        chain.update(0.016, &click, &mut scene).unwrap();
        assert!(!chain.is_playing());
    }
}
