// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step lifecycle.
//!
//! Every step goes through the same lifecycle regardless of its payload:
//! - `activate` runs the payload, unless the host is disabled
//! - `end` finishes the payload and reports completion to the chain
//! - `restart` undoes the payload, ending it first if needed
//!
//! Payloads implement [`StepBehavior`] and only see the hooks. Completion is
//! requested through [`StepContext::end`] and reported to the owning chain as
//! a [`Notice`], which the chain processes after the hook returns.

use crate::chain::ChainId;
use crate::input::FrameInput;
use crate::scene::{NodeId, Scene};
use crate::steps::StepComponent;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub Uuid);

impl StepId {
    /// Create a new random step ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

/// Report from a step to its owning chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The step finished (or was skipped)
    Ended {
        /// Owning chain
        chain: ChainId,
        /// The step that ended
        step: StepId,
    },
    /// The step asked the chain to rewind and play again
    Replay {
        /// Owning chain
        chain: ChainId,
    },
}

/// Context handed to step hooks
pub struct StepContext<'a> {
    /// The host scene
    pub scene: &'a mut Scene,
    node: NodeId,
    name: &'a str,
    end_requested: bool,
    replay_requested: bool,
}

impl<'a> StepContext<'a> {
    fn new(scene: &'a mut Scene, node: NodeId, name: &'a str) -> Self {
        Self {
            scene,
            node,
            name,
            end_requested: false,
            replay_requested: false,
        }
    }

    /// Request that the step ends once the hook returns
    pub fn end(&mut self) {
        self.end_requested = true;
    }

    /// Request that the owning chain rewinds and plays again.
    ///
    /// Processed after any pending end request.
    pub fn restart_chain(&mut self) {
        self.replay_requested = true;
    }

    /// Host node of the step
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Name of the step
    pub fn step_name(&self) -> &str {
        self.name
    }

    /// Resolve a node path, warning when it does not exist
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let found = self.scene.find_path(path);
        if found.is_none() {
            tracing::warn!(step = self.name, path, "Step target not found");
        }
        found
    }
}

/// Payload hooks of a step
pub trait StepBehavior: fmt::Debug {
    /// Short kind label for display
    fn kind(&self) -> &'static str;

    /// Called once when the chain initializes
    fn on_start(&mut self, _ctx: &mut StepContext<'_>) {}

    /// Called when the step becomes active
    fn on_activate(&mut self, _ctx: &mut StepContext<'_>) {}

    /// Called when the step ends
    fn on_end(&mut self, _ctx: &mut StepContext<'_>) {}

    /// Called to return external state to what it was before activation
    fn on_restart(&mut self, _ctx: &mut StepContext<'_>) {}

    /// Called every frame while the step is active
    fn on_update(&mut self, _dt: f32, _input: &FrameInput, _ctx: &mut StepContext<'_>) {}
}

/// A step in a chain
#[derive(Debug)]
pub struct Step {
    id: StepId,
    name: String,
    node: NodeId,
    chain: Option<ChainId>,
    active: bool,
    /// Component enable flag; a disabled step is skipped on activation
    pub enabled: bool,
    behavior: Box<dyn StepBehavior>,
}

impl Step {
    /// Create a step hosted on `node`
    pub fn new(name: impl Into<String>, node: NodeId, behavior: impl StepBehavior + 'static) -> Self {
        Self::boxed(name, node, Box::new(behavior))
    }

    /// Create a step from a boxed behavior
    pub fn boxed(name: impl Into<String>, node: NodeId, behavior: Box<dyn StepBehavior>) -> Self {
        Self {
            id: StepId::new(),
            name: name.into(),
            node,
            chain: None,
            active: false,
            enabled: true,
            behavior,
        }
    }

    /// Instantiate a step from a scene component
    pub fn from_component(name: impl Into<String>, node: NodeId, component: &StepComponent) -> Self {
        let mut step = Self::boxed(name, node, component.kind.instantiate());
        step.enabled = component.enabled;
        step
    }

    /// Step ID
    pub fn id(&self) -> StepId {
        self.id
    }

    /// Step name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Kind label of the payload
    pub fn kind(&self) -> &'static str {
        self.behavior.kind()
    }

    /// Whether the step is active
    pub fn active(&self) -> bool {
        self.active
    }

    /// Owning chain, once assigned
    pub fn chain(&self) -> Option<ChainId> {
        self.chain
    }

    /// Assign the owning chain. Only the first assignment takes effect.
    pub fn set_chain(&mut self, chain: ChainId) {
        if self.chain.is_some() {
            return;
        }
        self.chain = Some(chain);
    }

    /// Whether the step component and its host node are enabled
    pub fn is_host_enabled(&self, scene: &Scene) -> bool {
        self.enabled && scene.is_active_in_hierarchy(self.node)
    }

    /// Run the start hook
    pub fn start(&mut self, scene: &mut Scene) {
        let mut ctx = StepContext::new(scene, self.node, &self.name);
        self.behavior.on_start(&mut ctx);
    }

    /// Activate the step.
    ///
    /// A step whose host is disabled is not activated; it reports completion
    /// right away so the chain moves past it.
    pub fn activate(&mut self, scene: &mut Scene, notices: &mut Vec<Notice>) {
        if !self.is_host_enabled(scene) {
            tracing::debug!(step = %self.name, "Host disabled, skipping step");
            self.report_ended(notices);
            return;
        }

        self.active = true;
        let (end, replay) = {
            let mut ctx = StepContext::new(scene, self.node, &self.name);
            self.behavior.on_activate(&mut ctx);
            (ctx.end_requested, ctx.replay_requested)
        };
        self.apply_requests(end, replay, scene, notices);
    }

    /// End the step. Does nothing if the step is not active.
    pub fn end(&mut self, scene: &mut Scene, notices: &mut Vec<Notice>) {
        if !self.active {
            return;
        }

        let replay = {
            let mut ctx = StepContext::new(scene, self.node, &self.name);
            self.behavior.on_end(&mut ctx);
            ctx.replay_requested
        };
        self.active = false;
        self.report_ended(notices);
        self.apply_requests(false, replay, scene, notices);
    }

    /// Return the step to its initial state, ending it first if active
    pub fn restart(&mut self, scene: &mut Scene, notices: &mut Vec<Notice>) {
        if self.active {
            self.end(scene, notices);
        }
        self.active = false;

        let mut ctx = StepContext::new(scene, self.node, &self.name);
        self.behavior.on_restart(&mut ctx);
    }

    /// Per-frame tick; only active steps are updated
    pub fn update(&mut self, dt: f32, input: &FrameInput, scene: &mut Scene, notices: &mut Vec<Notice>) {
        if !self.active {
            return;
        }

        let (end, replay) = {
            let mut ctx = StepContext::new(scene, self.node, &self.name);
            self.behavior.on_update(dt, input, &mut ctx);
            (ctx.end_requested, ctx.replay_requested)
        };
        self.apply_requests(end, replay, scene, notices);
    }

    fn apply_requests(&mut self, end: bool, replay: bool, scene: &mut Scene, notices: &mut Vec<Notice>) {
        if end {
            self.end(scene, notices);
        }
        if replay {
            if let Some(chain) = self.chain {
                notices.push(Notice::Replay { chain });
            }
        }
    }

    fn report_ended(&self, notices: &mut Vec<Notice>) {
        if let Some(chain) = self.chain {
            notices.push(Notice::Ended { chain, step: self.id });
        }
    }
}
