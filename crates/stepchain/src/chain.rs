// SPDX-License-Identifier: MIT OR Apache-2.0
//! The step chain sequencer.
//!
//! A chain owns an ordered list of step slots and walks it one step at a
//! time. Steps report completion as [`Notice`]s; the chain processes them
//! depth-first after each lifecycle call, so a step that ends inside its own
//! activation hands over to the next step before anything else happens.

use crate::config::ChainConfig;
use crate::error::{Result, StepChainError};
use crate::event::{ChainEvent, ChainSnapshot, StepView};
use crate::input::FrameInput;
use crate::scene::{NodeId, Scene};
use crate::step::{Notice, Step, StepId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Unique identifier for a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub Uuid);

impl ChainId {
    /// Create a new random chain ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainState {
    /// Not playing, nothing applied
    #[default]
    Idle,
    /// Playing; the step at this index is active or about to be
    Playing(usize),
    /// Ran off the end; every step has completed
    Finished,
}

impl ChainState {
    /// Current index, only while playing
    pub fn current_index(&self) -> Option<usize> {
        match self {
            ChainState::Playing(index) => Some(*index),
            ChainState::Idle | ChainState::Finished => None,
        }
    }

    /// Whether the chain is playing
    pub fn is_playing(&self) -> bool {
        matches!(self, ChainState::Playing(_))
    }
}

/// An ordered chain of steps
#[derive(Debug)]
pub struct StepChain {
    id: ChainId,
    config: ChainConfig,
    root: Option<NodeId>,
    steps: Vec<Option<Step>>,
    state: ChainState,
    events: Vec<ChainEvent>,
    cascade: usize,
}

impl StepChain {
    /// Create an empty chain
    pub fn new(config: ChainConfig) -> Self {
        Self {
            id: ChainId::new(),
            config,
            root: None,
            steps: Vec::new(),
            state: ChainState::Idle,
            events: Vec::new(),
            cascade: 0,
        }
    }

    /// Build a chain from the step components found below `root`.
    ///
    /// Nodes are visited depth-first in hierarchy order; within a node,
    /// steps keep their component order. Steps on `root` itself are not part
    /// of the chain.
    pub fn discover(config: ChainConfig, scene: &Scene, root: NodeId) -> Result<Self> {
        if scene.get(root).is_none() {
            return Err(StepChainError::NodeNotFound(root));
        }

        let mut chain = Self::new(config);
        chain.root = Some(root);

        for node_id in scene.descendants(root) {
            let Some(node) = scene.get(node_id) else {
                continue;
            };
            for component in &node.steps {
                chain.add_step(Step::from_component(node.name.clone(), node_id, component), None)?;
            }
        }

        tracing::debug!(chain = %chain.config.name, steps = chain.steps.len(), "Discovered steps");
        Ok(chain)
    }

    /// Run every step's start hook, then play if configured to
    pub fn initialize(&mut self, scene: &mut Scene) -> Result<()> {
        for step in self.steps.iter_mut().flatten() {
            step.start(scene);
        }

        if self.config.play_on_start {
            self.play(scene)?;
        }
        Ok(())
    }

    /// Chain ID
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Chain name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Chain settings
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Node the chain was discovered from
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Sequencer state
    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Whether the chain is playing
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Index of the current step, while playing
    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    /// The current step, while playing
    pub fn current_step(&self) -> Option<&Step> {
        self.current_index().and_then(|i| self.step_at(i))
    }

    /// Number of slots (including destroyed ones)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no slots
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at an index, if the slot is alive
    pub fn step_at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index).and_then(Option::as_ref)
    }

    /// Step by ID
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.index_of(id).and_then(|i| self.step_at(i))
    }

    /// Index of a step
    pub fn index_of(&self, id: StepId) -> Option<usize> {
        self.steps
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.id() == id))
    }

    /// Slots in chain order
    pub fn steps(&self) -> impl Iterator<Item = Option<&Step>> {
        self.steps.iter().map(Option::as_ref)
    }

    /// Take queued events, oldest first
    pub fn take_events(&mut self) -> Vec<ChainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for observers
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            name: self.config.name.clone(),
            playing: self.is_playing(),
            current_index: self.current_index(),
            steps: self
                .steps
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|s| StepView {
                        id: s.id(),
                        name: s.name().to_string(),
                        kind: s.kind(),
                        node: s.node(),
                        active: s.active(),
                        enabled: s.enabled,
                    })
                })
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Step list

    /// Add a step at `index`, or at the end when `index` is out of range.
    ///
    /// Inserting at or before the current step shifts the current index so
    /// the same step stays current.
    pub fn add_step(&mut self, mut step: Step, index: Option<usize>) -> Result<StepId> {
        let id = step.id();
        if self.index_of(id).is_some() {
            return Err(StepChainError::DuplicateStep(id));
        }
        if step.chain().is_some_and(|owner| owner != self.id) {
            return Err(StepChainError::ForeignStep(id));
        }
        step.set_chain(self.id);

        match index.filter(|&i| i < self.steps.len()) {
            Some(i) => {
                self.steps.insert(i, Some(step));
                if let ChainState::Playing(current) = self.state {
                    if i <= current {
                        self.state = ChainState::Playing(current + 1);
                    }
                }
            }
            None => self.steps.push(Some(step)),
        }
        Ok(id)
    }

    /// Remove a step from the chain and hand it back
    pub fn delete_step(&mut self, id: StepId) -> Result<Step> {
        let index = self.require_index(id)?;
        if let ChainState::Playing(current) = self.state {
            if current == index {
                return Err(StepChainError::StepInUse(id));
            }
            if index < current {
                self.state = ChainState::Playing(current - 1);
            }
        }

        self.steps
            .remove(index)
            .ok_or_else(|| self.not_in_chain(id))
    }

    /// Destroy a step, leaving an empty slot that advancing skips.
    ///
    /// The step is taken out of its slot before it ends, so nothing its end
    /// sets off can reach it again. If it was current the chain moves on.
    pub fn destroy_step(&mut self, id: StepId, scene: &mut Scene) -> Result<()> {
        let index = self.require_index(id)?;
        self.cascade = 0;

        let Some(mut step) = self.steps[index].take() else {
            return Ok(());
        };
        // Reports from a detached step have no slot to advance.
        let mut discarded = Vec::new();
        step.end(scene, &mut discarded);
        tracing::debug!(chain = %self.config.name, index, "Destroyed step");

        let mut notices = Vec::new();
        if self.state == ChainState::Playing(index) {
            self.advance_from(index, id, scene, &mut notices);
        }
        self.drain(scene, notices)
    }

    // ------------------------------------------------------------------
    // Playback

    /// Start from the first step, rewinding first if anything was applied
    pub fn play(&mut self, scene: &mut Scene) -> Result<()> {
        self.cascade = 0;
        let mut notices = Vec::new();
        self.start_internal(scene, &mut notices);
        self.drain(scene, notices)
    }

    /// Completion report from a step.
    ///
    /// Ignored unless the chain is playing and `step` is the current step.
    pub fn step_ended(&mut self, step: StepId, scene: &mut Scene) -> Result<()> {
        self.cascade = 0;
        let mut notices = Vec::new();
        self.handle_step_ended(step, scene, &mut notices);
        self.drain(scene, notices)
    }

    /// Rewind to idle, restarting steps from the current one down to the first
    pub fn restart(&mut self, scene: &mut Scene) -> Result<()> {
        self.cascade = 0;
        self.rewind_internal(scene);
        Ok(())
    }

    /// Rewind, then play from the first step
    pub fn replay(&mut self, scene: &mut Scene) -> Result<()> {
        self.cascade = 0;
        let mut notices = Vec::new();
        self.handle_replay(scene, &mut notices);
        self.drain(scene, notices)
    }

    /// Stop the chain because its host was disabled
    pub fn disable(&mut self, scene: &mut Scene) -> Result<()> {
        self.restart(scene)
    }

    /// Jump to `target`, leaving earlier steps completed and later ones reset.
    ///
    /// From `Idle` the chain acts as if positioned before the first step;
    /// from `Finished`, as if positioned after the last one.
    pub fn go_to_step(&mut self, target: StepId, scene: &mut Scene) -> Result<()> {
        let Some(target_index) = self.index_of(target) else {
            let err = self.not_in_chain(target);
            tracing::error!("{err}");
            return Err(err);
        };
        self.cascade = 0;

        let from: isize = match self.state {
            ChainState::Playing(current) if current == target_index => return Ok(()),
            ChainState::Playing(current) => current as isize,
            ChainState::Idle => -1,
            ChainState::Finished => self.steps.len() as isize,
        };
        let target_pos = target_index as isize;

        tracing::debug!(chain = %self.config.name, from, to = target_index, "Going to step");
        self.set_current(ChainState::Playing(target_index));

        if from < target_pos {
            if from >= 0 {
                self.end_at(from as usize, scene)?;
            }
            for i in (from + 1) as usize..target_index {
                if !self.redirect_guard(target_index) {
                    return Ok(());
                }
                self.activate_and_drain(i, scene)?;
                self.end_at(i, scene)?;
            }
        } else {
            let top = (from as usize).min(self.steps.len() - 1);
            for i in (target_index + 1..=top).rev() {
                if !self.redirect_guard(target_index) {
                    return Ok(());
                }
                self.restart_at(i, scene)?;
            }
        }

        if self.redirect_guard(target_index) {
            self.activate_and_drain(target_index, scene)?;
        }
        Ok(())
    }

    /// End a step from outside, e.g. an event step waiting on game logic
    pub fn end_step(&mut self, id: StepId, scene: &mut Scene) -> Result<()> {
        let index = self.require_index(id)?;
        self.cascade = 0;
        self.end_at(index, scene)
    }

    /// Per-frame tick for the active step
    pub fn update(&mut self, dt: f32, input: &FrameInput, scene: &mut Scene) -> Result<()> {
        let Some(index) = self.current_index() else {
            return Ok(());
        };
        self.cascade = 0;

        let mut notices = Vec::new();
        if let Some(step) = self.steps[index].as_mut() {
            step.update(dt, input, scene, &mut notices);
        }
        self.drain(scene, notices)
    }

    /// Enable or disable a step component. Disabling an active step ends it.
    pub fn set_step_enabled(&mut self, id: StepId, enabled: bool, scene: &mut Scene) -> Result<()> {
        let index = self.require_index(id)?;
        self.cascade = 0;

        let mut notices = Vec::new();
        if let Some(step) = self.steps[index].as_mut() {
            step.enabled = enabled;
            if !enabled {
                step.end(scene, &mut notices);
            }
        }
        self.drain(scene, notices)
    }

    /// Activate or deactivate a scene node. Ends the active step if its host
    /// is no longer active in the hierarchy.
    pub fn set_node_active(&mut self, node: NodeId, active: bool, scene: &mut Scene) -> Result<()> {
        if !scene.set_active(node, active) {
            return Err(StepChainError::NodeNotFound(node));
        }
        if active {
            return Ok(());
        }
        self.cascade = 0;

        let mut notices = Vec::new();
        if let Some(index) = self.current_index() {
            if let Some(step) = self.steps[index].as_mut() {
                if step.active() && !step.is_host_enabled(scene) {
                    step.end(scene, &mut notices);
                }
            }
        }
        self.drain(scene, notices)
    }

    // ------------------------------------------------------------------
    // Internals

    fn require_index(&self, id: StepId) -> Result<usize> {
        self.index_of(id).ok_or_else(|| self.not_in_chain(id))
    }

    fn not_in_chain(&self, id: StepId) -> StepChainError {
        StepChainError::StepNotInChain {
            chain: self.config.name.clone(),
            step: format!("{:?}", id.0),
        }
    }

    fn next_alive(&self, after: Option<usize>) -> Option<usize> {
        let start = after.map_or(0, |i| i + 1);
        (start..self.steps.len()).find(|&i| self.steps[i].is_some())
    }

    fn set_current(&mut self, state: ChainState) {
        self.state = state;
        self.events.push(ChainEvent::CurrentChanged {
            index: state.current_index(),
        });
    }

    fn redirect_guard(&self, target: usize) -> bool {
        self.state == ChainState::Playing(target)
    }

    fn start_internal(&mut self, scene: &mut Scene, notices: &mut Vec<Notice>) {
        let Some(first) = self.next_alive(None) else {
            return;
        };
        if self.state != ChainState::Idle {
            self.rewind_internal(scene);
        }

        tracing::debug!(chain = %self.config.name, "Playing");
        self.events.push(ChainEvent::Started);
        self.set_current(ChainState::Playing(first));
        self.activate_at(first, scene, notices);
    }

    fn rewind_internal(&mut self, scene: &mut Scene) {
        let top = match self.state {
            ChainState::Playing(current) => Some(current),
            ChainState::Finished => self.steps.len().checked_sub(1),
            ChainState::Idle => None,
        };
        self.set_current(ChainState::Idle);

        // Completion reports raised while rewinding have no current step to
        // advance, so they are dropped.
        let mut discarded = Vec::new();
        if let Some(top) = top {
            for index in (0..=top).rev() {
                if let Some(step) = self.steps[index].as_mut() {
                    step.restart(scene, &mut discarded);
                    self.events.push(ChainEvent::StepRestarted { index, step: step.id() });
                }
            }
        }

        tracing::debug!(chain = %self.config.name, "Rewound");
        self.events.push(ChainEvent::Rewound);
    }

    fn activate_at(&mut self, index: usize, scene: &mut Scene, notices: &mut Vec<Notice>) {
        let Some(step) = self.steps[index].as_mut() else {
            return;
        };

        let event = if step.is_host_enabled(scene) {
            tracing::debug!(step = %step.name(), index, "Activating step");
            ChainEvent::StepActivated { index, step: step.id() }
        } else {
            ChainEvent::StepSkipped { index, step: step.id() }
        };
        self.events.push(event);
        step.activate(scene, notices);
    }

    fn activate_and_drain(&mut self, index: usize, scene: &mut Scene) -> Result<()> {
        let mut notices = Vec::new();
        self.activate_at(index, scene, &mut notices);
        self.drain(scene, notices)
    }

    fn end_at(&mut self, index: usize, scene: &mut Scene) -> Result<()> {
        let mut notices = Vec::new();
        if let Some(step) = self.steps[index].as_mut() {
            step.end(scene, &mut notices);
        }
        self.drain(scene, notices)
    }

    fn restart_at(&mut self, index: usize, scene: &mut Scene) -> Result<()> {
        let mut notices = Vec::new();
        if let Some(step) = self.steps[index].as_mut() {
            step.restart(scene, &mut notices);
            self.events.push(ChainEvent::StepRestarted { index, step: step.id() });
        }
        self.drain(scene, notices)
    }

    fn handle_step_ended(&mut self, step: StepId, scene: &mut Scene, notices: &mut Vec<Notice>) {
        let ChainState::Playing(current) = self.state else {
            return;
        };
        // A step that is still active has not ended; only its own `end`
        // may report completion.
        match self.step_at(current) {
            Some(s) if s.id() == step && !s.active() => {}
            _ => return,
        }
        self.advance_from(current, step, scene, notices);
    }

    fn advance_from(
        &mut self,
        current: usize,
        step: StepId,
        scene: &mut Scene,
        notices: &mut Vec<Notice>,
    ) {
        self.events.push(ChainEvent::StepEnded { index: current, step });
        match self.next_alive(Some(current)) {
            Some(next) => {
                self.set_current(ChainState::Playing(next));
                self.activate_at(next, scene, notices);
            }
            None => {
                tracing::debug!(chain = %self.config.name, "Finished");
                self.set_current(ChainState::Finished);
                self.events.push(ChainEvent::Finished);
            }
        }
    }

    fn handle_replay(&mut self, scene: &mut Scene, notices: &mut Vec<Notice>) {
        self.rewind_internal(scene);
        self.start_internal(scene, notices);
    }

    /// Process completion reports depth-first: reports raised while handling
    /// one are handled before the remaining ones. Going past `max_cascade`
    /// rewinds the chain and fails.
    fn drain(&mut self, scene: &mut Scene, notices: Vec<Notice>) -> Result<()> {
        let mut queue: VecDeque<Notice> = notices.into();

        while let Some(notice) = queue.pop_front() {
            self.cascade += 1;
            if self.cascade > self.config.max_cascade {
                let err = StepChainError::CascadeLimit(self.config.max_cascade);
                tracing::error!(chain = %self.config.name, "{err}");
                self.rewind_internal(scene);
                return Err(err);
            }

            let mut produced = Vec::new();
            match notice {
                Notice::Ended { chain, step } if chain == self.id => {
                    self.handle_step_ended(step, scene, &mut produced);
                }
                Notice::Replay { chain } if chain == self.id => {
                    self.handle_replay(scene, &mut produced);
                }
                _ => {}
            }

            for notice in produced.into_iter().rev() {
                queue.push_front(notice);
            }
        }
        Ok(())
    }
}
