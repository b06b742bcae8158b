// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless scene player.
//!
//! Loads a scene file, discovers its chain and drives it frame by frame in
//! play mode, with keys and clicks scripted per frame.

use std::str::FromStr;

use serde::Serialize;
use stepchain::{ChainEvent, FrameInput, NodeId, Scene, SceneError, SceneFile, StepChain, StepChainError};
use thiserror::Error;

use crate::hierarchy::HierarchyPanel;
use crate::inspector;
use crate::play_mode::PlayModeManager;

/// Errors from the player
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Scene file could not be loaded
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    /// Chain operation failed
    #[error("Chain error: {0}")]
    Chain(#[from] StepChainError),
    /// The chain root path does not name a node
    #[error("Chain root not found: {0}")]
    MissingRoot(String),
    /// A scripted input is malformed
    #[error("Invalid scripted input '{0}': expected FRAME:NAME")]
    BadInput(String),
    /// The run summary could not be serialized
    #[error("Summary error: {0}")]
    Summary(#[from] ron::Error),
}

/// A key or click scheduled for a frame, written `FRAME:NAME`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedInput {
    /// Frame number, starting at 0
    pub frame: u64,
    /// Key name or button path
    pub name: String,
}

impl FromStr for ScriptedInput {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || PlayerError::BadInput(s.to_string());
        let (frame, name) = s.split_once(':').ok_or_else(bad)?;
        let frame = frame.trim().parse().map_err(|_| bad())?;
        let name = name.trim();
        if name.is_empty() {
            return Err(bad());
        }
        Ok(Self {
            frame,
            name: name.to_string(),
        })
    }
}

/// Scripted input for a run
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    keys: Vec<ScriptedInput>,
    clicks: Vec<ScriptedInput>,
}

impl InputScript {
    /// Create a script from scheduled keys and clicks
    pub fn new(keys: Vec<ScriptedInput>, clicks: Vec<ScriptedInput>) -> Self {
        Self { keys, clicks }
    }

    /// Input seen on a frame
    pub fn input_for(&self, frame: u64) -> FrameInput {
        let mut input = FrameInput::none();
        for key in self.keys.iter().filter(|k| k.frame == frame) {
            input = input.with_key(key.name.clone());
        }
        for click in self.clicks.iter().filter(|c| c.frame == frame) {
            input = input.with_click(click.name.clone());
        }
        input
    }

    /// Last frame with scripted input
    pub fn last_frame(&self) -> Option<u64> {
        self.keys.iter().chain(&self.clicks).map(|i| i.frame).max()
    }
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Chain name
    pub chain: String,
    /// Frames played
    pub frames: u64,
    /// Scaled seconds played
    pub elapsed: f64,
    /// Whether the chain is still playing
    pub playing: bool,
    /// Name of the current step
    pub current_step: Option<String>,
    /// Paths of highlighted nodes
    pub highlighted: Vec<String>,
    /// Scene events fired by steps, oldest first
    pub fired_events: Vec<String>,
}

impl RunSummary {
    /// Pretty RON rendering
    pub fn to_ron(&self) -> Result<String, PlayerError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }
}

/// Drives a chain through play mode
#[derive(Debug)]
pub struct Player {
    scene: Scene,
    chain: StepChain,
    hierarchy: HierarchyPanel,
    play_mode: PlayModeManager,
    script: InputScript,
    fired_events: Vec<String>,
}

impl Player {
    /// Build the scene and discover its chain
    pub fn new(file: &SceneFile, script: InputScript) -> Result<Self, PlayerError> {
        let scene = file.build_scene();
        let root = scene
            .find_path(&file.chain_root)
            .ok_or_else(|| PlayerError::MissingRoot(file.chain_root.clone()))?;
        let chain = StepChain::discover(file.chain.clone(), &scene, root)?;

        Ok(Self {
            scene,
            chain,
            hierarchy: HierarchyPanel::new(),
            play_mode: PlayModeManager::new(),
            script,
            fired_events: Vec::new(),
        })
    }

    /// Set the play mode time scale
    pub fn set_time_scale(&mut self, scale: f32) {
        self.play_mode.set_time_scale(scale);
    }

    /// Enter play mode and start the chain
    pub fn start(&mut self) -> Result<(), PlayerError> {
        self.play_mode.play(&self.scene, &mut self.hierarchy);
        self.chain.initialize(&mut self.scene)?;
        if !self.chain.config().play_on_start {
            self.chain.play(&mut self.scene)?;
        }
        self.observe();
        Ok(())
    }

    /// Play one frame. Returns false when play mode is not running.
    pub fn frame(&mut self, dt: f32) -> Result<bool, PlayerError> {
        let frame = self.play_mode.frame_count;
        let Some(scaled) = self.play_mode.advance(dt) else {
            return Ok(false);
        };

        let input = self.script.input_for(frame);
        self.chain.update(scaled, &input, &mut self.scene)?;
        self.observe();
        Ok(true)
    }

    /// Play up to `frames` frames; with `until_finished`, stop as soon as
    /// the chain stops playing and no scripted input is left
    pub fn run(&mut self, frames: u64, dt: f32, until_finished: bool) -> Result<RunSummary, PlayerError> {
        for _ in 0..frames {
            let pending_input = self
                .script
                .last_frame()
                .is_some_and(|last| last >= self.play_mode.frame_count);
            if until_finished && !self.chain.is_playing() && !pending_input {
                break;
            }
            if !self.frame(dt)? {
                break;
            }
        }
        Ok(self.summary())
    }

    /// Leave play mode, returning the scene as it was before play started
    pub fn stop(&mut self) -> Option<Scene> {
        self.play_mode.stop(&mut self.hierarchy)
    }

    /// Current outcome
    pub fn summary(&self) -> RunSummary {
        let mut highlighted: Vec<String> = self
            .hierarchy
            .highlight
            .iter()
            .flat_map(|h| h.highlighted())
            .map(|node| self.scene.path_of(node))
            .collect();
        highlighted.sort();

        RunSummary {
            chain: self.chain.name().to_string(),
            frames: self.play_mode.frame_count,
            elapsed: self.play_mode.elapsed_time,
            playing: self.chain.is_playing(),
            current_step: self.chain.current_step().map(|s| s.name().to_string()),
            highlighted,
            fired_events: self.fired_events.clone(),
        }
    }

    /// Inspector text for every step host in the chain
    pub fn describe(&self) -> Vec<String> {
        let Some(root) = self.chain.root() else {
            return Vec::new();
        };
        let snapshot = self.chain.snapshot();

        let mut lines = Vec::new();
        for node_id in self.scene.descendants(root) {
            let Some(node) = self.scene.get(node_id) else {
                continue;
            };
            if node.steps.is_empty() {
                continue;
            }

            lines.push(self.scene.path_of(node_id));
            let views = inspector::step_views_for(&snapshot, node_id);
            for (index, component) in node.steps.iter().enumerate() {
                let active = views.get(index).is_some_and(|v| v.active);
                lines.extend(inspector::describe(component, active).into_iter().map(|l| format!("  {l}")));
            }
        }
        lines
    }

    /// The scene being played
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The chain being played
    pub fn chain(&self) -> &StepChain {
        &self.chain
    }

    /// Whether a node is highlighted in the hierarchy
    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.hierarchy
            .highlight
            .as_ref()
            .is_some_and(|h| h.is_highlighted(node))
    }

    fn observe(&mut self) {
        let events = self.chain.take_events();
        for event in &events {
            self.log_event(event);
        }
        self.hierarchy.observe(&self.chain.snapshot(), &events);

        for name in self.scene.take_events() {
            tracing::info!(event = %name, "Scene event fired");
            self.fired_events.push(name);
        }
    }

    fn log_event(&self, event: &ChainEvent) {
        let chain = self.chain.name();
        let step_name = |id| self.chain.step(id).map_or("<destroyed>", |s| s.name());
        match event {
            ChainEvent::Started => tracing::info!(chain, "Chain started"),
            ChainEvent::StepActivated { index, step } => {
                tracing::info!(chain, index, step = step_name(*step), "Step activated");
            }
            ChainEvent::StepSkipped { index, step } => {
                tracing::debug!(chain, index, step = step_name(*step), "Step skipped");
            }
            ChainEvent::StepEnded { index, step } => {
                tracing::debug!(chain, index, step = step_name(*step), "Step ended");
            }
            ChainEvent::StepRestarted { index, step } => {
                tracing::debug!(chain, index, step = step_name(*step), "Step restarted");
            }
            ChainEvent::CurrentChanged { index } => tracing::trace!(chain, ?index, "Current step changed"),
            ChainEvent::Finished => tracing::info!(chain, "Chain finished"),
            ChainEvent::Rewound => tracing::info!(chain, "Chain rewound"),
        }
    }
}
