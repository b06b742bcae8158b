// SPDX-License-Identifier: MIT OR Apache-2.0
//! Play mode for in-editor preview.
//!
//! This module handles:
//! - Entering and exiting play mode
//! - Pausing, resuming and single-frame stepping
//! - Scene backup and restoration
//! - Attaching the active step highlight to the hierarchy while playing

use stepchain::Scene;

use crate::hierarchy::{ActiveHighlight, HierarchyPanel};

/// Play mode state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Editor mode (normal editing)
    #[default]
    Stopped,
    /// Chains are running
    Playing,
    /// Chains are paused
    Paused,
}

impl PlayState {
    /// Check if we're in any play mode (playing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PlayState::Playing | PlayState::Paused)
    }
}

/// Play mode manager - handles entering/exiting play mode
#[derive(Debug)]
pub struct PlayModeManager {
    /// Current play state
    pub state: PlayState,
    /// Backup of the scene before entering play mode
    scene_backup: Option<Scene>,
    /// Time scale for simulation (1.0 = normal speed)
    time_scale: f32,
    /// Frame count since play started
    pub frame_count: u64,
    /// Elapsed time since play started
    pub elapsed_time: f64,
}

impl PlayModeManager {
    /// Create a stopped manager
    pub fn new() -> Self {
        Self {
            state: PlayState::Stopped,
            scene_backup: None,
            time_scale: 1.0,
            frame_count: 0,
            elapsed_time: 0.0,
        }
    }

    /// Enter play mode, or resume from pause.
    ///
    /// Entering backs up the scene and attaches the active step highlight
    /// to the hierarchy. Returns true if the state changed.
    pub fn play(&mut self, scene: &Scene, hierarchy: &mut HierarchyPanel) -> bool {
        match self.state {
            PlayState::Stopped => {
                self.scene_backup = Some(scene.clone());
                hierarchy.highlight = Some(ActiveHighlight::new());
                self.state = PlayState::Playing;
                self.frame_count = 0;
                self.elapsed_time = 0.0;
                tracing::info!("Entered play mode");
                true
            }
            PlayState::Paused => {
                self.state = PlayState::Playing;
                tracing::info!("Resumed play mode");
                true
            }
            PlayState::Playing => false,
        }
    }

    /// Pause play mode
    pub fn pause(&mut self) -> bool {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
            tracing::info!("Paused play mode");
            true
        } else {
            false
        }
    }

    /// Toggle pause/resume
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            PlayState::Playing => self.pause(),
            PlayState::Paused => {
                self.state = PlayState::Playing;
                tracing::info!("Resumed play mode");
                true
            }
            PlayState::Stopped => false,
        }
    }

    /// Stop play mode, detach the highlight, and return the scene as it
    /// was before play started
    pub fn stop(&mut self, hierarchy: &mut HierarchyPanel) -> Option<Scene> {
        if !self.state.is_active() {
            return None;
        }

        self.state = PlayState::Stopped;
        self.frame_count = 0;
        self.elapsed_time = 0.0;
        hierarchy.highlight = None;

        tracing::info!("Stopped play mode");
        self.scene_backup.take()
    }

    /// Advance one frame while playing. Returns the scaled delta time to
    /// feed to the chains, or `None` if not playing.
    pub fn advance(&mut self, delta_time: f32) -> Option<f32> {
        if self.state != PlayState::Playing {
            return None;
        }
        Some(self.tick(delta_time))
    }

    /// Step forward one frame while paused
    pub fn step_frame(&mut self, delta_time: f32) -> Option<f32> {
        if self.state != PlayState::Paused {
            return None;
        }
        Some(self.tick(delta_time))
    }

    fn tick(&mut self, delta_time: f32) -> f32 {
        let scaled = delta_time * self.time_scale;
        self.elapsed_time += f64::from(scaled);
        self.frame_count += 1;
        scaled
    }

    /// Check if editing should be disabled
    pub fn is_editing_disabled(&self) -> bool {
        self.state.is_active()
    }

    /// Get a status string for display
    pub fn status_text(&self) -> &'static str {
        match self.state {
            PlayState::Stopped => "Edit Mode",
            PlayState::Playing => "Playing",
            PlayState::Paused => "Paused",
        }
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale (clamped to reasonable range)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(0.0, 10.0);
    }
}

impl Default for PlayModeManager {
    fn default() -> Self {
        Self::new()
    }
}
