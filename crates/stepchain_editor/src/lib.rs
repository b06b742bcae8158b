// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step chain editor.
//!
//! Editor-side observers of running chains and a headless player:
//! - Hierarchy panel that highlights the node hosting the active step
//! - Inspector with an "Active Step!" banner and per-kind fields
//! - Play mode that backs up the scene and attaches the highlight
//! - Player that drives a scene file frame by frame with scripted input
//!
//! ## Architecture
//!
//! Panels never hold on to a chain. They read [`stepchain::ChainSnapshot`]s
//! and the [`stepchain::ChainEvent`]s drained after each chain call.

pub mod hierarchy;
pub mod inspector;
pub mod play_mode;
pub mod player;
pub mod property;

pub use hierarchy::{ActiveHighlight, HierarchyPanel};
pub use inspector::InspectorPanel;
pub use play_mode::{PlayModeManager, PlayState};
pub use player::{InputScript, Player, PlayerError, RunSummary, ScriptedInput};
