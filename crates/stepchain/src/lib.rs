// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step chain sequencer.
//!
//! This crate sequences scripted steps in a linear chain:
//! - Steps discovered from a scene hierarchy, in hierarchy order
//! - One active step at a time, advanced by completion reports
//! - Jumps to any step, with earlier steps completed and later ones reset
//! - Rewind that undoes steps in reverse order
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - A host [`Scene`] that steps read and mutate
//! - The [`Step`] lifecycle with [`StepBehavior`] payload hooks
//! - The [`StepChain`] state machine
//! - Pull-based [`ChainEvent`]s and [`ChainSnapshot`]s for observers

pub mod chain;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod scene;
pub mod step;
pub mod steps;
pub mod ui;

pub use chain::{ChainId, ChainState, StepChain};
pub use config::{ChainConfig, SceneFile, DEFAULT_MAX_CASCADE};
pub use error::{Result, SceneError, StepChainError};
pub use event::{ChainEvent, ChainSnapshot, StepView};
pub use input::FrameInput;
pub use scene::{Animator, AnimatorValue, Node, NodeDef, NodeId, Scene, UiElement};
pub use step::{Notice, Step, StepBehavior, StepContext, StepId};
pub use steps::{ActiveBehaviour, AnimationParam, StepComponent, StepKind};
pub use ui::{ChainCommand, ChainPanel};
