// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in step payloads.
//!
//! Steps are declared on scene nodes as [`StepComponent`]s and turned into
//! [`StepBehavior`] objects when a chain discovers them.

pub mod general;
pub mod waiting;
pub mod widgets;

pub use general::{AnimationStep, EventStep, LogStep, RestartStep, SetActiveStep, TeleportStep};
pub use waiting::{WaitForButtonStep, WaitForInputStep, WaitStep};
pub use widgets::{ColorStep, ImageStep, TextStep};

use crate::step::StepBehavior;
use serde::{Deserialize, Serialize};

/// A step declared on a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepComponent {
    /// Component enable flag
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Payload
    pub kind: StepKind,
}

impl StepComponent {
    /// An enabled component
    pub fn new(kind: StepKind) -> Self {
        Self { enabled: true, kind }
    }

    /// A disabled component
    pub fn disabled(kind: StepKind) -> Self {
        Self { enabled: false, kind }
    }
}

fn default_true() -> bool {
    true
}

fn default_keys() -> Vec<String> {
    vec!["Space".to_string()]
}

/// Whether a set-active step turns its target on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveBehaviour {
    /// Turn the target on
    #[default]
    Activate,
    /// Turn the target off
    Deactivate,
}

impl ActiveBehaviour {
    /// The active flag this behaviour sets
    pub fn target_state(self) -> bool {
        self == ActiveBehaviour::Activate
    }
}

/// Value written by an animation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationParam {
    /// Set a float parameter
    Float(f32),
    /// Set an integer parameter
    Int(i32),
    /// Set a boolean parameter
    Bool(bool),
    /// Fire a trigger
    Trigger,
}

impl AnimationParam {
    /// Display name of the parameter type
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "Float",
            Self::Int(_) => "Int",
            Self::Bool(_) => "Bool",
            Self::Trigger => "Trigger",
        }
    }
}

/// Declarative payload of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepKind {
    /// Log a message
    Log {
        /// Message text
        message: String,
    },
    /// Fire named events
    Event {
        /// End right after activation; otherwise something must end it
        #[serde(default = "default_true")]
        end_immediately: bool,
        /// Events fired on activation
        #[serde(default)]
        on_activate: Vec<String>,
        /// Events fired on end
        #[serde(default)]
        on_end: Vec<String>,
        /// Events fired on restart
        #[serde(default)]
        on_restart: Vec<String>,
    },
    /// Turn a node on or off
    SetActive {
        /// Target node path
        target: String,
        /// On or off
        #[serde(default)]
        behaviour: ActiveBehaviour,
        /// Put the target in the opposite state at start
        #[serde(default)]
        force_initial_state: bool,
    },
    /// Move a node to another node's position
    Teleport {
        /// Node to move
        target: String,
        /// Node whose position is the destination
        destination: String,
    },
    /// Set an animator parameter
    Animation {
        /// Node holding the animator
        animator: String,
        /// Parameter name
        parameter: String,
        /// Value to write
        value: AnimationParam,
    },
    /// Rewind the chain and play it again
    Restart,
    /// Change a UI element's color
    Color {
        /// Target node path
        target: String,
        /// New RGBA color
        color: [f32; 4],
    },
    /// Change a UI image's sprite
    Image {
        /// Target node path
        target: String,
        /// New sprite
        sprite: Option<String>,
    },
    /// Change a UI text
    Text {
        /// Target node path
        target: String,
        /// New text
        text: String,
        /// Append instead of replacing
        #[serde(default)]
        additive: bool,
    },
    /// Wait for some time
    Wait {
        /// Seconds to wait
        seconds: f32,
    },
    /// Wait for a key press
    WaitForInput {
        /// Keys that end the wait
        #[serde(default = "default_keys")]
        keys: Vec<String>,
    },
    /// Wait for a UI button click
    WaitForButton {
        /// Button node paths
        buttons: Vec<String>,
    },
}

impl StepKind {
    /// Display label of the kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::Log { .. } => "Log Step",
            Self::Event { .. } => "Event Step",
            Self::SetActive { .. } => "Set Active Step",
            Self::Teleport { .. } => "Teleport Step",
            Self::Animation { .. } => "Animation Step",
            Self::Restart => "Restart Step",
            Self::Color { .. } => "Color Step",
            Self::Image { .. } => "Image Step",
            Self::Text { .. } => "Text Step",
            Self::Wait { .. } => "Wait Step",
            Self::WaitForInput { .. } => "Wait For Input Step",
            Self::WaitForButton { .. } => "Wait For Button Step",
        }
    }

    /// Create the runtime behavior
    pub fn instantiate(&self) -> Box<dyn StepBehavior> {
        match self.clone() {
            Self::Log { message } => Box::new(LogStep::new(message)),
            Self::Event {
                end_immediately,
                on_activate,
                on_end,
                on_restart,
            } => Box::new(EventStep {
                end_immediately,
                on_activate,
                on_end,
                on_restart,
            }),
            Self::SetActive {
                target,
                behaviour,
                force_initial_state,
            } => Box::new(SetActiveStep::new(target, behaviour, force_initial_state)),
            Self::Teleport { target, destination } => Box::new(TeleportStep::new(target, destination)),
            Self::Animation {
                animator,
                parameter,
                value,
            } => Box::new(AnimationStep::new(animator, parameter, value)),
            Self::Restart => Box::new(RestartStep),
            Self::Color { target, color } => Box::new(ColorStep::new(target, color)),
            Self::Image { target, sprite } => Box::new(ImageStep::new(target, sprite)),
            Self::Text {
                target,
                text,
                additive,
            } => Box::new(TextStep::new(target, text, additive)),
            Self::Wait { seconds } => Box::new(WaitStep::new(seconds)),
            Self::WaitForInput { keys } => Box::new(WaitForInputStep::new(keys)),
            Self::WaitForButton { buttons } => Box::new(WaitForButtonStep::new(buttons)),
        }
    }
}
