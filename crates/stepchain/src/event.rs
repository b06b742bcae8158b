// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chain events for decoupled observers.
//!
//! The chain never calls into observers. It queues events that observers
//! drain with [`StepChain::take_events`](crate::StepChain::take_events),
//! alongside the read-only [`ChainSnapshot`].

use crate::scene::NodeId;
use crate::step::StepId;

/// Something that happened inside a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    /// Playback started at the first step
    Started,
    /// A step became active
    StepActivated {
        /// Index in the chain
        index: usize,
        /// Step ID
        step: StepId,
    },
    /// A step was skipped because its host is disabled
    StepSkipped {
        /// Index in the chain
        index: usize,
        /// Step ID
        step: StepId,
    },
    /// A step ended
    StepEnded {
        /// Index in the chain
        index: usize,
        /// Step ID
        step: StepId,
    },
    /// A step was restarted
    StepRestarted {
        /// Index in the chain
        index: usize,
        /// Step ID
        step: StepId,
    },
    /// The current index changed
    CurrentChanged {
        /// New current index, if any
        index: Option<usize>,
    },
    /// The chain ran off the end of its list
    Finished,
    /// The chain was rewound to idle
    Rewound,
}

/// Read-only view of a chain's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    /// Chain name
    pub name: String,
    /// Whether the chain is playing
    pub playing: bool,
    /// Current step index, if any
    pub current_index: Option<usize>,
    /// Steps in chain order; `None` for destroyed slots
    pub steps: Vec<Option<StepView>>,
}

impl ChainSnapshot {
    /// The current step's view, if playing
    pub fn current(&self) -> Option<&StepView> {
        self.current_index
            .and_then(|i| self.steps.get(i))
            .and_then(Option::as_ref)
    }

    /// Whether the given node hosts the currently active step
    pub fn is_active_node(&self, node: NodeId) -> bool {
        self.steps
            .iter()
            .flatten()
            .any(|s| s.active && s.node == node)
    }
}

/// Read-only view of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    /// Step ID
    pub id: StepId,
    /// Step name
    pub name: String,
    /// Kind label
    pub kind: &'static str,
    /// Host node
    pub node: NodeId,
    /// Whether the step is active
    pub active: bool,
    /// Whether the step component is enabled
    pub enabled: bool,
}
