// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the step chain.

use crate::scene::NodeId;
use crate::step::StepId;
use thiserror::Error;

/// Errors raised by chain operations
#[derive(Debug, Error)]
pub enum StepChainError {
    /// The step is not part of this chain
    #[error("Step chain '{chain}' does not contain step '{step}'")]
    StepNotInChain {
        /// Chain name
        chain: String,
        /// Step name (or id when unknown)
        step: String,
    },

    /// The step is already owned by another chain
    #[error("Step {0:?} belongs to another chain")]
    ForeignStep(StepId),

    /// The step is already in this chain
    #[error("Step {0:?} is already in the chain")]
    DuplicateStep(StepId),

    /// The step cannot be removed while it is the current step
    #[error("Step {0:?} is the current step and cannot be removed")]
    StepInUse(StepId),

    /// Too many completion reports in a single call
    #[error("Completion cascade exceeded {0} transitions")]
    CascadeLimit(usize),

    /// Scene node lookup failed
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Errors raised while loading scene files
#[derive(Debug, Error)]
pub enum SceneError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("RON serialize error: {0}")]
    RonSerialize(#[from] ron::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown file extension
    #[error("Unsupported scene file extension: {0}")]
    UnsupportedFormat(String),
}

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, StepChainError>;
