// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame input snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input observed during one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Keys that went down this frame (e.g. `"Space"`, `"Return"`)
    pub keys_down: HashSet<String>,
    /// Buttons clicked this frame, by node path
    pub clicked: HashSet<String>,
}

impl FrameInput {
    /// Empty input
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a key press
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys_down.insert(key.into());
        self
    }

    /// Add a button click
    pub fn with_click(mut self, button: impl Into<String>) -> Self {
        self.clicked.insert(button.into());
        self
    }

    /// Whether a key went down this frame
    pub fn key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    /// Whether a button was clicked this frame
    pub fn was_clicked(&self, button: &str) -> bool {
        self.clicked.contains(button)
    }
}
