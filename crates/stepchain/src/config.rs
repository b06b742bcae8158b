// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chain configuration and scene files.
//!
//! Scene files are RON (`.ron`) or JSON (`.json`) and hold the node tree,
//! the path of the node that hosts the chain, and the chain settings.

use crate::error::SceneError;
use crate::scene::{NodeDef, Scene};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default limit on completion reports processed by one chain call
pub const DEFAULT_MAX_CASCADE: usize = 4096;

/// Settings for a step chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain name, used in logs and errors
    pub name: String,
    /// Start playing as soon as the chain is initialized
    pub play_on_start: bool,
    /// Maximum completion reports processed by a single call
    pub max_cascade: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: "Step Chain".to_string(),
            play_on_start: true,
            max_cascade: DEFAULT_MAX_CASCADE,
        }
    }
}

impl ChainConfig {
    /// Create a config with the given name and defaults otherwise
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A scene file: node tree plus chain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    /// Path of the node hosting the chain; its descendants are the steps
    pub chain_root: String,
    /// Chain settings
    #[serde(default)]
    pub chain: ChainConfig,
    /// Root nodes
    pub nodes: Vec<NodeDef>,
}

impl SceneFile {
    /// Parse from a RON string
    pub fn from_ron(s: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(s)?)
    }

    /// Serialize to a RON string
    pub fn to_ron(&self) -> Result<String, SceneError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse from a JSON string
    pub fn from_json(s: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from disk, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron(&content),
            Some("json") => Self::from_json(&content),
            other => Err(SceneError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Save to disk as RON
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Build the scene graph
    pub fn build_scene(&self) -> Scene {
        Scene::from_defs(&self.nodes)
    }
}
