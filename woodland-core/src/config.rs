//! Generator configuration.

use crate::layout::{Canvas, LayoutError};
use crate::npc::{GenerationError, NpcOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid canvas: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid NPC options: {0}")]
    Generation(#[from] GenerationError),
}

/// Settings shared by map rendering and NPC generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoodlandConfig {
    /// Canvas the campaign map is projected onto.
    pub canvas: Canvas,

    /// Options for the "random NPC" action.
    pub npc: NpcOptions,
}

impl WoodlandConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the map canvas size.
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas = Canvas::new(width, height);
        self
    }

    /// Set the NPC generation options.
    pub fn with_npc_options(mut self, npc: NpcOptions) -> Self {
        self.npc = npc;
        self
    }

    /// Parse from a JSON string and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Save to a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check the canvas and harm ranges.
    ///
    /// Factions are left to generation time, since a form may fill them in
    /// after the config is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.canvas.validate()?;
        self.npc.validate_ranges()?;
        Ok(())
    }
}
