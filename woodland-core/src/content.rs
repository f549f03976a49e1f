//! Content pools for generation.
//!
//! Generators never hard-code names, jobs or equipment. They read them
//! through [`ContentSource`], which [`ContentPack`] implements from JSON.

use crate::items::{EquipmentCategory, ItemTemplate};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors from loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The content pools NPC generation draws from.
pub trait ContentSource {
    fn names(&self) -> &[String];

    fn jobs(&self) -> &[String];

    fn npc_drives(&self) -> &[String];

    fn attacks(&self) -> &[String];

    /// Produce an attack descriptor. Defaults to a uniform pick from `attacks()`.
    fn random_attack(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.attacks().choose(rng).cloned()
    }
}

/// A bundle of content pools, usually loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentPack {
    pub names: Vec<String>,
    pub jobs: Vec<String>,
    pub npc_drives: Vec<String>,
    pub attacks: Vec<String>,
    /// Every faction the content knows about.
    pub factions: Vec<String>,
    pub equipment: Vec<ItemTemplate>,
}

impl ContentPack {
    /// Parse a content pack from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let pack = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            names = pack.names.len(),
            equipment = pack.equipment.len(),
            "loaded content pack"
        );
        Ok(pack)
    }

    /// Templates of one equipment category.
    pub fn templates_for(
        &self,
        category: EquipmentCategory,
    ) -> impl Iterator<Item = &ItemTemplate> + '_ {
        self.equipment
            .iter()
            .filter(move |template| template.category == category)
    }
}

impl ContentSource for ContentPack {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn jobs(&self) -> &[String] {
        &self.jobs
    }

    fn npc_drives(&self) -> &[String] {
        &self.npc_drives
    }

    fn attacks(&self) -> &[String] {
        &self.attacks
    }
}
