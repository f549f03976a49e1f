//! Testing utilities.
//!
//! - `MockContent` for in-memory content pools
//! - `MockItemCreator` for equipment that records what was asked of it

use crate::content::ContentSource;
use crate::items::{EquipmentCategory, Item, ItemCreator, ItemId};
use crate::npc::GenerationError;
use rand::RngCore;
use std::sync::Mutex;

/// In-memory content pools.
#[derive(Debug, Clone, Default)]
pub struct MockContent {
    pub names: Vec<String>,
    pub jobs: Vec<String>,
    pub drives: Vec<String>,
    pub attacks: Vec<String>,
}

fn strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Vec<String> {
    values.into_iter().map(Into::into).collect()
}

impl MockContent {
    /// A small pool with a few entries in each list.
    pub fn sample() -> Self {
        Self {
            names: strings(["Bramble", "Thistle", "Hazel", "Rowan"]),
            jobs: strings(["Smith", "Ferryman", "Scout"]),
            drives: strings(["Justice", "Wanderlust", "Greed"]),
            attacks: strings(["Claw", "Club", "Thrown stone"]),
        }
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = strings(names);
        self
    }

    pub fn with_jobs<S: Into<String>>(mut self, jobs: impl IntoIterator<Item = S>) -> Self {
        self.jobs = strings(jobs);
        self
    }

    pub fn with_drives<S: Into<String>>(mut self, drives: impl IntoIterator<Item = S>) -> Self {
        self.drives = strings(drives);
        self
    }

    pub fn with_attacks<S: Into<String>>(mut self, attacks: impl IntoIterator<Item = S>) -> Self {
        self.attacks = strings(attacks);
        self
    }
}

impl ContentSource for MockContent {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn jobs(&self) -> &[String] {
        &self.jobs
    }

    fn npc_drives(&self) -> &[String] {
        &self.drives
    }

    fn attacks(&self) -> &[String] {
        &self.attacks
    }
}

/// An item creator that records each request.
///
/// Items are named after their category and take the first valid faction.
/// Any category can be created as long as a faction is given.
#[derive(Debug, Default)]
pub struct MockItemCreator {
    calls: Mutex<Vec<(EquipmentCategory, Vec<String>)>>,
}

impl MockItemCreator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<(EquipmentCategory, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ItemCreator for MockItemCreator {
    fn can_create(&self, _category: EquipmentCategory, valid_factions: &[String]) -> bool {
        !valid_factions.is_empty()
    }

    fn create_item(
        &self,
        category: EquipmentCategory,
        valid_factions: &[String],
        _rng: &mut dyn RngCore,
    ) -> Result<Item, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((category, valid_factions.to_vec()));
        let faction = valid_factions
            .first()
            .cloned()
            .ok_or(GenerationError::EmptyPool("factions"))?;

        Ok(Item {
            id: ItemId::new(),
            name: format!("Test {category}"),
            category,
            faction,
            wear: 1,
        })
    }
}
