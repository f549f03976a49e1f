//! Equipment generation.
//!
//! NPCs pick up equipment through an [`ItemCreator`], so callers can swap the
//! item source. [`TemplateItemCreator`] draws from a content pack's templates.

use crate::content::ContentPack;
use crate::npc::GenerationError;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for generated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Equipment categories an NPC can be handed.
///
/// Declaration order is the order equipment is added to an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentCategory {
    Armor,
    Bow,
    Weapon,
    Shield,
}

impl EquipmentCategory {
    pub const ALL: [EquipmentCategory; 4] = [
        EquipmentCategory::Armor,
        EquipmentCategory::Bow,
        EquipmentCategory::Weapon,
        EquipmentCategory::Shield,
    ];

    /// Chance an NPC with this category enabled carries one, as a ratio.
    pub fn pick_chance(&self) -> (u32, u32) {
        match self {
            EquipmentCategory::Armor => (1, 2),
            EquipmentCategory::Bow => (1, 2),
            EquipmentCategory::Weapon => (2, 3),
            EquipmentCategory::Shield => (1, 3),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentCategory::Armor => "armor",
            EquipmentCategory::Bow => "bow",
            EquipmentCategory::Weapon => "weapon",
            EquipmentCategory::Shield => "shield",
        }
    }

    /// Pool reported when no template of this category is available.
    pub(crate) fn pool_name(&self) -> &'static str {
        match self {
            EquipmentCategory::Armor => "armor templates",
            EquipmentCategory::Bow => "bow templates",
            EquipmentCategory::Weapon => "weapon templates",
            EquipmentCategory::Shield => "shield templates",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A generated piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: EquipmentCategory,
    pub faction: String,
    /// Wear boxes before the item breaks.
    pub wear: u8,
}

/// A content-provided blueprint for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub name: String,
    pub category: EquipmentCategory,
    /// Restricts the template to one faction. `None` fits any faction.
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default = "default_wear")]
    pub wear: u8,
}

fn default_wear() -> u8 {
    1
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>, category: EquipmentCategory) -> Self {
        Self {
            name: name.into(),
            category,
            faction: None,
            wear: default_wear(),
        }
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_wear(mut self, wear: u8) -> Self {
        self.wear = wear;
        self
    }

    /// Whether an NPC limited to `valid_factions` may carry this.
    pub fn fits(&self, valid_factions: &[String]) -> bool {
        match &self.faction {
            Some(faction) => valid_factions.iter().any(|f| f == faction),
            None => true,
        }
    }
}

/// Source of random equipment.
pub trait ItemCreator {
    /// Create one random item of `category` belonging to one of `valid_factions`.
    fn create_item(
        &self,
        category: EquipmentCategory,
        valid_factions: &[String],
        rng: &mut dyn RngCore,
    ) -> Result<Item, GenerationError>;

    /// Whether `create_item` can succeed for `category` and `valid_factions`.
    ///
    /// Generation asks this for every enabled category before drawing
    /// anything, so a missing template fails the same way on every roll.
    fn can_create(&self, category: EquipmentCategory, valid_factions: &[String]) -> bool;
}

/// Item creator backed by a content pack's equipment templates.
pub struct TemplateItemCreator<'a> {
    pack: &'a ContentPack,
}

impl<'a> TemplateItemCreator<'a> {
    pub fn new(pack: &'a ContentPack) -> Self {
        Self { pack }
    }
}

impl ItemCreator for TemplateItemCreator<'_> {
    fn can_create(&self, category: EquipmentCategory, valid_factions: &[String]) -> bool {
        self.pack
            .templates_for(category)
            .any(|t| t.fits(valid_factions))
    }

    fn create_item(
        &self,
        category: EquipmentCategory,
        valid_factions: &[String],
        rng: &mut dyn RngCore,
    ) -> Result<Item, GenerationError> {
        let eligible: Vec<&ItemTemplate> = self
            .pack
            .templates_for(category)
            .filter(|t| t.fits(valid_factions))
            .collect();

        let template = eligible
            .choose(rng)
            .ok_or(GenerationError::EmptyPool(category.pool_name()))?;

        let faction = match &template.faction {
            Some(faction) => faction.clone(),
            None => valid_factions
                .choose(rng)
                .cloned()
                .ok_or(GenerationError::EmptyPool("factions"))?,
        };

        Ok(Item {
            id: ItemId::new(),
            name: template.name.clone(),
            category,
            faction,
            wear: template.wear,
        })
    }
}
