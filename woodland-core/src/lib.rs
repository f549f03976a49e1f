//! Procedural content core for the Woodland campaign companion.
//!
//! This crate provides:
//! - Map layout projection: abstract clearing positions to a renderable graph
//! - Weighted random NPC generation with optional equipment
//! - Content packs and item templates loaded from JSON
//! - Partial updates collapsed from JSON-patch operations
//!
//! # Quick Start
//!
//! ```ignore
//! use woodland_core::{ContentPack, NpcGenerator, NpcOptions, TemplateItemCreator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pack = ContentPack::load("content.json").await?;
//!     let items = TemplateItemCreator::new(&pack);
//!
//!     let options = NpcOptions::new(pack.factions.clone()).with_all_equipment(true);
//!     let npc = NpcGenerator::new(&pack, &items).generate(&options)?;
//!     println!("{} the {} ({})", npc.name, npc.job, npc.faction);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod content;
pub mod items;
pub mod layout;
pub mod npc;
pub mod patch;
pub mod testing;
pub mod weighted;

// Primary public API
pub use config::{ConfigError, WoodlandConfig};
pub use content::{ContentError, ContentPack, ContentSource};
pub use items::{EquipmentCategory, Item, ItemCreator, ItemTemplate, TemplateItemCreator};
pub use layout::{
    project, project_campaign, project_mirrored, Bounds, CampaignMap, Canvas, LayoutError,
    LayoutGraph, MapLayout, Mirror, Position,
};
pub use npc::{generate_npc, GenerationError, Harm, Npc, NpcGenerator, NpcOptions};
pub use patch::{partial_update, PartialUpdate, PatchOp};
pub use weighted::{pick_from_range, HarmRange};
