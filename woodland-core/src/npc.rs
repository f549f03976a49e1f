//! Random NPC generation.
//!
//! An NPC is assembled from uniform draws over the injected content pools,
//! weighted harm maxima, and optional equipment from an [`ItemCreator`].
//! Everything is validated before the first draw, so a call either yields a
//! complete NPC or an error.

use crate::content::ContentSource;
use crate::items::{EquipmentCategory, Item, ItemCreator};
use crate::weighted::HarmRange;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Error type for weighted rolls and NPC/item generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Range [{lower}, {upper}] spans more than 4 steps")]
    RangeTooWide { lower: u32, upper: u32 },

    #[error("Range [{lower}, {upper}] has its lower bound above its upper bound")]
    InvertedRange { lower: u32, upper: u32 },

    #[error("Content pool '{0}' is empty")]
    EmptyPool(&'static str),
}

/// Unique identifier for generated NPCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpcId(pub Uuid);

impl NpcId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NpcId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four harm tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Harm {
    pub depletion: u32,
    pub exhaustion: u32,
    pub injury: u32,
    pub morale: u32,
}

/// A generated non-player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    pub faction: String,
    pub look: String,
    pub job: String,
    pub drive: String,
    pub attack: String,
    pub equipment: Vec<Item>,
    pub notes: String,
    /// Current harm. Always zero at creation.
    pub harm: Harm,
    pub harm_max: Harm,
}

/// Options controlling NPC generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NpcOptions {
    /// Factions the NPC and its equipment may belong to.
    pub valid_factions: Vec<String>,

    pub pick_weapon: bool,
    pub pick_armor: bool,
    pub pick_bow: bool,
    pub pick_shield: bool,

    pub injury_range: HarmRange,
    pub exhaustion_range: HarmRange,
    pub depletion_range: HarmRange,
    pub morale_range: HarmRange,
}

impl Default for NpcOptions {
    fn default() -> Self {
        Self {
            valid_factions: Vec::new(),
            pick_weapon: false,
            pick_armor: false,
            pick_bow: false,
            pick_shield: false,
            injury_range: HarmRange::default(),
            exhaustion_range: HarmRange::default(),
            depletion_range: HarmRange::default(),
            morale_range: HarmRange::default(),
        }
    }
}

impl NpcOptions {
    /// Create options for the given factions with no equipment.
    pub fn new<S: Into<String>>(valid_factions: impl IntoIterator<Item = S>) -> Self {
        Self {
            valid_factions: valid_factions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Enable or disable every equipment category at once.
    pub fn with_all_equipment(mut self, enabled: bool) -> Self {
        self.pick_weapon = enabled;
        self.pick_armor = enabled;
        self.pick_bow = enabled;
        self.pick_shield = enabled;
        self
    }

    /// Enable a single equipment category.
    pub fn with_equipment(mut self, category: EquipmentCategory) -> Self {
        match category {
            EquipmentCategory::Armor => self.pick_armor = true,
            EquipmentCategory::Bow => self.pick_bow = true,
            EquipmentCategory::Weapon => self.pick_weapon = true,
            EquipmentCategory::Shield => self.pick_shield = true,
        }
        self
    }

    /// Use the same range for all four harm maxima.
    pub fn with_harm_range(mut self, range: HarmRange) -> Self {
        self.injury_range = range;
        self.exhaustion_range = range;
        self.depletion_range = range;
        self.morale_range = range;
        self
    }

    pub fn picks(&self, category: EquipmentCategory) -> bool {
        match category {
            EquipmentCategory::Armor => self.pick_armor,
            EquipmentCategory::Bow => self.pick_bow,
            EquipmentCategory::Weapon => self.pick_weapon,
            EquipmentCategory::Shield => self.pick_shield,
        }
    }

    /// Check the ranges can be rolled.
    pub fn validate_ranges(&self) -> Result<(), GenerationError> {
        self.depletion_range.validate()?;
        self.exhaustion_range.validate()?;
        self.injury_range.validate()?;
        self.morale_range.validate()?;
        Ok(())
    }
}

/// Generates NPCs from a content source and an item creator.
pub struct NpcGenerator<'a, C: ?Sized, I: ?Sized> {
    content: &'a C,
    items: &'a I,
}

impl<'a, C, I> NpcGenerator<'a, C, I>
where
    C: ContentSource + ?Sized,
    I: ItemCreator + ?Sized,
{
    pub fn new(content: &'a C, items: &'a I) -> Self {
        Self { content, items }
    }

    /// Generate a random NPC.
    pub fn generate(&self, options: &NpcOptions) -> Result<Npc, GenerationError> {
        self.generate_with_rng(options, &mut rand::thread_rng())
    }

    /// Generate with a specific RNG (useful for testing).
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        options: &NpcOptions,
        rng: &mut R,
    ) -> Result<Npc, GenerationError> {
        self.check_pools(options)?;
        options.validate_ranges()?;

        // `&mut R` is an `RngCore` even when `R` is unsized, so this coerces.
        let mut rng = rng;
        let rng: &mut dyn RngCore = &mut rng;

        let name = pick(self.content.names(), "names", rng)?;
        let faction = pick(&options.valid_factions, "factions", rng)?;
        let job = pick(self.content.jobs(), "jobs", rng)?;
        let drive = pick(self.content.npc_drives(), "drives", rng)?;
        let attack = self
            .content
            .random_attack(rng)
            .ok_or(GenerationError::EmptyPool("attacks"))?;

        let harm_max = Harm {
            depletion: options.depletion_range.pick_with_rng(rng)?,
            exhaustion: options.exhaustion_range.pick_with_rng(rng)?,
            injury: options.injury_range.pick_with_rng(rng)?,
            morale: options.morale_range.pick_with_rng(rng)?,
        };

        let mut equipment = Vec::new();
        for category in EquipmentCategory::ALL {
            if !options.picks(category) {
                continue;
            }
            let (numerator, denominator) = category.pick_chance();
            if rng.gen_ratio(numerator, denominator) {
                let item = self
                    .items
                    .create_item(category, &options.valid_factions, rng)?;
                equipment.push(item);
            }
        }

        debug!(
            name = %name,
            faction = %faction,
            equipment = equipment.len(),
            "generated npc"
        );

        Ok(Npc {
            id: NpcId::new(),
            name,
            faction,
            look: String::new(),
            job,
            drive,
            attack,
            equipment,
            notes: String::new(),
            harm: Harm::default(),
            harm_max,
        })
    }

    fn check_pools(&self, options: &NpcOptions) -> Result<(), GenerationError> {
        let pools: [(&'static str, usize); 5] = [
            ("names", self.content.names().len()),
            ("factions", options.valid_factions.len()),
            ("jobs", self.content.jobs().len()),
            ("drives", self.content.npc_drives().len()),
            ("attacks", self.content.attacks().len()),
        ];
        if let Some((pool, _)) = pools.iter().find(|(_, len)| *len == 0) {
            return Err(GenerationError::EmptyPool(*pool));
        }

        let factions = &options.valid_factions;
        for category in EquipmentCategory::ALL {
            if options.picks(category) && !self.items.can_create(category, factions) {
                return Err(GenerationError::EmptyPool(category.pool_name()));
            }
        }
        Ok(())
    }
}

/// Convenience function to generate one NPC with the thread RNG.
pub fn generate_npc<C, I>(
    content: &C,
    items: &I,
    options: &NpcOptions,
) -> Result<Npc, GenerationError>
where
    C: ContentSource + ?Sized,
    I: ItemCreator + ?Sized,
{
    NpcGenerator::new(content, items).generate(options)
}

fn pick<R: Rng + ?Sized>(
    pool: &[String],
    name: &'static str,
    rng: &mut R,
) -> Result<String, GenerationError> {
    pool.choose(rng)
        .cloned()
        .ok_or(GenerationError::EmptyPool(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentPack;
    use crate::items::TemplateItemCreator;
    use crate::testing::{MockContent, MockItemCreator};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn options() -> NpcOptions {
        NpcOptions::new(["Marquise", "Eyrie"])
    }

    #[test]
    fn test_generate_basic() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let mut rng = StdRng::seed_from_u64(3);

        let npc = NpcGenerator::new(&content, &items)
            .generate_with_rng(&options(), &mut rng)
            .unwrap();

        assert!(content.names().contains(&npc.name));
        assert!(["Marquise", "Eyrie"].contains(&npc.faction.as_str()));
        assert!(content.jobs().contains(&npc.job));
        assert!(content.npc_drives().contains(&npc.drive));
        assert!(content.attacks().contains(&npc.attack));
        assert_eq!(npc.harm, Harm::default());
        assert!(npc.equipment.is_empty());
        assert!(items.calls().is_empty());
    }

    #[test]
    fn test_harm_max_within_ranges() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut opts = options();
        opts.injury_range = HarmRange::new(2, 4);
        opts.morale_range = HarmRange::new(0, 0);

        for _ in 0..100 {
            let npc = NpcGenerator::new(&content, &items)
                .generate_with_rng(&opts, &mut rng)
                .unwrap();
            assert!((2..=4).contains(&npc.harm_max.injury));
            assert_eq!(npc.harm_max.morale, 0);
            assert!((1..=3).contains(&npc.harm_max.depletion));
        }
    }

    #[test]
    fn test_empty_factions() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let result = generate_npc(&content, &items, &NpcOptions::default());
        assert_eq!(result.unwrap_err(), GenerationError::EmptyPool("factions"));
    }

    #[test]
    fn test_empty_content_pool() {
        let content = MockContent::sample().with_jobs(Vec::<String>::new());
        let items = MockItemCreator::new();
        let result = generate_npc(&content, &items, &options());
        assert_eq!(result.unwrap_err(), GenerationError::EmptyPool("jobs"));
    }

    #[test]
    fn test_bad_range_fails_before_items() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let opts = options()
            .with_all_equipment(true)
            .with_harm_range(HarmRange::new(0, 9));

        let result = generate_npc(&content, &items, &opts);
        assert!(matches!(
            result,
            Err(GenerationError::RangeTooWide { lower: 0, upper: 9 })
        ));
        assert!(items.calls().is_empty());
    }

    #[test]
    fn test_equipment_order_and_uniqueness() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let mut rng = StdRng::seed_from_u64(99);
        let opts = options().with_all_equipment(true);

        for _ in 0..200 {
            let npc = NpcGenerator::new(&content, &items)
                .generate_with_rng(&opts, &mut rng)
                .unwrap();
            let categories: Vec<_> = npc.equipment.iter().map(|i| i.category).collect();
            let mut sorted = categories.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(categories, sorted);
        }
    }

    #[test]
    fn test_items_receive_valid_factions() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let mut rng = StdRng::seed_from_u64(5);
        let opts = options().with_equipment(EquipmentCategory::Weapon);

        for _ in 0..20 {
            NpcGenerator::new(&content, &items)
                .generate_with_rng(&opts, &mut rng)
                .unwrap();
        }

        let calls = items.calls();
        assert!(!calls.is_empty());
        for (category, factions) in calls {
            assert_eq!(category, EquipmentCategory::Weapon);
            assert_eq!(factions, vec!["Marquise".to_string(), "Eyrie".to_string()]);
        }
    }

    #[test]
    fn test_missing_templates_fail_before_drawing() {
        let content = MockContent::sample();
        let pack = ContentPack::default();
        let items = TemplateItemCreator::new(&pack);
        let opts = options().with_equipment(EquipmentCategory::Shield);

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = NpcGenerator::new(&content, &items)
                .generate_with_rng(&opts, &mut rng);
            assert_eq!(
                result.unwrap_err(),
                GenerationError::EmptyPool("shield templates")
            );
        }
    }

    #[test]
    fn test_generate_with_dyn_rng() {
        let content = MockContent::sample();
        let items = MockItemCreator::new();
        let mut seeded = StdRng::seed_from_u64(12);
        let rng: &mut dyn RngCore = &mut seeded;
        let opts = options().with_all_equipment(true);

        let npc = NpcGenerator::new(&content, &items)
            .generate_with_rng(&opts, rng)
            .unwrap();
        assert!(content.names().contains(&npc.name));
    }

    #[test]
    fn test_options_json_defaults() {
        let json = r#"{"validFactions": ["Eyrie"], "pickBow": true, "injuryRange": [0, 2]}"#;
        let opts: NpcOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.valid_factions, vec!["Eyrie".to_string()]);
        assert!(opts.pick_bow);
        assert!(!opts.pick_weapon);
        assert_eq!(opts.injury_range, HarmRange::new(0, 2));
        assert_eq!(opts.morale_range, HarmRange::default());
    }
}
