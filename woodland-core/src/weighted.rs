//! Weighted range sampling.
//!
//! Harm maxima are rolled over small inclusive ranges where the second value
//! is the most likely outcome. Each offset from the lower bound carries a fixed
//! weight, and the draw is uniform over the resulting multiset.

use crate::npc::GenerationError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of each offset from the lower bound of a range.
pub const RANGE_WEIGHTS: [u32; 5] = [25, 50, 30, 15, 5];

/// Largest allowed `upper - lower`.
pub const MAX_RANGE_SPAN: u32 = (RANGE_WEIGHTS.len() - 1) as u32;

/// An inclusive `[lower, upper]` range for a weighted roll.
///
/// Serializes as a two-element array, e.g. `[1, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HarmRange(pub u32, pub u32);

impl HarmRange {
    pub fn new(lower: u32, upper: u32) -> Self {
        Self(lower, upper)
    }

    pub fn lower(&self) -> u32 {
        self.0
    }

    pub fn upper(&self) -> u32 {
        self.1
    }

    /// Check the range can be sampled.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let (lower, upper) = (self.0, self.1);
        if lower > upper {
            return Err(GenerationError::InvertedRange { lower, upper });
        }
        if upper - lower > MAX_RANGE_SPAN {
            return Err(GenerationError::RangeTooWide { lower, upper });
        }
        Ok(())
    }

    /// The `(value, weight)` pairs a roll over this range draws from.
    pub fn frequency_table(&self) -> Result<Vec<(u32, u32)>, GenerationError> {
        self.validate()?;
        Ok((self.0..=self.1)
            .zip(RANGE_WEIGHTS.iter().copied())
            .collect())
    }

    /// Roll a value from the range.
    pub fn pick(&self) -> Result<u32, GenerationError> {
        self.pick_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn pick_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u32, GenerationError> {
        let table = self.frequency_table()?;
        let total: u32 = table.iter().map(|(_, weight)| weight).sum();

        let mut roll = rng.gen_range(0..total);
        for (value, weight) in &table {
            if roll < *weight {
                return Ok(*value);
            }
            roll -= weight;
        }

        // The loop always returns since roll < total.
        Ok(self.1)
    }
}

impl Default for HarmRange {
    fn default() -> Self {
        Self(1, 3)
    }
}

impl fmt::Display for HarmRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// Convenience function to roll over `[lower, upper]`.
pub fn pick_from_range(lower: u32, upper: u32) -> Result<u32, GenerationError> {
    HarmRange::new(lower, upper).pick()
}

/// Roll over `[lower, upper]` with a specific RNG.
pub fn pick_from_range_with_rng<R: Rng + ?Sized>(
    lower: u32,
    upper: u32,
    rng: &mut R,
) -> Result<u32, GenerationError> {
    HarmRange::new(lower, upper).pick_with_rng(rng)
}
