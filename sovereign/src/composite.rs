//! Composite score and tier calculation.
//!
//! Integer arithmetic only. Each weighted term is floored on its own before
//! the terms are summed; integrators recomputing a composite must follow the
//! same order to get bit-identical results.

use crate::types::{Dimension, DimensionScores, MAX_SCORE};

/// Lowest composite score for each tier, highest tier first.
pub const TIER_THRESHOLDS: [(u8, u16); 5] = [(5, 8000), (4, 6000), (3, 4000), (2, 2000), (1, 0)];

/// Tier of an identity with no stored record.
pub const DEFAULT_TIER: u8 = 1;

const WEIGHT_SUM: u32 = Dimension::Trading.weight()
    + Dimension::Civic.weight()
    + Dimension::Developer.weight()
    + Dimension::Infra.weight();

// Bounded inputs and weights summing to 100 keep the composite in 0..=MAX_SCORE.
const _: () = assert!(WEIGHT_SUM == 100);
const _: () = assert!((MAX_SCORE as u32) * WEIGHT_SUM / 100 <= u16::MAX as u32);

/// Weighted contribution of one dimension, floored.
pub fn weighted_term(dimension: Dimension, score: u16) -> u16 {
    (score as u32 * dimension.weight() / 100) as u16
}

/// Composite score for `scores`.
///
/// Scores above [`MAX_SCORE`] are clamped first so the result stays in range
/// even for unchecked input.
pub fn composite(scores: &DimensionScores) -> u16 {
    Dimension::ALL
        .iter()
        .map(|d| weighted_term(*d, scores.get(*d).min(MAX_SCORE)))
        .sum()
}

/// Largest tier whose threshold `composite` reaches.
pub fn tier_for(composite: u16) -> u8 {
    TIER_THRESHOLDS
        .iter()
        .find(|(_, threshold)| composite >= *threshold)
        .map(|(tier, _)| *tier)
        .unwrap_or(DEFAULT_TIER)
}

/// Composite and tier for `scores`.
pub fn compute(scores: &DimensionScores) -> (u16, u8) {
    let composite = composite(scores);
    (composite, tier_for(composite))
}

/// Display name of a tier.
pub fn tier_name(tier: u8) -> &'static str {
    match tier {
        1 => "Bronze",
        2 => "Silver",
        3 => "Gold",
        4 => "Platinum",
        5 => "Diamond",
        _ => "Unknown",
    }
}
