//! Identity records and the default view handed to readers.

use serde::Serialize;

use crate::composite::{self, DEFAULT_TIER};
use crate::types::{Authorities, Dimension, DimensionScores, Principal, Timestamp};

/// Schema tag written into every identity record.
pub const IDENTITY_SCHEMA_VERSION: u8 = 1;

/// A stored identity.
///
/// Fields are read-only outside the crate. The composite and tier are only
/// ever produced by [`composite::compute`], so a record obtained from the store
/// or from [`crate::layout`] is always internally consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    pub(crate) owner: Principal,
    pub(crate) created_at: Timestamp,
    pub(crate) authorities: Authorities,
    pub(crate) scores: DimensionScores,
    pub(crate) composite_score: u16,
    pub(crate) tier: u8,
    pub(crate) last_updated: Timestamp,
    pub(crate) version: u8,
}

impl IdentityRecord {
    /// A freshly created identity: all scores zero and every authority set to the owner.
    pub(crate) fn new(owner: Principal, now: Timestamp) -> Self {
        Self {
            owner,
            created_at: now,
            authorities: Authorities::uniform(owner),
            scores: DimensionScores::default(),
            composite_score: 0,
            tier: DEFAULT_TIER,
            last_updated: now,
            version: IDENTITY_SCHEMA_VERSION,
        }
    }

    pub fn owner(&self) -> Principal {
        self.owner
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn authorities(&self) -> &Authorities {
        &self.authorities
    }

    pub fn authority(&self, dimension: Dimension) -> Principal {
        self.authorities.get(dimension)
    }

    pub fn scores(&self) -> DimensionScores {
        self.scores
    }

    pub fn score(&self, dimension: Dimension) -> u16 {
        self.scores.get(dimension)
    }

    pub fn composite_score(&self) -> u16 {
        self.composite_score
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whether the stored composite and tier match a fresh recomputation.
    pub fn is_consistent(&self) -> bool {
        self.scores.in_range() && composite::compute(&self.scores) == (self.composite_score, self.tier)
    }

    /// Write one score and recompute every derived field.
    pub(crate) fn apply_score(&mut self, dimension: Dimension, score: u16, now: Timestamp) {
        self.scores.set(dimension, score);
        let (composite, tier) = composite::compute(&self.scores);
        self.composite_score = composite;
        self.tier = tier;
        self.last_updated = now;
    }
}

/// What a non-strict read returns.
///
/// `exists` separates "no identity yet" from a stored identity that happens
/// to sit at tier 1 with a zero composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityView {
    pub exists: bool,
    pub scores: DimensionScores,
    pub composite_score: u16,
    pub tier: u8,
    pub authorities: Option<Authorities>,
}

impl IdentityView {
    /// The view of an identity that was never created.
    pub fn absent() -> Self {
        Self {
            exists: false,
            scores: DimensionScores::default(),
            composite_score: 0,
            tier: DEFAULT_TIER,
            authorities: None,
        }
    }
}

impl From<&IdentityRecord> for IdentityView {
    fn from(record: &IdentityRecord) -> Self {
        Self {
            exists: true,
            scores: record.scores,
            composite_score: record.composite_score,
            tier: record.tier,
            authorities: Some(record.authorities),
        }
    }
}
