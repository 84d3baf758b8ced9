//! Detail ledger.
//!
//! Optional per-dimension metrics that accompany a coarse score. A detail
//! record is written under the same authority check as a score update but
//! never touches the identity record; callers wanting both effects issue both
//! operations.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::address::detail_address;
use crate::error::{PersistenceError, Result, SovereignError};
use crate::store::IdentityStore;
use crate::types::{Address, Dimension, Principal, Timestamp, MAX_SCORE};

/// Schema tag written into every detail record.
pub const DETAIL_SCHEMA_VERSION: u8 = 1;

/// Upper bound for `profit_factor_bps` (5.0x).
pub const MAX_PROFIT_FACTOR_BPS: u16 = 50_000;

/// Trading performance breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradingMetrics {
    /// Win rate in basis points (0-10000)
    pub win_rate_bps: u16,
    /// Profit factor in basis points (0-50000 = 0-5.0x)
    pub profit_factor_bps: u16,
    pub total_trades: u64,
    /// Volume in USDC base units (6 decimals)
    pub total_volume: u64,
    /// Maximum drawdown in basis points
    pub max_drawdown_bps: u16,
}

/// Civic participation breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CivicMetrics {
    pub problems_solved: u64,
    /// Prediction accuracy in basis points (0-10000)
    pub prediction_accuracy_bps: u16,
    pub directions_proposed: u64,
    pub directions_won: u64,
    pub current_streak: u16,
    /// Community trust (0-10000)
    pub community_trust: u16,
}

/// Metrics for one dimension. The variant decides which dimension is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailMetrics {
    Trading(TradingMetrics),
    Civic(CivicMetrics),
}

impl DetailMetrics {
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Trading(_) => Dimension::Trading,
            Self::Civic(_) => Dimension::Civic,
        }
    }

    /// Reject metrics outside their documented ranges.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Trading(m) => {
                check_bps("win_rate_bps", m.win_rate_bps, MAX_SCORE)?;
                check_bps("profit_factor_bps", m.profit_factor_bps, MAX_PROFIT_FACTOR_BPS)?;
                check_bps("max_drawdown_bps", m.max_drawdown_bps, MAX_SCORE)?;
            }
            Self::Civic(m) => {
                check_bps("prediction_accuracy_bps", m.prediction_accuracy_bps, MAX_SCORE)?;
                check_bps("community_trust", m.community_trust, MAX_SCORE)?;
                if m.directions_won > m.directions_proposed {
                    return Err(SovereignError::InvalidMetric {
                        field: "directions_won",
                        value: m.directions_won,
                        reason: "exceeds directions_proposed",
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_bps(field: &'static str, value: u16, max: u16) -> Result<()> {
    if value > max {
        return Err(SovereignError::InvalidMetric {
            field,
            value: value as u64,
            reason: "out of range",
        });
    }
    Ok(())
}

/// A stored detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub(crate) identity: Address,
    pub(crate) metrics: DetailMetrics,
    pub(crate) last_updated: Timestamp,
    pub(crate) version: u8,
}

impl DetailRecord {
    pub fn identity(&self) -> Address {
        self.identity
    }

    pub fn metrics(&self) -> &DetailMetrics {
        &self.metrics
    }

    pub fn dimension(&self) -> Dimension {
        self.metrics.dimension()
    }

    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Where this record is stored.
    pub fn address(&self) -> Address {
        detail_address(&self.identity, self.dimension())
    }
}

/// Sole owner of detail records.
pub struct DetailLedger {
    details: DashMap<Address, DetailRecord>,
}

impl DetailLedger {
    pub fn new() -> Self {
        Self {
            details: DashMap::new(),
        }
    }

    /// Create or overwrite the detail record for `metrics.dimension()`.
    ///
    /// The identity's shard stays read-locked until the detail is committed,
    /// so the authority cannot be repointed between the check and the write.
    pub fn upsert_detail(
        &self,
        identities: &IdentityStore,
        caller: &Principal,
        identity: &Address,
        metrics: DetailMetrics,
    ) -> Result<DetailRecord> {
        let dimension = metrics.dimension();
        let owner_record = identities
            .records
            .get(identity)
            .ok_or(SovereignError::NotFound(*identity))?;

        metrics.validate()?;
        if !owner_record.authorities.permits(dimension, caller) {
            warn!(caller = %caller, identity = %identity, dimension = %dimension, "Rejected detail write from non-authority");
            return Err(SovereignError::Unauthorized {
                caller: *caller,
                dimension,
            });
        }

        let record = DetailRecord {
            identity: *identity,
            metrics,
            last_updated: identities.clock.now(),
            version: DETAIL_SCHEMA_VERSION,
        };
        let address = record.address();
        let created = self.details.insert(address, record.clone()).is_none();
        drop(owner_record);

        info!(identity = %identity, dimension = %dimension, created, "Wrote score details");
        Ok(record)
    }

    /// The detail record, or `DetailsNotInitialized`.
    pub fn get_detail(&self, identity: &Address, dimension: Dimension) -> Result<DetailRecord> {
        self.find_detail(identity, dimension)
            .ok_or(SovereignError::DetailsNotInitialized {
                identity: *identity,
                dimension,
            })
    }

    pub fn find_detail(&self, identity: &Address, dimension: Dimension) -> Option<DetailRecord> {
        self.details
            .get(&detail_address(identity, dimension))
            .map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Every stored detail record, sorted by address.
    pub fn records(&self) -> Vec<(Address, DetailRecord)> {
        let mut all: Vec<_> = self
            .details
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub(crate) fn restore(&self, record: DetailRecord) -> std::result::Result<Address, PersistenceError> {
        let address = record.address();
        if self.details.contains_key(&address) {
            return Err(PersistenceError::Duplicate(address));
        }
        self.details.insert(address, record);
        Ok(address)
    }
}

impl Default for DetailLedger {
    fn default() -> Self {
        Self::new()
    }
}
