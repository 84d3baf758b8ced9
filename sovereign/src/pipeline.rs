//! Score update pipeline.
//!
//! Checks the caller against the dimension's authority and the score against
//! its range, then writes the score, composite, tier, and timestamp as one
//! unit. The next state is built on a copy and committed with a single
//! assignment while the record's shard is write-locked.

use tracing::{info, warn};

use crate::error::{Result, SovereignError};
use crate::record::IdentityRecord;
use crate::store::IdentityStore;
use crate::types::{Address, Dimension, Principal, MAX_SCORE};

impl IdentityStore {
    /// Set `dimension` of the identity at `identity` to `new_score`.
    ///
    /// Fails, in this order, with `NotFound`, `InvalidScore` or
    /// `Unauthorized`; on failure the record is unchanged. Returns the
    /// committed record.
    pub fn update_score(
        &self,
        caller: &Principal,
        identity: &Address,
        dimension: Dimension,
        new_score: u16,
    ) -> Result<IdentityRecord> {
        let mut slot = self
            .records
            .get_mut(identity)
            .ok_or(SovereignError::NotFound(*identity))?;

        if new_score > MAX_SCORE {
            return Err(SovereignError::InvalidScore(new_score as u32));
        }
        if !slot.authorities.permits(dimension, caller) {
            warn!(caller = %caller, identity = %identity, dimension = %dimension, "Rejected score update from non-authority");
            return Err(SovereignError::Unauthorized {
                caller: *caller,
                dimension,
            });
        }

        let mut next = slot.value().clone();
        next.apply_score(dimension, new_score, self.clock.now());
        *slot = next.clone();
        drop(slot);

        info!(
            identity = %identity,
            dimension = %dimension,
            score = new_score,
            composite = next.composite_score,
            tier = next.tier,
            "Updated score"
        );
        Ok(next)
    }
}
