//! Authority registry.
//!
//! The four authority pointers embedded in each identity. Only the owner may
//! repoint them, one dimension per call. Repointing does not recompute any
//! score and does not move `last_updated`.

use tracing::{info, warn};

use crate::address::identity_address;
use crate::error::{Result, SovereignError};
use crate::store::IdentityStore;
use crate::types::{Dimension, Principal};

impl IdentityStore {
    /// Delegate `dimension` of `owner`'s identity to `new_authority`.
    ///
    /// Checked in order: the identity exists, `caller` is its owner, and
    /// `new_authority` is not the zero principal.
    pub fn set_authority(
        &self,
        caller: &Principal,
        owner: &Principal,
        dimension: Dimension,
        new_authority: Principal,
    ) -> Result<()> {
        let address = identity_address(owner);
        let mut record = self
            .records
            .get_mut(&address)
            .ok_or(SovereignError::NotFound(address))?;

        if record.owner != *caller {
            warn!(caller = %caller, owner = %owner, dimension = %dimension, "Rejected authority change from non-owner");
            return Err(SovereignError::OwnerMismatch { caller: *caller });
        }
        if new_authority.is_zero() {
            return Err(SovereignError::InvalidAuthority(dimension));
        }

        record.authorities.set(dimension, new_authority);
        info!(owner = %owner, dimension = %dimension, authority = %new_authority, "Set authority");
        Ok(())
    }

    /// The principal currently allowed to write `dimension` of `owner`'s identity.
    pub fn authority_of(&self, owner: &Principal, dimension: Dimension) -> Result<Principal> {
        let address = identity_address(owner);
        self.records
            .get(&address)
            .map(|r| r.authorities.get(dimension))
            .ok_or(SovereignError::NotFound(address))
    }
}
