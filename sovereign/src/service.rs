//! The public operation surface.
//!
//! [`Sovereign`] ties the identity store, the authority registry, the score
//! pipeline, and the detail ledger together behind the operations external
//! callers use. Owner operations (`create_identity`, `set_*_authority`) and
//! authority operations (`update_*_score`, `upsert_detail`) are disjoint; each
//! call names its caller and is checked on its own.

use std::sync::Arc;

use crate::address::identity_address;
use crate::clock::{Clock, SystemClock};
use crate::config::SovereignConfig;
use crate::detail::{DetailLedger, DetailMetrics, DetailRecord};
use crate::error::Result;
use crate::record::{IdentityRecord, IdentityView};
use crate::store::IdentityStore;
use crate::types::{Address, Dimension, DimensionScores, Principal};

pub struct Sovereign {
    identities: IdentityStore,
    details: DetailLedger,
}

impl Sovereign {
    /// Empty state using wall-clock time.
    pub fn new() -> Self {
        Self::with_config(&SovereignConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_config(config: &SovereignConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            identities: IdentityStore::with_capacity(config.initial_capacity, clock),
            details: DetailLedger::new(),
        }
    }

    pub fn identities(&self) -> &IdentityStore {
        &self.identities
    }

    pub fn details(&self) -> &DetailLedger {
        &self.details
    }

    // === Identity ===

    /// Create the identity for `owner`. Anyone may create their own.
    pub fn create_identity(&self, owner: Principal) -> Result<Address> {
        self.identities.create(owner)
    }

    /// Strict read: the stored identity or `NotFound`.
    pub fn get_identity(&self, owner: &Principal) -> Result<IdentityRecord> {
        self.identities.read_strict(owner)
    }

    pub fn find_identity(&self, owner: &Principal) -> Option<IdentityRecord> {
        self.identities.get(&identity_address(owner))
    }

    /// Defaulted read: never fails, never creates.
    pub fn view_identity(&self, owner: &Principal) -> IdentityView {
        self.identities.read_default(owner)
    }

    pub fn get_tier(&self, owner: &Principal) -> u8 {
        self.view_identity(owner).tier
    }

    pub fn get_composite_score(&self, owner: &Principal) -> u16 {
        self.view_identity(owner).composite_score
    }

    pub fn get_scores(&self, owner: &Principal) -> DimensionScores {
        self.view_identity(owner).scores
    }

    // === Authorities ===

    pub fn set_authority(
        &self,
        caller: &Principal,
        owner: &Principal,
        dimension: Dimension,
        new_authority: Principal,
    ) -> Result<()> {
        self.identities.set_authority(caller, owner, dimension, new_authority)
    }

    pub fn set_trading_authority(&self, caller: &Principal, owner: &Principal, new_authority: Principal) -> Result<()> {
        self.set_authority(caller, owner, Dimension::Trading, new_authority)
    }

    pub fn set_civic_authority(&self, caller: &Principal, owner: &Principal, new_authority: Principal) -> Result<()> {
        self.set_authority(caller, owner, Dimension::Civic, new_authority)
    }

    pub fn set_developer_authority(&self, caller: &Principal, owner: &Principal, new_authority: Principal) -> Result<()> {
        self.set_authority(caller, owner, Dimension::Developer, new_authority)
    }

    pub fn set_infra_authority(&self, caller: &Principal, owner: &Principal, new_authority: Principal) -> Result<()> {
        self.set_authority(caller, owner, Dimension::Infra, new_authority)
    }

    // === Scores ===

    pub fn update_score(
        &self,
        caller: &Principal,
        identity: &Address,
        dimension: Dimension,
        score: u16,
    ) -> Result<IdentityRecord> {
        self.identities.update_score(caller, identity, dimension, score)
    }

    pub fn update_trading_score(&self, caller: &Principal, identity: &Address, score: u16) -> Result<IdentityRecord> {
        self.update_score(caller, identity, Dimension::Trading, score)
    }

    pub fn update_civic_score(&self, caller: &Principal, identity: &Address, score: u16) -> Result<IdentityRecord> {
        self.update_score(caller, identity, Dimension::Civic, score)
    }

    pub fn update_developer_score(&self, caller: &Principal, identity: &Address, score: u16) -> Result<IdentityRecord> {
        self.update_score(caller, identity, Dimension::Developer, score)
    }

    pub fn update_infra_score(&self, caller: &Principal, identity: &Address, score: u16) -> Result<IdentityRecord> {
        self.update_score(caller, identity, Dimension::Infra, score)
    }

    // === Details ===

    pub fn upsert_detail(
        &self,
        caller: &Principal,
        identity: &Address,
        metrics: DetailMetrics,
    ) -> Result<DetailRecord> {
        self.details.upsert_detail(&self.identities, caller, identity, metrics)
    }

    pub fn get_detail(&self, identity: &Address, dimension: Dimension) -> Result<DetailRecord> {
        self.details.get_detail(identity, dimension)
    }

    pub fn find_detail(&self, identity: &Address, dimension: Dimension) -> Option<DetailRecord> {
        self.details.find_detail(identity, dimension)
    }
}

impl Default for Sovereign {
    fn default() -> Self {
        Self::new()
    }
}
