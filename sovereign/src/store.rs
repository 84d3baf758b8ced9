//! Identity store.
//!
//! Holds one [`IdentityRecord`] per owner, keyed by its derived address.
//! Records live in a sharded concurrent map: a mutation holds the write lock
//! of the record's shard for the whole check-and-commit step, and readers get
//! cloned snapshots, so no reader ever sees a half-applied change.
//! Authority changes live in [`crate::registry`] and score writes in
//! [`crate::pipeline`]; both are further `impl` blocks on this type.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::address::identity_address;
use crate::clock::Clock;
use crate::error::{PersistenceError, Result, SovereignError};
use crate::record::{IdentityRecord, IdentityView};
use crate::types::{Address, Principal};

/// Default number of identities to pre-size the map for.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Sole owner of identity records.
pub struct IdentityStore {
    pub(crate) records: DashMap<Address, IdentityRecord>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl IdentityStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, clock)
    }

    pub fn with_capacity(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            clock,
        }
    }

    /// Create the identity for `owner`.
    ///
    /// Fails with [`SovereignError::AlreadyExists`] if one is already stored;
    /// the existing record is left untouched.
    pub fn create(&self, owner: Principal) -> Result<Address> {
        let address = identity_address(&owner);

        match self.records.entry(address) {
            Entry::Occupied(_) => Err(SovereignError::AlreadyExists { owner, address }),
            Entry::Vacant(slot) => {
                slot.insert(IdentityRecord::new(owner, self.clock.now()));
                info!(owner = %owner, address = %address, "Created identity");
                Ok(address)
            }
        }
    }

    /// The identity owned by `owner`, or [`SovereignError::NotFound`].
    pub fn read_strict(&self, owner: &Principal) -> Result<IdentityRecord> {
        let address = identity_address(owner);
        self.get(&address).ok_or(SovereignError::NotFound(address))
    }

    /// The identity owned by `owner`, or the default view if none exists.
    ///
    /// Never creates anything.
    pub fn read_default(&self, owner: &Principal) -> IdentityView {
        match self.records.get(&identity_address(owner)) {
            Some(record) => IdentityView::from(record.value()),
            None => {
                debug!(owner = %owner, "No identity, returning default view");
                IdentityView::absent()
            }
        }
    }

    /// The identity stored at `address`, if any.
    pub fn get(&self, address: &Address) -> Option<IdentityRecord> {
        self.records.get(address).map(|r| r.value().clone())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.records.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every stored identity, sorted by address.
    pub fn records(&self) -> Vec<(Address, IdentityRecord)> {
        let mut all: Vec<_> = self
            .records
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Put back a record read from a snapshot.
    ///
    /// The record has already passed layout validation; its address is
    /// re-derived from the owner rather than trusted from the snapshot.
    pub(crate) fn restore(&self, record: IdentityRecord) -> std::result::Result<Address, PersistenceError> {
        let address = identity_address(&record.owner);
        match self.records.entry(address) {
            Entry::Occupied(_) => Err(PersistenceError::Duplicate(address)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(address)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::Dimension;

    fn store() -> IdentityStore {
        IdentityStore::new(Arc::new(FixedClock::new(1_000)))
    }

    fn owner(byte: u8) -> Principal {
        Principal::from_bytes([byte; 32])
    }

    #[test]
    fn test_create_and_read() {
        let store = store();
        let address = store.create(owner(1)).unwrap();

        assert_eq!(address, identity_address(&owner(1)));
        let record = store.read_strict(&owner(1)).unwrap();
        assert_eq!(record.owner(), owner(1));
        assert_eq!(record.created_at(), 1_000);
        assert_eq!(record.tier(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_twice_fails() {
        let store = store();
        store.create(owner(1)).unwrap();
        let before = store.read_strict(&owner(1)).unwrap();

        let err = store.create(owner(1)).unwrap_err();
        assert!(matches!(err, SovereignError::AlreadyExists { .. }));
        assert_eq!(store.read_strict(&owner(1)).unwrap(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_read_strict_missing() {
        let store = store();
        let err = store.read_strict(&owner(2)).unwrap_err();
        assert_eq!(err, SovereignError::NotFound(identity_address(&owner(2))));
    }

    #[test]
    fn test_read_default_missing_does_not_create() {
        let store = store();
        let view = store.read_default(&owner(3));

        assert!(!view.exists);
        assert_eq!(view.tier, 1);
        assert_eq!(view.composite_score, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_default_existing() {
        let store = store();
        store.create(owner(3)).unwrap();
        let view = store.read_default(&owner(3));

        assert!(view.exists);
        assert_eq!(view.authorities.unwrap().get(Dimension::Infra), owner(3));
    }

    #[test]
    fn test_concurrent_creates_single_winner() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.create(owner(9)).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_records_sorted() {
        let store = store();
        for b in [3u8, 1, 2] {
            store.create(owner(b)).unwrap();
        }
        let records = store.records();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
