//! Deterministic record addressing.
//!
//! A record's address is a fixed-domain SHA-256 over a namespace tag and a
//! seed, so the store, an authority, and an external reader all arrive at the
//! same location without consulting any directory:
//!
//! ```text
//! address = SHA-256("sovereign:address:v1" || len(namespace) || namespace || seed)
//! ```
//!
//! The namespace is length-prefixed so that no (namespace, seed) pair can be
//! re-split into a different pair with the same preimage.

use sha2::{Digest, Sha256};

use crate::types::{Address, Dimension, Principal};

/// Domain separator mixed into every derivation.
pub const ADDRESS_DOMAIN: &[u8] = b"sovereign:address:v1";

/// Namespace for identity records; the seed is the owner id.
pub const IDENTITY_NAMESPACE: &str = "identity";

/// Namespace for detail records; the seed is identity address || dimension tag.
pub const DETAIL_NAMESPACE: &str = "detail";

/// Derive the address for `seed` under `namespace`.
pub fn derive_address(namespace: &str, seed: &[u8]) -> Address {
    let ns = namespace.as_bytes();
    debug_assert!(ns.len() <= u8::MAX as usize, "namespace tag too long");

    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update([ns.len() as u8]);
    hasher.update(ns);
    hasher.update(seed);
    Address::from_bytes(hasher.finalize().into())
}

/// Address of the identity record owned by `owner`.
pub fn identity_address(owner: &Principal) -> Address {
    derive_address(IDENTITY_NAMESPACE, owner.as_bytes())
}

/// Address of the `dimension` detail record belonging to `identity`.
pub fn detail_address(identity: &Address, dimension: Dimension) -> Address {
    let mut seed = [0u8; Address::LEN + 1];
    seed[..Address::LEN].copy_from_slice(identity.as_bytes());
    seed[Address::LEN] = dimension.tag();
    derive_address(DETAIL_NAMESPACE, &seed)
}
