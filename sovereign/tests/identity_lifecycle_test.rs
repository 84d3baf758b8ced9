//! End-to-end identity lifecycle tests through the public API

use std::sync::Arc;

use sovereign::{
    compute, identity_address, layout, Dimension, DimensionScores, FixedClock, Principal,
    Sovereign, SovereignConfig, SovereignError,
};

fn principal(byte: u8) -> Principal {
    Principal::from_bytes([byte; 32])
}

fn setup() -> (Sovereign, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(1_700_000_000));
    let sovereign = Sovereign::with_config(&SovereignConfig::default(), clock.clone());
    (sovereign, clock)
}

#[test]
fn test_fresh_identity_is_fully_initialized() {
    let (s, _) = setup();
    let owner = principal(1);
    let address = s.create_identity(owner).unwrap();

    assert_eq!(address, identity_address(&owner));
    let record = s.get_identity(&owner).unwrap();
    for dim in Dimension::ALL {
        assert_eq!(record.authority(dim), owner);
        assert_eq!(record.score(dim), 0);
    }
    assert_eq!(record.composite_score(), 0);
    assert_eq!(record.tier(), 1);
    assert!(record.is_consistent());
}

#[test]
fn test_second_create_fails_and_keeps_first() {
    let (s, clock) = setup();
    let owner = principal(1);
    let identity = s.create_identity(owner).unwrap();
    s.update_trading_score(&owner, &identity, 5000).unwrap();
    let first = s.get_identity(&owner).unwrap();

    clock.advance(3600);
    let err = s.create_identity(owner).unwrap_err();
    assert!(matches!(err, SovereignError::AlreadyExists { .. }));
    assert_eq!(s.get_identity(&owner).unwrap(), first);
}

#[test]
fn test_unauthorized_update_is_bitwise_noop() {
    let (s, clock) = setup();
    let owner = principal(1);
    let identity = s.create_identity(owner).unwrap();
    s.update_civic_score(&owner, &identity, 3000).unwrap();
    let before = layout::encode_identity(&s.get_identity(&owner).unwrap());

    clock.advance(10);
    for dim in Dimension::ALL {
        let err = s.update_score(&principal(2), &identity, dim, 9000).unwrap_err();
        assert!(matches!(err, SovereignError::Unauthorized { .. }));
    }
    let after = layout::encode_identity(&s.get_identity(&owner).unwrap());
    assert_eq!(before, after);
}

#[test]
fn test_invalid_score_is_bitwise_noop() {
    let (s, _) = setup();
    let owner = principal(1);
    let identity = s.create_identity(owner).unwrap();
    let before = layout::encode_identity(&s.get_identity(&owner).unwrap());

    assert_eq!(
        s.update_developer_score(&owner, &identity, 10_001).unwrap_err(),
        SovereignError::InvalidScore(10_001)
    );
    assert_eq!(before, layout::encode_identity(&s.get_identity(&owner).unwrap()));
}

#[test]
fn test_non_owner_cannot_delegate() {
    let (s, _) = setup();
    let owner = principal(1);
    s.create_identity(owner).unwrap();

    let err = s
        .set_infra_authority(&principal(2), &owner, principal(2))
        .unwrap_err();
    assert_eq!(err, SovereignError::OwnerMismatch { caller: principal(2) });
    assert_eq!(s.get_identity(&owner).unwrap().authority(Dimension::Infra), owner);
}

#[test]
fn test_authority_change_keeps_timestamp() {
    let (s, clock) = setup();
    let owner = principal(1);
    s.create_identity(owner).unwrap();
    let before = s.get_identity(&owner).unwrap().last_updated();

    clock.advance(500);
    s.set_developer_authority(&owner, &owner, principal(4)).unwrap();
    assert_eq!(s.get_identity(&owner).unwrap().last_updated(), before);
}

#[test]
fn test_score_update_moves_timestamp_and_tier() {
    let (s, clock) = setup();
    let owner = principal(1);
    let identity = s.create_identity(owner).unwrap();

    clock.advance(42);
    s.update_trading_score(&owner, &identity, 7500).unwrap();
    let record = s.update_civic_score(&owner, &identity, 8000).unwrap();

    assert_eq!(record.composite_score(), 5000);
    assert_eq!(record.tier(), 3);
    assert_eq!(record.last_updated(), 1_700_000_042);
    assert_eq!(record.created_at(), 1_700_000_000);
    assert_eq!((record.composite_score(), record.tier()), compute(&record.scores()));
}

#[test]
fn test_defaulted_reads_never_fail() {
    let (s, _) = setup();
    let stranger = principal(77);

    assert_eq!(s.get_tier(&stranger), 1);
    assert_eq!(s.get_composite_score(&stranger), 0);
    assert_eq!(s.get_scores(&stranger), DimensionScores::default());
    assert!(!s.view_identity(&stranger).exists);
    assert!(s.identities().is_empty());
}

#[test]
fn test_identities_are_independent() {
    let (s, _) = setup();
    let a = s.create_identity(principal(1)).unwrap();
    let b = s.create_identity(principal(2)).unwrap();

    s.update_trading_score(&principal(1), &a, 10_000).unwrap();
    assert_eq!(s.get_composite_score(&principal(1)), 4000);
    assert_eq!(s.get_composite_score(&principal(2)), 0);

    // an identity's owner has no say over another identity
    assert!(s.update_trading_score(&principal(1), &b, 10_000).is_err());
}
