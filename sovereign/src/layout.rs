//! Raw record layouts.
//!
//! Fixed field order and widths, little-endian, for consumers that parse
//! record bytes directly. Offsets are stable for a given schema version.
//!
//! Identity (188 bytes):
//!
//! | offset | width | field |
//! |-------:|------:|-------|
//! | 0   | 32 | owner |
//! | 32  | 8  | created_at |
//! | 40  | 32 | trading authority |
//! | 72  | 32 | civic authority |
//! | 104 | 32 | developer authority |
//! | 136 | 32 | infra authority |
//! | 168 | 2  | trading score |
//! | 170 | 2  | civic score |
//! | 172 | 2  | developer score |
//! | 174 | 2  | infra score |
//! | 176 | 2  | composite score |
//! | 178 | 1  | tier |
//! | 179 | 8  | last_updated |
//! | 187 | 1  | version |
//!
//! Detail records are the identity address, then the metric fields in
//! declaration order, then `last_updated` and version. The layout carries no
//! dimension tag; the decoder is told which dimension to expect.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::composite;
use crate::detail::{CivicMetrics, DetailMetrics, DetailRecord, TradingMetrics, DETAIL_SCHEMA_VERSION};
use crate::error::LayoutError;
use crate::record::{IdentityRecord, IDENTITY_SCHEMA_VERSION};
use crate::types::{Address, Authorities, Dimension, DimensionScores, Principal, MAX_SCORE};

pub const IDENTITY_LEN: usize = 188;
pub const TRADING_DETAIL_LEN: usize = 63;
pub const CIVIC_DETAIL_LEN: usize = 71;

pub const OWNER_OFFSET: usize = 0;
pub const CREATED_AT_OFFSET: usize = 32;
pub const AUTHORITIES_OFFSET: usize = 40;
pub const SCORES_OFFSET: usize = 168;
pub const COMPOSITE_OFFSET: usize = 176;
pub const TIER_OFFSET: usize = 178;
pub const LAST_UPDATED_OFFSET: usize = 179;
pub const VERSION_OFFSET: usize = 187;

/// Serialized length of the detail layout for `dimension`, if it has one.
pub fn detail_len(dimension: Dimension) -> Option<usize> {
    match dimension {
        Dimension::Trading => Some(TRADING_DETAIL_LEN),
        Dimension::Civic => Some(CIVIC_DETAIL_LEN),
        Dimension::Developer | Dimension::Infra => None,
    }
}

pub fn encode_identity(record: &IdentityRecord) -> Bytes {
    let mut buf = BytesMut::with_capacity(IDENTITY_LEN);
    buf.put_slice(record.owner.as_bytes());
    buf.put_i64_le(record.created_at);
    for dim in Dimension::ALL {
        buf.put_slice(record.authorities.get(dim).as_bytes());
    }
    for dim in Dimension::ALL {
        buf.put_u16_le(record.scores.get(dim));
    }
    buf.put_u16_le(record.composite_score);
    buf.put_u8(record.tier);
    buf.put_i64_le(record.last_updated);
    buf.put_u8(record.version);
    debug_assert_eq!(buf.len(), IDENTITY_LEN);
    buf.freeze()
}

/// Decode an identity, rejecting anything a live store could not hold.
pub fn decode_identity(raw: &[u8]) -> Result<IdentityRecord, LayoutError> {
    expect_len(raw, IDENTITY_LEN)?;
    let version = raw[VERSION_OFFSET];
    if version != IDENTITY_SCHEMA_VERSION {
        return Err(LayoutError::Version(version));
    }

    let mut buf = raw;
    let owner = get_principal(&mut buf);
    let created_at = buf.get_i64_le();
    let authorities = Authorities {
        trading: get_principal(&mut buf),
        civic: get_principal(&mut buf),
        developer: get_principal(&mut buf),
        infra: get_principal(&mut buf),
    };
    let scores = DimensionScores {
        trading: buf.get_u16_le(),
        civic: buf.get_u16_le(),
        developer: buf.get_u16_le(),
        infra: buf.get_u16_le(),
    };
    let composite_score = buf.get_u16_le();
    let tier = buf.get_u8();
    let last_updated = buf.get_i64_le();

    for dim in Dimension::ALL {
        let value = scores.get(dim);
        if value > MAX_SCORE {
            return Err(LayoutError::ScoreOutOfRange {
                field: dim.as_str(),
                value,
            });
        }
    }
    let (computed, computed_tier) = composite::compute(&scores);
    if composite_score != computed {
        return Err(LayoutError::CompositeMismatch {
            stored: composite_score,
            computed,
        });
    }
    if tier != computed_tier {
        return Err(LayoutError::TierMismatch {
            stored: tier,
            computed: computed_tier,
        });
    }

    Ok(IdentityRecord {
        owner,
        created_at,
        authorities,
        scores,
        composite_score,
        tier,
        last_updated,
        version,
    })
}

pub fn encode_detail(record: &DetailRecord) -> Bytes {
    let mut buf = BytesMut::with_capacity(detail_len(record.dimension()).unwrap_or_default());
    buf.put_slice(record.identity.as_bytes());
    match &record.metrics {
        DetailMetrics::Trading(m) => {
            buf.put_u16_le(m.win_rate_bps);
            buf.put_u16_le(m.profit_factor_bps);
            buf.put_u64_le(m.total_trades);
            buf.put_u64_le(m.total_volume);
            buf.put_u16_le(m.max_drawdown_bps);
        }
        DetailMetrics::Civic(m) => {
            buf.put_u64_le(m.problems_solved);
            buf.put_u16_le(m.prediction_accuracy_bps);
            buf.put_u64_le(m.directions_proposed);
            buf.put_u64_le(m.directions_won);
            buf.put_u16_le(m.current_streak);
            buf.put_u16_le(m.community_trust);
        }
    }
    buf.put_i64_le(record.last_updated);
    buf.put_u8(record.version);
    buf.freeze()
}

pub fn decode_detail(dimension: Dimension, raw: &[u8]) -> Result<DetailRecord, LayoutError> {
    let expected = detail_len(dimension).ok_or(LayoutError::NoDetailLayout(dimension))?;
    expect_len(raw, expected)?;
    let version = raw[expected - 1];
    if version != DETAIL_SCHEMA_VERSION {
        return Err(LayoutError::Version(version));
    }

    let mut buf = raw;
    let identity = Address::from_bytes(get_array(&mut buf));
    let metrics = match dimension {
        Dimension::Trading => DetailMetrics::Trading(TradingMetrics {
            win_rate_bps: buf.get_u16_le(),
            profit_factor_bps: buf.get_u16_le(),
            total_trades: buf.get_u64_le(),
            total_volume: buf.get_u64_le(),
            max_drawdown_bps: buf.get_u16_le(),
        }),
        Dimension::Civic => DetailMetrics::Civic(CivicMetrics {
            problems_solved: buf.get_u64_le(),
            prediction_accuracy_bps: buf.get_u16_le(),
            directions_proposed: buf.get_u64_le(),
            directions_won: buf.get_u64_le(),
            current_streak: buf.get_u16_le(),
            community_trust: buf.get_u16_le(),
        }),
        Dimension::Developer | Dimension::Infra => return Err(LayoutError::NoDetailLayout(dimension)),
    };
    metrics.validate()?;
    let last_updated = buf.get_i64_le();

    Ok(DetailRecord {
        identity,
        metrics,
        last_updated,
        version,
    })
}

fn expect_len(raw: &[u8], expected: usize) -> Result<(), LayoutError> {
    if raw.len() != expected {
        return Err(LayoutError::Length {
            expected,
            actual: raw.len(),
        });
    }
    Ok(())
}

fn get_array(buf: &mut &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    buf.copy_to_slice(&mut out);
    out
}

fn get_principal(buf: &mut &[u8]) -> Principal {
    Principal::from_bytes(get_array(buf))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::FixedClock;
    use crate::detail::DetailLedger;
    use crate::store::IdentityStore;

    fn principal(byte: u8) -> Principal {
        Principal::from_bytes([byte; 32])
    }

    fn scored_record() -> IdentityRecord {
        let mut record = IdentityRecord::new(principal(1), 1_700_000_000);
        record.authorities.set(Dimension::Civic, principal(2));
        record.apply_score(Dimension::Trading, 7500, 1_700_000_100);
        record.apply_score(Dimension::Civic, 8000, 1_700_000_200);
        record
    }

    #[test]
    fn test_identity_offsets() {
        let record = scored_record();
        let raw = encode_identity(&record);

        assert_eq!(raw.len(), IDENTITY_LEN);
        assert_eq!(&raw[OWNER_OFFSET..OWNER_OFFSET + 32], principal(1).as_bytes());
        assert_eq!(
            &raw[CREATED_AT_OFFSET..CREATED_AT_OFFSET + 8],
            &1_700_000_000i64.to_le_bytes()
        );
        // civic authority is the second pointer
        assert_eq!(
            &raw[AUTHORITIES_OFFSET + 32..AUTHORITIES_OFFSET + 64],
            principal(2).as_bytes()
        );
        assert_eq!(&raw[SCORES_OFFSET..SCORES_OFFSET + 2], &7500u16.to_le_bytes());
        assert_eq!(&raw[SCORES_OFFSET + 2..SCORES_OFFSET + 4], &8000u16.to_le_bytes());
        assert_eq!(&raw[COMPOSITE_OFFSET..COMPOSITE_OFFSET + 2], &5000u16.to_le_bytes());
        assert_eq!(raw[TIER_OFFSET], 3);
        assert_eq!(
            &raw[LAST_UPDATED_OFFSET..LAST_UPDATED_OFFSET + 8],
            &1_700_000_200i64.to_le_bytes()
        );
        assert_eq!(raw[VERSION_OFFSET], IDENTITY_SCHEMA_VERSION);
    }

    #[test]
    fn test_identity_decode() {
        let record = scored_record();
        let decoded = decode_identity(&encode_identity(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_tampered_composite() {
        let mut raw = encode_identity(&scored_record()).to_vec();
        raw[COMPOSITE_OFFSET..COMPOSITE_OFFSET + 2].copy_from_slice(&9000u16.to_le_bytes());
        assert_eq!(
            decode_identity(&raw).unwrap_err(),
            LayoutError::CompositeMismatch {
                stored: 9000,
                computed: 5000
            }
        );
    }

    #[test]
    fn test_decode_rejects_tampered_tier() {
        let mut raw = encode_identity(&scored_record()).to_vec();
        raw[TIER_OFFSET] = 5;
        assert!(matches!(
            decode_identity(&raw).unwrap_err(),
            LayoutError::TierMismatch { stored: 5, computed: 3 }
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_score() {
        let mut raw = encode_identity(&scored_record()).to_vec();
        raw[SCORES_OFFSET + 6..SCORES_OFFSET + 8].copy_from_slice(&10_001u16.to_le_bytes());
        assert!(matches!(
            decode_identity(&raw).unwrap_err(),
            LayoutError::ScoreOutOfRange { field: "infra", value: 10_001 }
        ));
    }

    #[test]
    fn test_decode_rejects_length_and_version() {
        let raw = encode_identity(&scored_record());
        assert!(matches!(
            decode_identity(&raw[..IDENTITY_LEN - 1]).unwrap_err(),
            LayoutError::Length { expected: IDENTITY_LEN, .. }
        ));

        let mut bumped = raw.to_vec();
        bumped[VERSION_OFFSET] = 2;
        assert_eq!(decode_identity(&bumped).unwrap_err(), LayoutError::Version(2));
    }

    #[test]
    fn test_detail_layouts() {
        let store = IdentityStore::new(Arc::new(FixedClock::new(42)));
        let identity = store.create(principal(1)).unwrap();
        let ledger = DetailLedger::new();

        let trading = ledger
            .upsert_detail(
                &store,
                &principal(1),
                &identity,
                DetailMetrics::Trading(TradingMetrics {
                    win_rate_bps: 6000,
                    profit_factor_bps: 15_000,
                    total_trades: 12,
                    total_volume: 3_000_000,
                    max_drawdown_bps: 900,
                }),
            )
            .unwrap();
        let raw = encode_detail(&trading);
        assert_eq!(raw.len(), TRADING_DETAIL_LEN);
        assert_eq!(&raw[..32], identity.as_bytes());
        assert_eq!(&raw[32..34], &6000u16.to_le_bytes());
        assert_eq!(decode_detail(Dimension::Trading, &raw).unwrap(), trading);

        let civic = ledger
            .upsert_detail(
                &store,
                &principal(1),
                &identity,
                DetailMetrics::Civic(CivicMetrics {
                    problems_solved: 4,
                    prediction_accuracy_bps: 7100,
                    directions_proposed: 9,
                    directions_won: 5,
                    current_streak: 3,
                    community_trust: 8800,
                }),
            )
            .unwrap();
        let raw = encode_detail(&civic);
        assert_eq!(raw.len(), CIVIC_DETAIL_LEN);
        assert_eq!(raw[CIVIC_DETAIL_LEN - 1], DETAIL_SCHEMA_VERSION);
        assert_eq!(decode_detail(Dimension::Civic, &raw).unwrap(), civic);

        // a trading layout is not a civic layout
        assert!(decode_detail(Dimension::Civic, &encode_detail(&trading)).is_err());
        assert_eq!(
            decode_detail(Dimension::Infra, &raw).unwrap_err(),
            LayoutError::NoDetailLayout(Dimension::Infra)
        );
    }
}
