//! Error types for sovereign

use thiserror::Error;

use crate::types::{Address, Dimension, Principal};

/// Failures of identity, authority, score, and detail operations.
///
/// Every variant is terminal: the target record is left exactly as it was
/// and nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SovereignError {
    #[error("Identity already exists for owner {owner} at {address}")]
    AlreadyExists { owner: Principal, address: Address },

    #[error("Identity not found at {0}")]
    NotFound(Address),

    #[error("Owner mismatch: {caller} is not the identity owner")]
    OwnerMismatch { caller: Principal },

    #[error("Unauthorized: {caller} is not the {dimension} authority")]
    Unauthorized { caller: Principal, dimension: Dimension },

    #[error("Invalid score {0}: must be between 0 and 10000")]
    InvalidScore(u32),

    #[error("Invalid authority: cannot set the zero principal as {0} authority")]
    InvalidAuthority(Dimension),

    #[error("Invalid metric {field} = {value}: {reason}")]
    InvalidMetric {
        field: &'static str,
        value: u64,
        reason: &'static str,
    },

    #[error("{dimension} details not initialized for identity {identity}")]
    DetailsNotInitialized { identity: Address, dimension: Dimension },
}

pub type Result<T> = std::result::Result<T, SovereignError>;

/// Failures parsing textual identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("Invalid hex: {0}")]
    Hex(String),

    #[error("Expected 32 bytes, got {0}")]
    Length(usize),

    #[error("Unknown dimension: {0}")]
    Dimension(String),
}

/// Failures decoding a raw record layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Unsupported schema version {0}")]
    Version(u8),

    #[error("Score out of range: {field} = {value}")]
    ScoreOutOfRange { field: &'static str, value: u16 },

    #[error("Composite mismatch: stored {stored}, computed {computed}")]
    CompositeMismatch { stored: u16, computed: u16 },

    #[error("Tier mismatch: stored {stored}, computed {computed}")]
    TierMismatch { stored: u8, computed: u8 },

    #[error("Detail layout has no {0} metrics")]
    NoDetailLayout(Dimension),

    #[error("Invalid metrics: {0}")]
    Metrics(#[from] SovereignError),
}

/// Failures loading or saving configuration and snapshots.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Invalid hex in snapshot: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Corrupt record: {0}")]
    Layout(#[from] LayoutError),

    #[error("Unsupported snapshot version {0}")]
    SnapshotVersion(u32),

    #[error("Duplicate record at {0} in snapshot")]
    Duplicate(Address),
}
