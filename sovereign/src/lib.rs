//! Sovereign: portable multi-dimensional reputation identities
//!
//! Each principal owns one identity record carrying four reputation scores,
//! each written by its own delegated authority, plus a weighted composite and
//! a discrete tier derived from them:
//!
//! - **Trading** (40%): written by e.g. a trading oracle
//! - **Civic** (25%): written by e.g. a governance program
//! - **Developer** (20%): written by e.g. a bounty oracle
//! - **Infra** (15%): written by e.g. an infrastructure network
//!
//! # Key Components
//!
//! - [`address`]: deterministic record addresses any reader can compute
//! - [`IdentityStore`]: create-once identities with strict and defaulted reads
//! - [`registry`]: owner-only delegation of per-dimension authorities
//! - [`pipeline`]: authority-checked atomic score updates
//! - [`composite`]: the integer composite and tier calculation
//! - [`DetailLedger`]: optional per-dimension metric breakdowns
//! - [`layout`]: stable raw byte layouts for direct parsers
//!
//! # Example
//!
//! ```ignore
//! use sovereign::{Sovereign, Principal};
//!
//! let sovereign = Sovereign::new();
//! let identity = sovereign.create_identity(owner)?;
//! sovereign.set_trading_authority(&owner, &owner, oracle)?;
//! sovereign.update_trading_score(&oracle, &identity, 7500)?;
//!
//! assert_eq!(sovereign.get_tier(&owner), 2);
//! ```

pub mod address;
pub mod clock;
pub mod composite;
pub mod config;
pub mod detail;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-export main types
pub use address::{detail_address, identity_address};
pub use clock::{Clock, FixedClock, SystemClock};
pub use composite::{compute, tier_for, tier_name};
pub use config::SovereignConfig;
pub use detail::{CivicMetrics, DetailLedger, DetailMetrics, DetailRecord, TradingMetrics};
pub use error::{LayoutError, ParseIdError, PersistenceError, Result, SovereignError};
pub use record::{IdentityRecord, IdentityView};
pub use service::Sovereign;
pub use snapshot::Snapshot;
pub use store::IdentityStore;
pub use types::*;
