//! Core types shared by every component.
//!
//! Principals and addresses are opaque 32-byte identifiers rendered as
//! lowercase hex. Scores are basis points on a `0..=10000` scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseIdError;

/// Upper bound for every dimension score and for the composite.
pub const MAX_SCORE: u16 = 10_000;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Width of the identifier in bytes.
            pub const LEN: usize = 32;

            /// The all-zero identifier.
            pub const ZERO: Self = Self([0u8; 32]);

            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}…)", stringify!($name), &self.to_hex()[..8])
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = hex::decode(s.trim()).map_err(|e| ParseIdError::Hex(e.to_string()))?;
                let bytes: [u8; 32] = raw
                    .try_into()
                    .map_err(|raw: Vec<u8>| ParseIdError::Length(raw.len()))?;
                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_id! {
    /// An external actor: an identity owner, a dimension authority, or a caller.
    ///
    /// Callers are assumed to be authenticated before they reach this crate.
    Principal
}

hex_id! {
    /// A derived storage location. See [`crate::address`].
    Address
}

/// One of the four independently scored reputation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Trading,
    Civic,
    Developer,
    Infra,
}

impl Dimension {
    /// All dimensions in wire order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Trading,
        Dimension::Civic,
        Dimension::Developer,
        Dimension::Infra,
    ];

    /// Weight of this dimension in the composite, in percent.
    pub const fn weight(self) -> u32 {
        match self {
            Self::Trading => 40,
            Self::Civic => 25,
            Self::Developer => 20,
            Self::Infra => 15,
        }
    }

    /// Single-byte tag used when deriving detail addresses.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Trading => 0,
            Self::Civic => 1,
            Self::Developer => 2,
            Self::Infra => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trading => "trading",
            Self::Civic => "civic",
            Self::Developer => "developer",
            Self::Infra => "infra",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trading" => Ok(Self::Trading),
            "civic" => Ok(Self::Civic),
            "developer" => Ok(Self::Developer),
            "infra" | "infrastructure" => Ok(Self::Infra),
            other => Err(ParseIdError::Dimension(other.to_string())),
        }
    }
}

/// The four dimension scores of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DimensionScores {
    pub trading: u16,
    pub civic: u16,
    pub developer: u16,
    pub infra: u16,
}

impl DimensionScores {
    pub const fn new(trading: u16, civic: u16, developer: u16, infra: u16) -> Self {
        Self {
            trading,
            civic,
            developer,
            infra,
        }
    }

    pub fn get(&self, dimension: Dimension) -> u16 {
        match dimension {
            Dimension::Trading => self.trading,
            Dimension::Civic => self.civic,
            Dimension::Developer => self.developer,
            Dimension::Infra => self.infra,
        }
    }

    pub(crate) fn set(&mut self, dimension: Dimension, score: u16) {
        match dimension {
            Dimension::Trading => self.trading = score,
            Dimension::Civic => self.civic = score,
            Dimension::Developer => self.developer = score,
            Dimension::Infra => self.infra = score,
        }
    }

    /// True when every score lies in `0..=MAX_SCORE`.
    pub fn in_range(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d) <= MAX_SCORE)
    }
}

/// The principals allowed to write each dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorities {
    pub trading: Principal,
    pub civic: Principal,
    pub developer: Principal,
    pub infra: Principal,
}

impl Authorities {
    /// Every dimension delegated to the same principal.
    pub const fn uniform(principal: Principal) -> Self {
        Self {
            trading: principal,
            civic: principal,
            developer: principal,
            infra: principal,
        }
    }

    pub fn get(&self, dimension: Dimension) -> Principal {
        match dimension {
            Dimension::Trading => self.trading,
            Dimension::Civic => self.civic,
            Dimension::Developer => self.developer,
            Dimension::Infra => self.infra,
        }
    }

    pub(crate) fn set(&mut self, dimension: Dimension, principal: Principal) {
        match dimension {
            Dimension::Trading => self.trading = principal,
            Dimension::Civic => self.civic = principal,
            Dimension::Developer => self.developer = principal,
            Dimension::Infra => self.infra = principal,
        }
    }

    /// Whether `caller` currently holds write access to `dimension`.
    pub fn permits(&self, dimension: Dimension, caller: &Principal) -> bool {
        self.get(dimension) == *caller
    }
}
