use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Drops per unit of the native currency.
pub const DROPS_PER_UNIT: u64 = 1_000_000;

/// A currency amount as it appears on the wire.
///
/// The native currency is encoded as a bare string holding an integer number
/// of drops; issued assets are an object carrying the currency code, the
/// issuing account, and a decimal value string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Native currency, denominated in drops.
    Drops(String),
    /// Issued asset held against an issuer.
    Issued {
        currency: String,
        issuer: AccountId,
        value: String,
    },
}

impl Amount {
    /// Native amount from a drop count.
    pub fn from_drops(drops: u64) -> Self {
        Self::Drops(drops.to_string())
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Drops(_))
    }

    /// Drop count for native amounts; `None` for issued assets or when the
    /// string is not a valid integer.
    pub fn drops(&self) -> Option<u64> {
        match self {
            Self::Drops(s) => s.parse().ok(),
            Self::Issued { .. } => None,
        }
    }

    /// Decimal magnitude of the amount: whole native units for drops,
    /// the value string for issued assets. `None` when unparseable.
    pub fn decimal(&self) -> Option<f64> {
        match self {
            Self::Drops(s) => s.parse::<u64>().ok().map(|d| d as f64 / DROPS_PER_UNIT as f64),
            Self::Issued { value, .. } => value.parse().ok(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drops(s) => write!(f, "{s} drops"),
            Self::Issued {
                currency,
                issuer,
                value,
            } => write!(f, "{value} {currency}/{issuer}"),
        }
    }
}
