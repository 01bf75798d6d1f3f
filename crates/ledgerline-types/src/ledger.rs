use serde::{Deserialize, Serialize};

use crate::hash::Hash256;
use crate::meta::TransactionWithMetaData;
use crate::temporal::LedgerTime;

/// Header of a closed ledger plus its transactions, as returned by a ledger
/// fetch with expansion enabled.
///
/// The service string-encodes `ledger_index` and `total_coins`; both are
/// parsed to real integers at decode time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "ledger_index", with = "string_encoded")]
    pub ledger_sequence: u32,
    pub accepted: bool,
    pub close_time: LedgerTime,
    pub closed: bool,
    pub ledger_hash: Hash256,
    #[serde(rename = "parent_hash")]
    pub previous_ledger: Hash256,
    #[serde(with = "string_encoded")]
    pub total_coins: u64,
    pub account_hash: Hash256,
    pub transaction_hash: Hash256,
    /// Transactions in ledger order; empty when the fetch did not request them.
    #[serde(default)]
    pub transactions: Vec<TransactionWithMetaData>,
}

/// Integers the wire carries as decimal strings.
mod string_encoded {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
