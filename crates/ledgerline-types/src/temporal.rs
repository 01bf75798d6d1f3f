use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The ledger epoch (2000-01-01T00:00:00Z) in UNIX seconds.
pub const LEDGER_EPOCH_OFFSET: i64 = 946_684_800;

/// A point in time as the ledger encodes it: whole seconds since the ledger
/// epoch of 2000-01-01T00:00:00Z.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerTime(u64);

impl LedgerTime {
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Seconds since the ledger epoch.
    pub fn seconds(&self) -> u64 {
        self.0
    }

    /// Conversion to UTC. `None` if the value is outside chrono's range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let unix = (self.0 as i64).checked_add(LEDGER_EPOCH_OFFSET)?;
        DateTime::from_timestamp(unix, 0)
    }
}

impl fmt::Debug for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerTime({self})")
    }
}

impl fmt::Display for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(utc) => write!(f, "{}", utc.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_year_2000() {
        let time = LedgerTime::new(0);
        assert_eq!(time.to_utc().unwrap().to_rfc3339(), "2000-01-01T00:00:00+00:00");
    }

    #[test]
    fn known_offset_converts() {
        // 86400 seconds past the epoch is 2000-01-02.
        let time = LedgerTime::new(86_400);
        assert_eq!(time.to_utc().unwrap().to_rfc3339(), "2000-01-02T00:00:00+00:00");
    }

    #[test]
    fn ordering_follows_seconds() {
        assert!(LedgerTime::new(1) < LedgerTime::new(2));
    }

    #[test]
    fn serde_is_bare_number() {
        let time = LedgerTime::new(450_000_000);
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "450000000");
        let parsed: LedgerTime = serde_json::from_str(&json).unwrap();
        assert_eq!(time, parsed);
    }
}
