use serde::{Deserialize, Serialize};

use ledgerline_types::{Hash256, LedgerTime};

/// Discriminators for the unsolicited stream messages the service pushes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    LedgerClosed,
    ServerStatus,
}

impl NotificationKind {
    /// The `type` value carried on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::LedgerClosed => "ledgerClosed",
            Self::ServerStatus => "serverStatus",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "ledgerClosed" => Some(Self::LedgerClosed),
            "serverStatus" => Some(Self::ServerStatus),
            _ => None,
        }
    }
}

/// A ledger closed on the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerClosed {
    pub ledger_index: u32,
    pub ledger_hash: Hash256,
    pub ledger_time: LedgerTime,
    pub txn_count: u32,
    #[serde(default)]
    pub fee_base: u32,
    #[serde(default)]
    pub fee_ref: u32,
    #[serde(default)]
    pub reserve_base: u32,
    #[serde(default)]
    pub reserve_inc: u32,
}

/// Server load and status changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub server_status: String,
    pub load_base: u32,
    pub load_factor: u32,
}

/// An unsolicited inbound message, never correlated by id.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    LedgerClosed(LedgerClosed),
    ServerStatus(ServerStatus),
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::LedgerClosed(_) => NotificationKind::LedgerClosed,
            Self::ServerStatus(_) => NotificationKind::ServerStatus,
        }
    }
}
