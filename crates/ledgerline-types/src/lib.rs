//! Foundation types for Ledgerline.
//!
//! This crate provides the value types and the polymorphic transaction model
//! shared by the protocol and client crates. Everything here decodes from the
//! JSON the ledger service puts on the wire.
//!
//! # Key Types
//!
//! - [`Hash256`] / [`Hash128`] — Fixed-width hashes, hex-encoded on the wire
//! - [`AccountId`] — Opaque ledger account address
//! - [`Amount`] — Native drops or an issued-asset triple
//! - [`LedgerTime`] — Seconds since the ledger epoch (2000-01-01 UTC)
//! - [`Transaction`] — Closed, discriminator-selected set of transaction kinds
//! - [`TransactionWithMetaData`] — A decoded transaction plus execution metadata
//! - [`Ledger`] — A closed ledger header with its transactions

pub mod account;
pub mod amount;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod meta;
pub mod temporal;
pub mod transaction;

pub use account::AccountId;
pub use amount::Amount;
pub use error::TypeError;
pub use hash::{Hash128, Hash256};
pub use ledger::Ledger;
pub use meta::{EngineResult, TransactionMeta, TransactionWithMetaData};
pub use temporal::LedgerTime;
pub use transaction::{
    AccountSet, Amendment, OfferCancel, OfferCreate, Payment, SetFee, SetRegularKey, Transaction,
    TransactionType, TrustSet, TxBase,
};
