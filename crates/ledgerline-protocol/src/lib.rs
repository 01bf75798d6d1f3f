//! Wire protocol for Ledgerline.
//!
//! Defines the shared command envelope, the per-command parameter and result
//! shapes, the unsolicited notification messages, and the classification of
//! inbound frames into correlated responses versus stream events. One JSON
//! object per text frame.

pub mod codec;
pub mod command;
pub mod envelope;
pub mod error;
pub mod notification;

pub use codec::{classify_frame, encode_request, Inbound};
pub use command::{
    Command, LedgerParams, LedgerResult, LedgerSpecifier, StreamKind, SubmitParams, SubmitResult,
    SubscribeParams, SubscribeResult, TxParams, TxResult,
};
pub use envelope::{Request, ResponseHead, STATUS_SUCCESS, TYPE_RESPONSE};
pub use error::{ProtocolError, ProtocolResult};
pub use notification::{LedgerClosed, Notification, NotificationKind, ServerStatus};
