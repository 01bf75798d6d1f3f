//! Client core for Ledgerline.
//!
//! Implements the command/response correlation protocol over a single
//! long-lived, message-oriented connection: unique command ids, the registry
//! of outstanding commands, the read-side dispatcher that demultiplexes
//! inbound frames, notification fan-out, and the caller-facing command
//! facade.
//!
//! One dedicated task drains the transport and owns the delivery path; any
//! number of callers issue commands concurrently. Each caller awaits a
//! private one-shot signal that fires exactly once, after its result has been
//! fully populated.

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod registry;
pub mod router;
pub mod transport;

pub use client::LedgerClient;
pub use dispatcher::Dispatcher;
pub use error::{ClientError, ClientResult};
pub use ids::CommandIdGenerator;
pub use registry::CorrelationRegistry;
pub use router::{NotificationFilter, NotificationRouter, NotificationStream};
pub use transport::{ChannelSink, ChannelSource, FrameSink, FrameSource, TransportError};

// Re-export the protocol surface callers need to issue commands.
pub use ledgerline_protocol::{
    LedgerParams, LedgerSpecifier, Notification, NotificationKind, StreamKind, SubmitParams,
    SubmitResult, SubscribeParams, SubscribeResult, TxParams, TxResult,
};
