use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced to a caller issuing a command.
///
/// Every variant is local to one command's result channel; no command's
/// failure affects any other outstanding command or the read loop.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("connection closed before a response arrived")]
    ConnectionClosed,

    /// The service answered with `status != success`.
    #[error("server error {error} (code {error_code}): {error_message}")]
    Server {
        status: String,
        error: String,
        error_code: i32,
        error_message: String,
    },

    /// The response arrived but its payload did not decode into the shape
    /// the command expects.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("timed out waiting for response to command {id}")]
    Timeout { id: u64 },

    /// An id was registered twice. Ids must come from the generator, so this
    /// is a programmer error, not a wire condition.
    #[error("command id {0} already registered")]
    DuplicateCommandId(u64),
}

pub type ClientResult<T> = Result<T, ClientError>;
