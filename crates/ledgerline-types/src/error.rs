use thiserror::Error;

/// Errors produced by type decoding and conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown transaction type code: {0}")]
    UnknownTransactionCode(u16),

    #[error("unknown transaction type: {0}")]
    UnknownTransactionName(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} is not a {expected}")]
    MistypedField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("decode error: {0}")]
    Decode(String),
}
