use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use ledgerline_types::{EngineResult, Hash256, Ledger, Transaction, TransactionWithMetaData};

/// A named command with a statically-known result shape.
///
/// The client's correlation registry captures `Result` in the waiter it
/// stores, so the read side can decode an inbound payload into the shape the
/// issuing caller expects before signaling it.
pub trait Command: Serialize + Send {
    /// Wire name, e.g. `"ledger"`.
    const NAME: &'static str;
    /// Shape of the `result` object on a successful response.
    type Result: DeserializeOwned + Send + 'static;
}

/// A ledger to fetch: a concrete sequence number or a moving keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerSpecifier {
    Sequence(u32),
    /// Most recent ledger validated by consensus.
    Validated,
    /// Most recent closed ledger.
    Closed,
    /// The in-progress ledger.
    Current,
}

impl Serialize for LedgerSpecifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Sequence(seq) => serializer.serialize_u32(*seq),
            Self::Validated => serializer.serialize_str("validated"),
            Self::Closed => serializer.serialize_str("closed"),
            Self::Current => serializer.serialize_str("current"),
        }
    }
}

impl From<u32> for LedgerSpecifier {
    fn from(seq: u32) -> Self {
        Self::Sequence(seq)
    }
}

/// `ledger` — fetch a ledger header and optionally its contents.
#[derive(Clone, Debug, Serialize)]
pub struct LedgerParams {
    pub ledger_index: LedgerSpecifier,
    pub accounts: bool,
    pub transactions: bool,
    pub expand: bool,
}

impl LedgerParams {
    /// Request a ledger by index, with transactions expanded in place.
    pub fn new(ledger_index: impl Into<LedgerSpecifier>, transactions: bool) -> Self {
        Self {
            ledger_index: ledger_index.into(),
            accounts: false,
            transactions,
            expand: true,
        }
    }
}

impl Command for LedgerParams {
    const NAME: &'static str = "ledger";
    type Result = LedgerResult;
}

#[derive(Clone, Debug, Deserialize)]
pub struct LedgerResult {
    pub ledger: Ledger,
}

/// `tx` — fetch a transaction by hash.
#[derive(Clone, Debug, Serialize)]
pub struct TxParams {
    pub transaction: Hash256,
}

impl TxParams {
    pub fn new(transaction: Hash256) -> Self {
        Self { transaction }
    }
}

impl Command for TxParams {
    const NAME: &'static str = "tx";
    type Result = TxResult;
}

/// Result of a `tx` fetch: the transaction with its metadata, plus the
/// `validated` flag.
///
/// `validated` is a sibling of the polymorphic transaction fields, not a
/// descendant, so it is extracted from the raw payload before the rest is
/// handed to the transaction decode path. A missing or mistyped flag is a
/// decode error, never a default to `false`.
#[derive(Clone, Debug, PartialEq)]
pub struct TxResult {
    pub transaction: TransactionWithMetaData,
    pub validated: bool,
}

impl<'de> Deserialize<'de> for TxResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        let validated = value
            .get("validated")
            .ok_or_else(|| D::Error::custom("missing required field: validated"))?
            .as_bool()
            .ok_or_else(|| D::Error::custom("field validated is not a boolean"))?;
        let transaction =
            TransactionWithMetaData::from_value(value).map_err(D::Error::custom)?;
        Ok(Self {
            transaction,
            validated,
        })
    }
}

/// `submit` — submit a signed transaction blob.
#[derive(Clone, Debug, Serialize)]
pub struct SubmitParams {
    pub tx_blob: String,
}

impl SubmitParams {
    pub fn new(tx_blob: impl Into<String>) -> Self {
        Self {
            tx_blob: tx_blob.into(),
        }
    }
}

impl Command for SubmitParams {
    const NAME: &'static str = "submit";
    type Result = SubmitResult;
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubmitResult {
    pub engine_result: EngineResult,
    pub engine_result_code: i32,
    pub engine_result_message: String,
    /// The submitted blob, echoed back.
    pub tx_blob: String,
    /// The decoded form of the submitted transaction.
    #[serde(rename = "tx_json")]
    pub tx: Transaction,
}

/// Streams a caller can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Ledger,
    Server,
}

/// `subscribe` — register for unsolicited stream notifications.
#[derive(Clone, Debug, Serialize)]
pub struct SubscribeParams {
    pub streams: Vec<StreamKind>,
}

impl SubscribeParams {
    pub fn new(streams: Vec<StreamKind>) -> Self {
        Self { streams }
    }
}

impl Command for SubscribeParams {
    const NAME: &'static str = "subscribe";
    type Result = SubscribeResult;
}

/// Acknowledgment of a subscription: a snapshot of the current state for
/// each requested stream. Fields are present only for subscribed streams.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubscribeResult {
    #[serde(default)]
    pub ledger_index: Option<u32>,
    #[serde(default)]
    pub ledger_hash: Option<Hash256>,
    #[serde(default)]
    pub server_status: Option<String>,
    #[serde(default)]
    pub load_base: Option<u32>,
    #[serde(default)]
    pub load_factor: Option<u32>,
}
