use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::TypeError;
use crate::hash::{Hash128, Hash256};

/// The closed set of transaction kinds, keyed by numeric type code.
///
/// The set is versioned with the protocol: a code outside it means the
/// service has introduced a kind this library does not model yet, which is
/// surfaced as an error rather than coerced into a fallback shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Payment,
    AccountSet,
    SetRegularKey,
    OfferCreate,
    OfferCancel,
    TrustSet,
    Amendment,
    SetFee,
}

impl TransactionType {
    /// Numeric type code as carried in the binary ledger encoding.
    pub fn code(&self) -> u16 {
        match self {
            Self::Payment => 0,
            Self::AccountSet => 3,
            Self::SetRegularKey => 5,
            Self::OfferCreate => 7,
            Self::OfferCancel => 8,
            Self::TrustSet => 20,
            Self::Amendment => 100,
            Self::SetFee => 101,
        }
    }

    /// Canonical name as carried in the JSON encoding.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Payment => "Payment",
            Self::AccountSet => "AccountSet",
            Self::SetRegularKey => "SetRegularKey",
            Self::OfferCreate => "OfferCreate",
            Self::OfferCancel => "OfferCancel",
            Self::TrustSet => "TrustSet",
            Self::Amendment => "Amendment",
            Self::SetFee => "SetFee",
        }
    }

    pub fn from_code(code: u16) -> Result<Self, TypeError> {
        match code {
            0 => Ok(Self::Payment),
            3 => Ok(Self::AccountSet),
            5 => Ok(Self::SetRegularKey),
            7 => Ok(Self::OfferCreate),
            8 => Ok(Self::OfferCancel),
            20 => Ok(Self::TrustSet),
            100 => Ok(Self::Amendment),
            101 => Ok(Self::SetFee),
            other => Err(TypeError::UnknownTransactionCode(other)),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, TypeError> {
        match name {
            "Payment" => Ok(Self::Payment),
            "AccountSet" => Ok(Self::AccountSet),
            "SetRegularKey" => Ok(Self::SetRegularKey),
            "OfferCreate" => Ok(Self::OfferCreate),
            "OfferCancel" => Ok(Self::OfferCancel),
            "TrustSet" => Ok(Self::TrustSet),
            "Amendment" => Ok(Self::Amendment),
            "SetFee" => Ok(Self::SetFee),
            other => Err(TypeError::UnknownTransactionName(other.to_owned())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields shared by every transaction kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TxBase {
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<u32>,
    pub account: AccountId,
    pub sequence: u32,
    pub fee: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memos: Option<Value>,
    #[serde(rename = "PreviousTxnID", skip_serializing_if = "Option::is_none")]
    pub previous_txn_id: Option<Hash256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<u32>,
}

/// Transfer of value from one account to another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    #[serde(flatten)]
    pub base: TxBase,
    pub destination: AccountId,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_max: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<u32>,
    #[serde(rename = "InvoiceID", skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<Hash256>,
}

/// Change to an account's settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSet {
    #[serde(flatten)]
    pub base: TxBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_hash: Option<Hash128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_locator: Option<Hash256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_flag: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_flag: Option<u32>,
}

/// Assignment or removal of an account's regular signing key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetRegularKey {
    #[serde(flatten)]
    pub base: TxBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_key: Option<AccountId>,
}

/// Creation of an offer on the decentralized exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCreate {
    #[serde(flatten)]
    pub base: TxBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_sequence: Option<u32>,
    pub taker_pays: Amount,
    pub taker_gets: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,
}

impl OfferCreate {
    /// Price of the offer: taker-pays over taker-gets.
    ///
    /// Returns a defined zero value when the quotient is undefined (zero or
    /// unparseable taker-gets) rather than an error, so callers formatting
    /// offers always have a number to show.
    pub fn ratio(&self) -> f64 {
        match (self.taker_pays.decimal(), self.taker_gets.decimal()) {
            (Some(pays), Some(gets)) if gets != 0.0 => pays / gets,
            _ => 0.0,
        }
    }
}

/// Cancellation of a previously created offer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCancel {
    #[serde(flatten)]
    pub base: TxBase,
    pub offer_sequence: u32,
}

/// Creation or modification of a trust line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustSet {
    #[serde(flatten)]
    pub base: TxBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_in: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_out: Option<u32>,
}

/// Pseudo-transaction adjusting the network fee schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetFee {
    #[serde(flatten)]
    pub base: TxBase,
    pub base_fee: u64,
    pub reference_fee_units: u32,
    pub reserve_base: u32,
    pub reserve_increment: u32,
}

/// Pseudo-transaction enabling a protocol amendment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Amendment {
    #[serde(flatten)]
    pub base: TxBase,
    pub amendment: Hash256,
}

/// One concrete transaction, selected irrevocably at decode time by the
/// `TransactionType` discriminator.
#[derive(Clone, Debug, PartialEq)]
pub enum Transaction {
    Payment(Payment),
    AccountSet(AccountSet),
    SetRegularKey(SetRegularKey),
    OfferCreate(OfferCreate),
    OfferCancel(OfferCancel),
    TrustSet(TrustSet),
    SetFee(SetFee),
    Amendment(Amendment),
}

impl Transaction {
    /// Decode from a raw payload carrying a `TransactionType` discriminator.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        let name = value
            .get("TransactionType")
            .ok_or(TypeError::MissingField("TransactionType"))?
            .as_str()
            .ok_or(TypeError::MistypedField {
                field: "TransactionType",
                expected: "string",
            })?;
        let kind = TransactionType::from_name(name)?;
        let decode = |e: serde_json::Error| TypeError::Decode(e.to_string());
        Ok(match kind {
            TransactionType::Payment => Self::Payment(serde_json::from_value(value).map_err(decode)?),
            TransactionType::AccountSet => {
                Self::AccountSet(serde_json::from_value(value).map_err(decode)?)
            }
            TransactionType::SetRegularKey => {
                Self::SetRegularKey(serde_json::from_value(value).map_err(decode)?)
            }
            TransactionType::OfferCreate => {
                Self::OfferCreate(serde_json::from_value(value).map_err(decode)?)
            }
            TransactionType::OfferCancel => {
                Self::OfferCancel(serde_json::from_value(value).map_err(decode)?)
            }
            TransactionType::TrustSet => {
                Self::TrustSet(serde_json::from_value(value).map_err(decode)?)
            }
            TransactionType::SetFee => Self::SetFee(serde_json::from_value(value).map_err(decode)?),
            TransactionType::Amendment => {
                Self::Amendment(serde_json::from_value(value).map_err(decode)?)
            }
        })
    }

    /// The fields shared by every kind.
    pub fn base(&self) -> &TxBase {
        match self {
            Self::Payment(tx) => &tx.base,
            Self::AccountSet(tx) => &tx.base,
            Self::SetRegularKey(tx) => &tx.base,
            Self::OfferCreate(tx) => &tx.base,
            Self::OfferCancel(tx) => &tx.base,
            Self::TrustSet(tx) => &tx.base,
            Self::SetFee(tx) => &tx.base,
            Self::Amendment(tx) => &tx.base,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.base().transaction_type
    }

    /// Human-readable kind name.
    pub fn type_name(&self) -> &'static str {
        self.transaction_type().name()
    }
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Payment(tx) => tx.serialize(serializer),
            Self::AccountSet(tx) => tx.serialize(serializer),
            Self::SetRegularKey(tx) => tx.serialize(serializer),
            Self::OfferCreate(tx) => tx.serialize(serializer),
            Self::OfferCancel(tx) => tx.serialize(serializer),
            Self::TrustSet(tx) => tx.serialize(serializer),
            Self::SetFee(tx) => tx.serialize(serializer),
            Self::Amendment(tx) => tx.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}
