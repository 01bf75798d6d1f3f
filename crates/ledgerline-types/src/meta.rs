use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::amount::Amount;
use crate::error::TypeError;
use crate::transaction::Transaction;

/// Engine result code reported for an executed transaction, e.g. `tesSUCCESS`
/// or `tecPATH_DRY`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineResult(String);

impl EngineResult {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `tes` codes are the only fully successful class.
    pub fn is_success(&self) -> bool {
        self.0.starts_with("tes")
    }
}

impl fmt::Display for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution metadata recorded alongside a transaction in a closed ledger.
///
/// The affected-nodes list is kept as an opaque value; its entries decode
/// independently of the correlation protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionMeta {
    pub transaction_index: u32,
    pub transaction_result: EngineResult,
    #[serde(default)]
    pub affected_nodes: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_amount: Option<Amount>,
}

/// A decoded transaction paired with its execution metadata and the sequence
/// of the ledger that contains it. Constructed once during decode, read-only
/// afterward.
///
/// On the wire the transaction fields sit at the top level of the object with
/// the metadata as a sibling key — `meta` in transaction-fetch results,
/// `metaData` inside expanded ledgers. Both spellings are accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionWithMetaData {
    pub transaction: Transaction,
    pub meta: TransactionMeta,
    pub ledger_sequence: u32,
}

impl TransactionWithMetaData {
    /// Decode from a raw payload whose metadata is a sibling of the
    /// transaction fields.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        let Value::Object(mut map) = value else {
            return Err(TypeError::Decode("expected a JSON object".into()));
        };
        let meta_value = map
            .remove("meta")
            .or_else(|| map.remove("metaData"))
            .ok_or(TypeError::MissingField("meta"))?;
        let meta: TransactionMeta = serde_json::from_value(meta_value)
            .map_err(|e| TypeError::Decode(e.to_string()))?;
        let ledger_sequence = match map.remove("ledger_index") {
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(TypeError::MistypedField {
                    field: "ledger_index",
                    expected: "u32",
                })?,
            None => 0,
        };
        let transaction = Transaction::from_value(Value::Object(map))?;
        Ok(Self {
            transaction,
            meta,
            ledger_sequence,
        })
    }

    /// Whether the transaction executed successfully in its ledger.
    pub fn succeeded(&self) -> bool {
        self.meta.transaction_result.is_success()
    }
}

impl Serialize for TransactionWithMetaData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tx = serde_json::to_value(&self.transaction).map_err(serde::ser::Error::custom)?;
        let Value::Object(fields) = tx else {
            return Err(serde::ser::Error::custom("transaction must serialize to an object"));
        };
        let mut out = Map::new();
        out.extend(fields);
        out.insert(
            "meta".into(),
            serde_json::to_value(&self.meta).map_err(serde::ser::Error::custom)?,
        );
        out.insert("ledger_index".into(), self.ledger_sequence.into());
        let mut map = serializer.serialize_map(Some(out.len()))?;
        for (key, value) in &out {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TransactionWithMetaData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(meta_key: &str) -> Value {
        json!({
            "TransactionType": "Payment",
            "Account": "rSource",
            "Sequence": 5,
            "Fee": "10",
            "Destination": "rDestination",
            "Amount": "500000",
            "ledger_index": 6_100_000,
            meta_key: {
                "TransactionIndex": 2,
                "TransactionResult": "tesSUCCESS",
                "AffectedNodes": []
            }
        })
    }

    #[test]
    fn decodes_with_meta_key() {
        let txm = TransactionWithMetaData::from_value(payload("meta")).unwrap();
        assert_eq!(txm.transaction.type_name(), "Payment");
        assert_eq!(txm.ledger_sequence, 6_100_000);
        assert_eq!(txm.meta.transaction_index, 2);
        assert!(txm.succeeded());
    }

    #[test]
    fn decodes_with_meta_data_key() {
        let txm = TransactionWithMetaData::from_value(payload("metaData")).unwrap();
        assert_eq!(txm.transaction.base().sequence, 5);
    }

    #[test]
    fn missing_meta_is_an_error() {
        let mut value = payload("meta");
        value.as_object_mut().unwrap().remove("meta");
        let err = TransactionWithMetaData::from_value(value).unwrap_err();
        assert_eq!(err, TypeError::MissingField("meta"));
    }

    #[test]
    fn missing_ledger_index_defaults_to_zero() {
        let mut value = payload("meta");
        value.as_object_mut().unwrap().remove("ledger_index");
        let txm = TransactionWithMetaData::from_value(value).unwrap();
        assert_eq!(txm.ledger_sequence, 0);
    }

    #[test]
    fn out_of_range_ledger_index_is_rejected() {
        let mut value = payload("meta");
        value["ledger_index"] = json!(u64::from(u32::MAX) + 1);
        let err = TransactionWithMetaData::from_value(value).unwrap_err();
        assert_eq!(
            err,
            TypeError::MistypedField {
                field: "ledger_index",
                expected: "u32"
            }
        );
    }

    #[test]
    fn failed_result_is_not_success() {
        let mut value = payload("meta");
        value["meta"]["TransactionResult"] = json!("tecUNFUNDED_PAYMENT");
        let txm = TransactionWithMetaData::from_value(value).unwrap();
        assert!(!txm.succeeded());
        assert_eq!(txm.meta.transaction_result.as_str(), "tecUNFUNDED_PAYMENT");
    }

    #[test]
    fn serde_roundtrip_preserves_siblings() {
        let txm = TransactionWithMetaData::from_value(payload("meta")).unwrap();
        let value = serde_json::to_value(&txm).unwrap();
        assert_eq!(value["TransactionType"], "Payment");
        assert_eq!(value["ledger_index"], 6_100_000);
        assert_eq!(value["meta"]["TransactionResult"], "tesSUCCESS");
        let back: TransactionWithMetaData = serde_json::from_value(value).unwrap();
        assert_eq!(back, txm);
    }

    #[test]
    fn engine_result_classes() {
        assert!(EngineResult::new("tesSUCCESS").is_success());
        assert!(!EngineResult::new("tecPATH_DRY").is_success());
        assert!(!EngineResult::new("temBAD_FEE").is_success());
    }
}
