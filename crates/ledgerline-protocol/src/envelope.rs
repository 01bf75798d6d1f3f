use serde::{Deserialize, Serialize};

/// `type` value that marks a correlated response.
pub const TYPE_RESPONSE: &str = "response";

/// `status` value on a successful response.
pub const STATUS_SUCCESS: &str = "success";

/// Outbound command envelope: the correlation id and command name shared by
/// every command, with the command-specific fields flattened alongside.
#[derive(Debug, Serialize)]
pub struct Request<P> {
    pub id: u64,
    pub command: &'static str,
    #[serde(flatten)]
    pub params: P,
}

/// Fields present on every inbound message.
///
/// `id` echoes the originating command and is absent on notifications.
/// When `status` is anything but `"success"`, only the error fields are
/// authoritative and the command-specific result is treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseHead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ResponseHead {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct DummyParams {
        ledger_index: u32,
        expand: bool,
    }

    #[test]
    fn request_flattens_params() {
        let request = Request {
            id: 7,
            command: "ledger",
            params: DummyParams {
                ledger_index: 6_000_000,
                expand: true,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"id": 7, "command": "ledger", "ledger_index": 6_000_000, "expand": true})
        );
    }

    #[test]
    fn success_head_parses() {
        let head: ResponseHead =
            serde_json::from_value(json!({"id": 3, "type": "response", "status": "success"}))
                .unwrap();
        assert_eq!(head.id, Some(3));
        assert!(head.is_success());
    }

    #[test]
    fn error_head_parses_all_error_fields() {
        let head: ResponseHead = serde_json::from_value(json!({
            "id": 9,
            "type": "response",
            "status": "error",
            "error": "lgrNotFound",
            "error_code": 17,
            "error_message": "Ledger not found"
        }))
        .unwrap();
        assert!(!head.is_success());
        assert_eq!(head.error.as_deref(), Some("lgrNotFound"));
        assert_eq!(head.error_code, Some(17));
        assert_eq!(head.error_message.as_deref(), Some("Ledger not found"));
    }

    #[test]
    fn notification_head_has_no_id() {
        let head: ResponseHead =
            serde_json::from_value(json!({"type": "ledgerClosed", "ledger_index": 1})).unwrap();
        assert_eq!(head.id, None);
        assert_eq!(head.kind.as_deref(), Some("ledgerClosed"));
        assert!(!head.is_success());
    }
}
