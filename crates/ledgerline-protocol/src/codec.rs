use serde_json::Value;

use crate::command::Command;
use crate::envelope::Request;
use crate::error::{ProtocolError, ProtocolResult};
use crate::notification::{Notification, NotificationKind};
use crate::ResponseHead;

/// An inbound frame after classification.
#[derive(Debug)]
pub enum Inbound {
    /// Correlated reply to an outstanding command. `body` is the full frame,
    /// so the command-specific `result` can be decoded once the target shape
    /// is known.
    Response {
        id: u64,
        head: ResponseHead,
        body: Value,
    },
    /// Unsolicited stream event.
    Notification(Notification),
}

/// Encode one outbound command frame.
pub fn encode_request<C: Command>(id: u64, params: &C) -> ProtocolResult<String> {
    let request = Request {
        id,
        command: C::NAME,
        params,
    };
    serde_json::to_string(&request).map_err(|e| ProtocolError::Serialization(e.to_string()))
}

/// Parse one inbound frame and classify it.
///
/// A frame carrying a correlation id is a response; a frame carrying a known
/// stream discriminator is a notification; anything else is an error the
/// caller logs and drops.
pub fn classify_frame(text: &str) -> ProtocolResult<Inbound> {
    let body: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Envelope(e.to_string()))?;
    let head: ResponseHead = serde_json::from_value(body.clone())
        .map_err(|e| ProtocolError::Envelope(e.to_string()))?;

    if let Some(id) = head.id {
        return Ok(Inbound::Response { id, head, body });
    }

    let kind = head.kind.as_deref().ok_or(ProtocolError::MissingMessageType)?;
    match NotificationKind::from_wire_name(kind) {
        Some(NotificationKind::LedgerClosed) => {
            let msg = serde_json::from_value(body)
                .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
            Ok(Inbound::Notification(Notification::LedgerClosed(msg)))
        }
        Some(NotificationKind::ServerStatus) => {
            let msg = serde_json::from_value(body)
                .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
            Ok(Inbound::Notification(Notification::ServerStatus(msg)))
        }
        None => Err(ProtocolError::UnknownMessageType(kind.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::LedgerParams;

    #[test]
    fn request_encodes_shared_and_specific_fields() {
        let frame = encode_request(3, &LedgerParams::new(6_000_000u32, true)).unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["command"], "ledger");
        assert_eq!(value["ledger_index"], 6_000_000);
        assert_eq!(value["expand"], true);
    }

    #[test]
    fn frame_with_id_classifies_as_response() {
        let frame = r#"{"id": 5, "type": "response", "status": "success", "result": {}}"#;
        let Inbound::Response { id, head, body } = classify_frame(frame).unwrap() else {
            panic!("expected a response");
        };
        assert_eq!(id, 5);
        assert!(head.is_success());
        assert!(body.get("result").is_some());
    }

    #[test]
    fn error_response_keeps_error_fields() {
        let frame = r#"{"id": 8, "type": "response", "status": "error",
            "error": "lgrNotFound", "error_code": 17, "error_message": "Ledger not found"}"#;
        let Inbound::Response { head, .. } = classify_frame(frame).unwrap() else {
            panic!("expected a response");
        };
        assert!(!head.is_success());
        assert_eq!(head.error_code, Some(17));
    }

    #[test]
    fn ledger_closed_classifies_as_notification() {
        let frame = format!(
            r#"{{"type": "ledgerClosed", "ledger_index": 10, "ledger_hash": "{}",
                "ledger_time": 450000000, "txn_count": 3}}"#,
            "AB".repeat(32)
        );
        let Inbound::Notification(Notification::LedgerClosed(msg)) =
            classify_frame(&frame).unwrap()
        else {
            panic!("expected ledgerClosed");
        };
        assert_eq!(msg.ledger_index, 10);
    }

    #[test]
    fn server_status_classifies_as_notification() {
        let frame = r#"{"type": "serverStatus", "server_status": "full",
            "load_base": 256, "load_factor": 512}"#;
        let Inbound::Notification(Notification::ServerStatus(msg)) =
            classify_frame(frame).unwrap()
        else {
            panic!("expected serverStatus");
        };
        assert_eq!(msg.load_factor, 512);
    }

    #[test]
    fn malformed_frame_is_an_envelope_error() {
        let err = classify_frame("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Envelope(_)));
    }

    #[test]
    fn unknown_stream_kind_is_an_error() {
        let err = classify_frame(r#"{"type": "transaction"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessageType(k) if k == "transaction"));
    }

    #[test]
    fn missing_discriminator_is_an_error() {
        let err = classify_frame(r#"{"status": "success"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingMessageType));
    }
}
