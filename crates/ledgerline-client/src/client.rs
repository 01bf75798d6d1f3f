use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use ledgerline_protocol::{
    encode_request, Command, LedgerParams, LedgerSpecifier, ResponseHead, StreamKind,
    SubmitParams, SubmitResult, SubscribeParams, SubscribeResult, TxParams, TxResult,
};
use ledgerline_types::{Hash256, Ledger};

use crate::dispatcher::Dispatcher;
use crate::error::{ClientError, ClientResult};
use crate::ids::CommandIdGenerator;
use crate::registry::{CorrelationRegistry, Waiter};
use crate::router::{NotificationFilter, NotificationRouter, NotificationStream};
use crate::transport::{FrameSink, FrameSource};

/// The caller-facing command facade.
///
/// `issue` stamps a fresh id, registers a waiter, sends the envelope, and
/// suspends the caller until the dispatcher delivers its response — and only
/// its response. Any number of callers may issue concurrently; writes to the
/// transport are serialized through an internal mutex.
pub struct LedgerClient {
    ids: CommandIdGenerator,
    registry: Arc<CorrelationRegistry>,
    router: Arc<NotificationRouter>,
    sink: Mutex<Box<dyn FrameSink>>,
}

impl LedgerClient {
    /// Build a client writing to the given sink. Pair with
    /// [`LedgerClient::spawn_dispatcher`] for the read side.
    pub fn new<S: FrameSink + 'static>(sink: S) -> Self {
        Self {
            ids: CommandIdGenerator::new(),
            registry: Arc::new(CorrelationRegistry::new()),
            router: Arc::new(NotificationRouter::default()),
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Spawn the read-side task over the given source.
    ///
    /// The task runs until the source ends; outstanding callers are then
    /// woken with [`ClientError::ConnectionClosed`].
    pub fn spawn_dispatcher<R: FrameSource + 'static>(&self, source: R) -> JoinHandle<()> {
        let dispatcher = Dispatcher::new(Arc::clone(&self.registry), Arc::clone(&self.router));
        tokio::spawn(dispatcher.run(source))
    }

    /// Issue a command and wait for its response.
    ///
    /// Returns the decoded result on `status == success`, a
    /// [`ClientError::Server`] carrying the error triple otherwise. A send
    /// failure cancels the registration and returns immediately. No implicit
    /// retry.
    pub async fn issue<C: Command>(&self, params: C) -> ClientResult<C::Result> {
        let (_id, rx) = self.issue_inner(params).await?;
        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ClientError::ConnectionClosed),
        }
    }

    /// Like [`LedgerClient::issue`], but abandon the wait after `timeout`.
    ///
    /// On timeout the registration is cancelled, so a late response becomes
    /// a harmless drop rather than a delivery-after-abandonment race.
    pub async fn issue_with_timeout<C: Command>(
        &self,
        params: C,
        timeout: Duration,
    ) -> ClientResult<C::Result> {
        let (id, rx) = self.issue_inner(params).await?;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(ClientError::ConnectionClosed),
            Err(_) => {
                self.registry.cancel(id);
                Err(ClientError::Timeout { id })
            }
        }
    }

    /// Register, encode, and send; the caller awaits the returned channel.
    async fn issue_inner<C: Command>(
        &self,
        params: C,
    ) -> ClientResult<(u64, oneshot::Receiver<ClientResult<C::Result>>)> {
        let id = self.ids.next();
        let (tx, rx) = oneshot::channel();
        let waiter: Waiter = Box::new(move |head, body| {
            let _ = tx.send(decode_response::<C::Result>(head, body));
        });
        self.registry.register(id, waiter)?;

        let frame = match encode_request(id, &params) {
            Ok(frame) => frame,
            Err(err) => {
                self.registry.cancel(id);
                return Err(ClientError::Decode(err.to_string()));
            }
        };

        {
            let sink = self.sink.lock().await;
            if let Err(err) = sink.send(frame).await {
                self.registry.cancel(id);
                return Err(err.into());
            }
        }
        debug!(id, command = C::NAME, "command issued");
        Ok((id, rx))
    }

    /// Fetch a ledger by index or keyword, with transactions expanded.
    pub async fn ledger(
        &self,
        index: impl Into<LedgerSpecifier>,
        transactions: bool,
    ) -> ClientResult<Ledger> {
        let result = self.issue(LedgerParams::new(index, transactions)).await?;
        Ok(result.ledger)
    }

    /// Fetch a transaction by hash.
    pub async fn tx(&self, hash: Hash256) -> ClientResult<TxResult> {
        self.issue(TxParams::new(hash)).await
    }

    /// Submit a signed transaction blob.
    pub async fn submit(&self, tx_blob: impl Into<String>) -> ClientResult<SubmitResult> {
        self.issue(SubmitParams::new(tx_blob)).await
    }

    /// Subscribe to server-side streams; events arrive as notifications.
    pub async fn subscribe(&self, streams: Vec<StreamKind>) -> ClientResult<SubscribeResult> {
        self.issue(SubscribeParams::new(streams)).await
    }

    /// Receive unsolicited notifications matching the filter.
    pub fn notifications(&self, filter: NotificationFilter) -> NotificationStream {
        self.router.subscribe(filter)
    }

    /// Number of commands awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }
}

/// Turn a delivered response into the caller's typed outcome.
///
/// Runs on the delivery path inside the waiter, so a decode failure reaches
/// only the one caller that issued the command.
fn decode_response<R: serde::de::DeserializeOwned>(
    head: ResponseHead,
    body: Value,
) -> ClientResult<R> {
    if !head.is_success() {
        return Err(ClientError::Server {
            status: head.status.unwrap_or_default(),
            error: head.error.unwrap_or_default(),
            error_code: head.error_code.unwrap_or_default(),
            error_message: head.error_message.unwrap_or_default(),
        });
    }
    let result = body
        .get("result")
        .cloned()
        .ok_or_else(|| ClientError::Decode("success response missing result object".into()))?;
    serde_json::from_value(result).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::transport::ChannelSink;

    #[tokio::test]
    async fn send_failure_cancels_the_registration() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx); // Transport is already gone.
        let client = LedgerClient::new(ChannelSink::new(tx));

        let err = client.ledger(1u32, false).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(client.in_flight(), 0);
    }

    #[tokio::test]
    async fn issued_commands_carry_fresh_increasing_ids() {
        let (tx, mut out) = mpsc::channel(4);
        let client = LedgerClient::new(ChannelSink::new(tx));

        // No dispatcher: issue the sends, then inspect what went out.
        let issue1 = client.issue_inner(LedgerParams::new(1u32, false)).await.unwrap();
        let issue2 = client.issue_inner(LedgerParams::new(2u32, false)).await.unwrap();
        assert!(issue1.0 < issue2.0);

        let frame1: Value = serde_json::from_str(&out.recv().await.unwrap()).unwrap();
        let frame2: Value = serde_json::from_str(&out.recv().await.unwrap()).unwrap();
        assert_eq!(frame1["id"], issue1.0);
        assert_eq!(frame2["id"], issue2.0);
        assert_eq!(frame1["command"], "ledger");
        assert_eq!(client.in_flight(), 2);
    }

    #[tokio::test]
    async fn decode_response_maps_error_envelope() {
        let head = ResponseHead {
            id: Some(1),
            kind: Some("response".into()),
            status: Some("error".into()),
            error: Some("lgrNotFound".into()),
            error_code: Some(17),
            error_message: Some("Ledger not found".into()),
        };
        let err = decode_response::<ledgerline_protocol::LedgerResult>(head, Value::Null).unwrap_err();
        let ClientError::Server {
            status,
            error,
            error_code,
            error_message,
        } = err
        else {
            panic!("expected a server error");
        };
        assert_eq!(status, "error");
        assert_eq!(error, "lgrNotFound");
        assert_eq!(error_code, 17);
        assert_eq!(error_message, "Ledger not found");
    }

    #[tokio::test]
    async fn success_without_result_is_a_decode_error() {
        let head = ResponseHead {
            id: Some(1),
            kind: Some("response".into()),
            status: Some("success".into()),
            ..Default::default()
        };
        let err = decode_response::<ledgerline_protocol::LedgerResult>(head, serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
