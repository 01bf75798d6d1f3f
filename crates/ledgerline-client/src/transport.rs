use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Recv(String),

    #[error("connection closed")]
    Closed,
}

/// Write half of the connection.
///
/// Implementations must deliver each frame whole; the client serializes its
/// own `send` calls, so implementations only need to keep a single frame
/// intact.
#[async_trait]
pub trait FrameSink: Send + Sync {
    async fn send(&self, frame: String) -> Result<(), TransportError>;
}

/// Read half of the connection: the sequence of inbound text frames, in the
/// order the transport delivers them, terminated by `None` when the
/// connection closes.
#[async_trait]
pub trait FrameSource: Send {
    async fn next(&mut self) -> Option<Result<String, TransportError>>;
}

/// In-memory write half backed by a bounded channel. Used by tests and
/// simulations in place of a real connection.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send(&self, frame: String) -> Result<(), TransportError> {
        self.tx.send(frame).await.map_err(|_| TransportError::Closed)
    }
}

/// In-memory read half backed by a bounded channel. The source ends when
/// every paired sender has been dropped.
pub struct ChannelSource {
    rx: mpsc::Receiver<String>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl FrameSource for ChannelSource {
    async fn next(&mut self) -> Option<Result<String, TransportError>> {
        self.rx.recv().await.map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_pass_through_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let sink = ChannelSink::new(tx);
        let mut source = ChannelSource::new(rx);

        sink.send("one".into()).await.unwrap();
        sink.send("two".into()).await.unwrap();

        assert_eq!(source.next().await.unwrap().unwrap(), "one");
        assert_eq!(source.next().await.unwrap().unwrap(), "two");
    }

    #[tokio::test]
    async fn source_ends_when_sender_dropped() {
        let (tx, rx) = mpsc::channel::<String>(1);
        let mut source = ChannelSource::new(rx);
        drop(tx);
        assert!(source.next().await.is_none());
    }

    #[tokio::test]
    async fn send_after_close_errors() {
        let (tx, rx) = mpsc::channel(1);
        let sink = ChannelSink::new(tx);
        drop(rx);
        let err = sink.send("frame".into()).await.unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }
}
