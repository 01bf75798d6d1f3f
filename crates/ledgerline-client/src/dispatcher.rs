use std::sync::Arc;

use tracing::{debug, info, warn};

use ledgerline_protocol::{classify_frame, Inbound};

use crate::registry::CorrelationRegistry;
use crate::router::NotificationRouter;
use crate::transport::FrameSource;

/// The read-side task: drains the transport sequentially and owns the
/// delivery path.
///
/// Frames are handled in the order the transport produces them. A frame that
/// fails to parse is logged and skipped; an unroutable id is silently
/// dropped; neither terminates the loop. The loop ends only when the source
/// does, at which point every outstanding waiter is dropped so its caller
/// wakes with a connection-closed error.
pub struct Dispatcher {
    registry: Arc<CorrelationRegistry>,
    router: Arc<NotificationRouter>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CorrelationRegistry>, router: Arc<NotificationRouter>) -> Self {
        Self { registry, router }
    }

    /// Consume the source until the connection closes.
    pub async fn run<S: FrameSource>(self, mut source: S) {
        info!("dispatcher started");
        while let Some(frame) = source.next().await {
            match frame {
                Ok(text) => self.handle_frame(&text),
                Err(err) => {
                    warn!(%err, "transport receive error, stopping dispatcher");
                    break;
                }
            }
        }
        let outstanding = self.registry.drain();
        if outstanding > 0 {
            warn!(outstanding, "connection closed with commands still in flight");
        }
        info!("dispatcher stopped");
    }

    fn handle_frame(&self, text: &str) {
        match classify_frame(text) {
            Ok(Inbound::Response { id, head, body }) => {
                if self.registry.resolve(id, head, body) {
                    debug!(id, "response delivered");
                } else {
                    // Expected after cancellation or a stale id; not an error.
                    debug!(id, "unroutable response dropped");
                }
            }
            Ok(Inbound::Notification(notification)) => {
                debug!(kind = notification.kind().wire_name(), "notification routed");
                self.router.route(&notification);
            }
            Err(err) => {
                warn!(%err, "undecodable frame dropped");
            }
        }
    }
}
