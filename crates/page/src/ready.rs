//! Explicit "page data is ready" signal.

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::debug;

/// Create a linked notifier/signal pair.
pub fn ready_channel() -> (ReadyNotifier, ReadySignal) {
    let (tx, rx) = oneshot::channel();
    (ReadyNotifier(tx), ReadySignal(rx))
}

/// Held by whatever renders the page; fires once with the rendered HTML.
#[derive(Debug)]
pub struct ReadyNotifier(oneshot::Sender<String>);

impl ReadyNotifier {
    /// Deliver the page. Returns false if nobody is waiting any more.
    pub fn deliver(self, html: impl Into<String>) -> bool {
        self.0.send(html.into()).is_ok()
    }
}

/// Awaited by the resolver.
#[derive(Debug)]
pub struct ReadySignal(oneshot::Receiver<String>);

impl ReadySignal {
    /// Wait for the page, up to `timeout`. `None` if it timed out or the
    /// notifier was dropped.
    pub async fn wait(self, timeout: Duration) -> Option<String> {
        match tokio::time::timeout(timeout, self.0).await {
            Ok(Ok(html)) => Some(html),
            Ok(Err(_)) => {
                debug!("ready notifier dropped");
                None
            }
            Err(_) => {
                debug!(?timeout, "page not ready in time");
                None
            }
        }
    }
}
