//! Single pending timer driving the fetch cycles.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Owns at most one pending timer; arming replaces any previous one.
///
/// A fired timer sends a tick on the channel consumed by the update loop.
pub(crate) struct UpdateScheduler {
    tx: mpsc::UnboundedSender<()>,
    pending: Option<JoinHandle<()>>,
}

impl UpdateScheduler {
    pub fn new(tx: mpsc::UnboundedSender<()>) -> Self {
        Self { tx, pending: None }
    }

    /// Schedule a tick after `delay`, cancelling any pending timer first.
    pub fn arm(&mut self, delay: Duration) {
        self.cancel();
        tracing::debug!("Next fetch cycle in {:?}", delay);

        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(());
        }));
    }

    /// Drop the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
