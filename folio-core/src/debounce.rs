use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay used for the projects search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(160);

/// Coalesces bursts of values into the last one, delivered after `wait` of quiet.
///
/// Each call cancels the pending delivery and schedules a new one. Delivered
/// values arrive on the receiver returned by [`Debouncer::new`]. Must be used
/// from within a tokio runtime.
pub struct Debouncer<T> {
    wait: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(wait: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            wait,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    pub fn call(&mut self, value: T) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let tx = self.tx.clone();
        let wait = self.wait;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending delivery, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
