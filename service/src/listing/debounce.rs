//! Trailing-edge debounce for search input.
//!
//! Each [`Debouncer::push`] restarts the timer. A value is delivered only
//! once `delay` passes with no newer push, so intermediate keystrokes never
//! reach the receiver.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay between the last keystroke and the committed search.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(500);

pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiver of committed values.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: Mutex::new(None),
        };
        (debouncer, rx)
    }

    /// Record a new value, superseding any value not yet committed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&self, value: T) {
        let tx = self.tx.clone();
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the view was dropped.
            let _ = tx.send(value);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending value, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_value_is_committed() {
        let (debouncer, mut rx) = Debouncer::new(DEFAULT_SEARCH_DELAY);

        debouncer.push("s".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("sa".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("saúde".to_string());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("saúde"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_commit_separately() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(50));

        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.push(2);
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(50));

        debouncer.push(7);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_debouncer_discards_pending_value() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(50));

        debouncer.push(7);
        drop(debouncer);

        assert_eq!(rx.recv().await, None);
    }
}
