//! Lifetime-bound cancellation for fetches started by a view.

use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

/// Owned by whatever started a group of requests. Cancelling it, or dropping
/// it, abandons every request started under one of its signals.
#[derive(Debug)]
pub struct ViewScope {
    tx: watch::Sender<bool>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Runs `future` unless the scope is cancelled first.
    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        self.signal().guard(future).await
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the owning scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // An error means the scope is gone, which counts as cancellation.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Races `future` against cancellation; `None` when cancellation won.
    pub async fn guard<F: Future>(&self, future: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => {
                debug!("request abandoned after cancellation");
                None
            }
            output = future => Some(output),
        }
    }
}
