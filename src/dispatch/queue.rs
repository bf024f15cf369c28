use crate::models::{AnalysisRequest, ConfigSnapshot};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Unbounded FIFO of pending analysis requests
///
/// Split into a cloneable [`RequestSender`] for the menu and a single
/// [`RequestReceiver`] for the dispatcher.
pub struct RequestQueue;

impl RequestQueue {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (RequestSender, RequestReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            RequestSender {
                tx,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            RequestReceiver { rx },
        )
    }
}

/// Producer half of the request queue. Never blocks.
#[derive(Clone)]
pub struct RequestSender {
    tx: mpsc::UnboundedSender<AnalysisRequest>,
    next_id: Arc<AtomicU64>,
}

impl RequestSender {
    /// Queue a request, optionally carrying the paths captured right now.
    ///
    /// Returns the request id, or `None` if the dispatcher is gone and the
    /// request was dropped.
    pub fn enqueue(&self, snapshot: Option<ConfigSnapshot>) -> Option<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.tx.send(AnalysisRequest { id, snapshot }) {
            Ok(()) => {
                tracing::debug!("Queued analysis request #{}", id);
                Some(id)
            }
            Err(_) => {
                tracing::warn!("Dispatcher stopped, dropping analysis request #{}", id);
                None
            }
        }
    }
}

/// Consumer half of the request queue
pub struct RequestReceiver {
    rx: mpsc::UnboundedReceiver<AnalysisRequest>,
}

impl RequestReceiver {
    /// Wait for the next request. `None` once every sender is dropped and
    /// the queue is empty.
    pub async fn dequeue(&mut self) -> Option<AnalysisRequest> {
        self.rx.recv().await
    }

    pub fn try_dequeue(&mut self) -> Option<AnalysisRequest> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting requests. Requests already queued stay available to
    /// [`try_dequeue`](Self::try_dequeue).
    pub fn close(&mut self) {
        self.rx.close();
    }
}
