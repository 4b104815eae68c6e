//! Bounded click event queue shared by the redirect path and the worker pool.
//!
//! Built on a Tokio `mpsc` channel. The producer side only ever uses
//! `try_send`, so a full queue rejects immediately instead of applying
//! backpressure to the request. The consumer side is shared by several
//! workers; each event is handed to exactly one of them.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::domain::click_event::ClickEvent;

/// Why an event was not accepted by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnqueueError {
    #[error("click queue is full")]
    Full,
    #[error("click queue is closed")]
    Closed,
}

/// Queue construction failures. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("click queue capacity must be at least 1")]
    ZeroCapacity,
}

/// Creates a bounded click queue with a fixed `capacity`.
///
/// # Errors
///
/// Returns [`QueueError::ZeroCapacity`] if `capacity` is zero.
pub fn click_queue(capacity: usize) -> Result<(ClickSender, ClickReceiver), QueueError> {
    if capacity == 0 {
        return Err(QueueError::ZeroCapacity);
    }

    let (tx, rx) = mpsc::channel(capacity);
    let closed = CancellationToken::new();
    let sender = ClickSender {
        tx,
        closed: closed.clone(),
    };
    let receiver = ClickReceiver {
        rx: Arc::new(Mutex::new(rx)),
        closed,
    };

    Ok((sender, receiver))
}

/// Producer handle. Cheap to clone; one per request handler is fine.
#[derive(Debug, Clone)]
pub struct ClickSender {
    tx: mpsc::Sender<ClickEvent>,
    closed: CancellationToken,
}

impl ClickSender {
    /// Offers an event to the queue without waiting for space.
    ///
    /// # Errors
    ///
    /// - [`EnqueueError::Full`] if the queue is at capacity
    /// - [`EnqueueError::Closed`] if the consumer side has been closed
    pub fn enqueue(&self, event: ClickEvent) -> Result<(), EnqueueError> {
        if self.closed.is_cancelled() {
            metrics::counter!("clicks_dropped_total", "reason" => "closed").increment(1);
            return Err(EnqueueError::Closed);
        }

        match self.tx.try_send(event) {
            Ok(()) => {
                metrics::counter!("clicks_enqueued_total").increment(1);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "full").increment(1);
                Err(EnqueueError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "closed").increment(1);
                Err(EnqueueError::Closed)
            }
        }
    }

    /// Maximum number of buffered events.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Number of events currently buffered.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.tx.is_closed()
    }
}

/// Consumer handle shared by the worker pool.
///
/// Clones refer to the same underlying queue. Workers take turns on the
/// receiver, so an event is never observed by two of them.
#[derive(Debug, Clone)]
pub struct ClickReceiver {
    rx: Arc<Mutex<mpsc::Receiver<ClickEvent>>>,
    closed: CancellationToken,
}

impl ClickReceiver {
    /// Waits for the next event.
    ///
    /// Returns `None` once the queue is closed and every buffered event has
    /// been taken, or once all senders are gone and the buffer is empty.
    pub async fn dequeue(&self) -> Option<ClickEvent> {
        let mut rx = self.rx.lock().await;

        tokio::select! {
            biased;
            event = rx.recv() => event,
            _ = self.closed.cancelled() => {
                rx.close();
                rx.recv().await
            }
        }
    }

    /// Stops accepting new events.
    ///
    /// Events already buffered can still be dequeued; later `enqueue` calls
    /// fail with [`EnqueueError::Closed`].
    pub fn close(&self) {
        self.closed.cancel();
        // A worker parked in `dequeue` holds the lock; it closes the channel
        // itself when it observes the token.
        if let Ok(mut rx) = self.rx.try_lock() {
            rx.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}
