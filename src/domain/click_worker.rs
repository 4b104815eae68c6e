//! Background workers that drain the click queue into storage.
//!
//! Delivery is at-most-once: every event gets a single persist attempt. A
//! failed write is logged with full context and the event is discarded; the
//! worker moves on to the next one.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::ClickReceiver;
use crate::domain::repositories::ClickRepository;

/// A fixed set of click workers sharing one queue.
pub struct ClickWorkerPool {
    receiver: ClickReceiver,
    handles: Vec<JoinHandle<()>>,
}

impl ClickWorkerPool {
    /// Spawns `worker_count` workers consuming from `receiver`.
    ///
    /// Each worker runs until the queue is closed and drained.
    pub fn spawn<R>(worker_count: usize, receiver: ClickReceiver, repository: Arc<R>) -> Self
    where
        R: ClickRepository + ?Sized + 'static,
    {
        let handles = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(run_click_worker(
                    worker_id,
                    receiver.clone(),
                    repository.clone(),
                ))
            })
            .collect();

        info!(workers = worker_count, "click worker pool started");

        Self { receiver, handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Closes the queue and waits up to `grace` for the workers to drain it.
    ///
    /// See [`ClickWorkerPool::shutdown_by`].
    pub async fn shutdown(self, grace: Duration) -> usize {
        self.shutdown_by(Instant::now() + grace).await
    }

    /// Closes the queue and waits until `deadline` for the workers to drain it.
    ///
    /// Workers still running at the deadline are aborted and whatever is left
    /// in the queue is lost. Returns the number of workers that finished in
    /// time.
    pub async fn shutdown_by(self, deadline: Instant) -> usize {
        self.receiver.close();

        let total = self.handles.len();
        let mut finished = 0;

        for mut handle in self.handles {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => finished += 1,
                Ok(Err(e)) => error!(error = %e, "click worker panicked"),
                Err(_) => handle.abort(),
            }
        }

        if finished < total {
            warn!(
                finished,
                total, "click workers did not drain the queue before the deadline"
            );
        } else {
            info!(workers = total, "click worker pool stopped");
        }

        finished
    }
}

/// Consumer loop of a single worker.
pub async fn run_click_worker<R>(worker_id: usize, receiver: ClickReceiver, repository: Arc<R>)
where
    R: ClickRepository + ?Sized,
{
    debug!(worker_id, "click worker started");

    while let Some(event) = receiver.dequeue().await {
        process_click_event(worker_id, &event, repository.as_ref()).await;
    }

    debug!(worker_id, "click worker stopped");
}

/// Persists one event. Returns `true` when the click was stored.
pub async fn process_click_event<R>(worker_id: usize, event: &ClickEvent, repository: &R) -> bool
where
    R: ClickRepository + ?Sized,
{
    match repository.create_click(event.to_new_click()).await {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            info!(
                worker_id,
                link_id = event.link_id,
                click_id = click.id,
                "click recorded"
            );
            true
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            error!(
                worker_id,
                link_id = event.link_id,
                user_agent = event.user_agent.as_deref().unwrap_or("-"),
                ip = event.ip.as_deref().unwrap_or("-"),
                error = %e,
                "failed to record click"
            );
            false
        }
    }
}
