//! Service lifecycle: startup, serving, and bounded graceful shutdown.

use crate::config::Config;
use crate::domain::click_queue::click_queue;
use crate::domain::click_worker::ClickWorkerPool;
use crate::domain::link_monitor::{LinkMonitor, MonitorSettings};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::persistence::{self, PgClickRepository, PgLinkRepository};
use crate::infrastructure::probe::HttpProber;
use crate::routes::app_router;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Runs the service until a termination signal arrives.
///
/// Startup order:
/// - PostgreSQL connection pool and migrations
/// - Click queue and worker pool
/// - Link monitor with its own cancellation token
/// - Axum HTTP server
///
/// Any startup failure is returned and ends the process.
///
/// On SIGINT/SIGTERM a single deadline `SHUTDOWN_GRACE_SECS` away is set.
/// The listener stops accepting, in-flight requests complete, the monitor is
/// cancelled, the click workers drain the queue and the database pool closes,
/// all before that deadline. Work still pending at the deadline is abandoned.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The click queue or HTTP prober cannot be built
/// - Server bind fails or the server stops unexpectedly
pub async fn run(config: Config) -> Result<()> {
    run_until(config, shutdown_signal()).await
}

/// Same as [`run`], with the shutdown trigger supplied by the caller.
pub async fn run_until<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let pool = persistence::connect(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    persistence::migrate(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repository: Arc<dyn ClickRepository> =
        Arc::new(PgClickRepository::new(pool.clone()));

    let (click_sender, click_receiver) =
        click_queue(config.click_queue_capacity).context("Failed to create click queue")?;
    let workers = ClickWorkerPool::spawn(
        config.click_workers,
        click_receiver,
        click_repository.clone(),
    );

    let prober =
        Arc::new(HttpProber::new(config.monitor_probe_timeout()).context("Failed to build prober")?);
    let monitor = LinkMonitor::new(
        link_repository.clone(),
        prober,
        MonitorSettings {
            interval: config.monitor_interval(),
            probe_timeout: config.monitor_probe_timeout(),
            max_concurrent_probes: config.monitor_max_concurrent_probes,
        },
    );
    let monitor_cancel = CancellationToken::new();
    let monitor_handle = tokio::spawn(monitor.run(monitor_cancel.clone()));

    let state = AppState::new(
        link_repository,
        click_repository,
        click_sender,
        config.base_url.as_str(),
    );
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    let stop_accepting = CancellationToken::new();
    let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(
        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
        )
        .with_graceful_shutdown(stop_accepting.clone().cancelled_owned())
        .into_future(),
    );

    let grace = config.shutdown_grace();

    let server_failure = tokio::select! {
        _ = shutdown => {
            tracing::info!(grace_secs = grace.as_secs(), "shutdown requested, draining requests");
            None
        }
        result = &mut server => Some(server_exit_error(result)),
    };

    let services = Services {
        server: server_failure.is_none().then_some(server),
        stop_accepting,
        monitor: monitor_handle,
        monitor_cancel,
        workers,
    };

    let deadline = Instant::now() + grace;
    let finished = services.stop(deadline).await;
    tracing::info!(finished, "click workers stopped");

    if tokio::time::timeout_at(deadline, pool.close()).await.is_err() {
        tracing::warn!("database pool still busy at the shutdown deadline");
    }
    tracing::info!("Shutdown complete");

    match server_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Background tasks stopped together against one shutdown deadline.
struct Services {
    /// `None` once the server task has already exited.
    server: Option<JoinHandle<std::io::Result<()>>>,
    stop_accepting: CancellationToken,
    monitor: JoinHandle<()>,
    monitor_cancel: CancellationToken,
    workers: ClickWorkerPool,
}

impl Services {
    /// Stops the server, the monitor and the click workers, in that order.
    ///
    /// Every step shares `deadline`; whatever is still running when it passes
    /// is aborted. Returns the number of click workers that finished in time.
    async fn stop(mut self, deadline: Instant) -> usize {
        self.stop_accepting.cancel();
        if let Some(server) = self.server.as_mut() {
            drain_server(server, deadline).await;
        }

        self.monitor_cancel.cancel();
        match tokio::time::timeout_at(deadline, &mut self.monitor).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "link monitor task ended abnormally"),
            Err(_) => {
                tracing::warn!("link monitor still running at the shutdown deadline");
                self.monitor.abort();
            }
        }

        self.workers.shutdown_by(deadline).await
    }
}

/// Waits until `deadline` for in-flight requests, then abandons them.
async fn drain_server(server: &mut JoinHandle<std::io::Result<()>>, deadline: Instant) {
    match tokio::time::timeout_at(deadline, &mut *server).await {
        Ok(Ok(Ok(()))) => tracing::info!("HTTP server drained"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "HTTP server error during shutdown"),
        Ok(Err(e)) => tracing::error!(error = %e, "HTTP server task failed"),
        Err(_) => {
            tracing::warn!("grace period elapsed, abandoning in-flight requests");
            server.abort();
        }
    }
}

fn server_exit_error(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> anyhow::Error {
    match result {
        Ok(Ok(())) => anyhow::anyhow!("HTTP server stopped unexpectedly"),
        Ok(Err(e)) => anyhow::Error::new(e).context("HTTP server failed"),
        Err(e) => anyhow::Error::new(e).context("HTTP server task panicked"),
    }
}
