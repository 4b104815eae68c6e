//! Periodic liveness monitor for stored links.
//!
//! On every tick the monitor lists all links, probes their targets with a
//! bounded number of concurrent requests, and records the outcome. Every
//! probe runs under its own timeout, so one hanging target cannot stall the
//! rest of the scan or push back the next tick indefinitely.
//!
//! # Cycle
//!
//! ```text
//! Idle --tick--> Scanning (list_all) --> Probing (bounded fan-out) --> Reporting --> Idle
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Link, LinkHealth};
use crate::domain::repositories::LinkRepository;

/// Answer of a single liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Reachable,
    Unreachable,
}

/// Checks whether a target URL is alive.
///
/// Implementations should not panic and should map every failure to
/// [`ProbeStatus::Unreachable`]. The monitor enforces its own timeout around
/// each call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeStatus;
}

/// Per-link result of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
    /// The probe did not answer within the probe timeout.
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

impl From<ProbeStatus> for ProbeOutcome {
    fn from(status: ProbeStatus) -> Self {
        match status {
            ProbeStatus::Reachable => ProbeOutcome::Reachable,
            ProbeStatus::Unreachable => ProbeOutcome::Unreachable,
        }
    }
}

/// Aggregated results of one scan, keyed by link id.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub results: HashMap<i64, ProbeOutcome>,
    /// Links whose reachability differs from the previous scan.
    pub transitions: Vec<i64>,
    pub elapsed: Duration,
}

impl ScanReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn reachable(&self) -> usize {
        self.count(ProbeOutcome::Reachable)
    }

    pub fn unreachable(&self) -> usize {
        self.count(ProbeOutcome::Unreachable)
    }

    pub fn timed_out(&self) -> usize {
        self.count(ProbeOutcome::TimedOut)
    }

    pub fn outcome(&self, link_id: i64) -> Option<ProbeOutcome> {
        self.results.get(&link_id).copied()
    }

    fn count(&self, outcome: ProbeOutcome) -> usize {
        self.results.values().filter(|o| **o == outcome).count()
    }
}

/// Timing and concurrency knobs of the monitor.
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub probe_timeout: Duration,
    pub max_concurrent_probes: usize,
}

/// Periodic link health monitor.
///
/// The only writer of the links' health fields.
pub struct LinkMonitor<L: ?Sized, P: ?Sized> {
    links: Arc<L>,
    prober: Arc<P>,
    settings: MonitorSettings,
    known_states: HashMap<i64, bool>,
}

impl<L, P> LinkMonitor<L, P>
where
    L: LinkRepository + ?Sized,
    P: LinkProber + ?Sized,
{
    pub fn new(links: Arc<L>, prober: Arc<P>, settings: MonitorSettings) -> Self {
        Self {
            links,
            prober,
            settings: MonitorSettings {
                max_concurrent_probes: settings.max_concurrent_probes.max(1),
                ..settings
            },
            known_states: HashMap::new(),
        }
    }

    /// Runs scans every `interval` until `cancel` fires.
    ///
    /// The first scan happens one interval after start. A tick missed because
    /// a scan ran long is delayed rather than replayed in a burst.
    /// Cancellation interrupts both the wait and an in-flight scan.
    pub async fn run(mut self, cancel: CancellationToken) {
        let period = self.settings.interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = period.as_secs(),
            probe_timeout_ms = self.settings.probe_timeout.as_millis() as u64,
            max_concurrent_probes = self.settings.max_concurrent_probes,
            "link monitor started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.scan_once() => {}
            }
        }

        info!("link monitor stopped");
    }

    /// Performs one full scan: list, probe, report.
    ///
    /// A storage error while listing links is logged and yields an empty
    /// report; the next tick tries again.
    pub async fn scan_once(&mut self) -> ScanReport {
        metrics::counter!("monitor_scans_total").increment(1);
        let started = Instant::now();

        let links = match self.links.list_all().await {
            Ok(links) => links,
            Err(e) => {
                error!(error = %e, "link monitor could not list links");
                return ScanReport::default();
            }
        };

        debug!(links = links.len(), "link monitor scanning");

        let listed: HashSet<i64> = links.iter().map(|link| link.id).collect();
        self.known_states.retain(|id, _| listed.contains(id));

        let outcomes = self.probe_all(links).await;
        let checked_at = Utc::now();

        let mut report = ScanReport::default();
        for (link, outcome) in outcomes {
            if self.record(&link, outcome, checked_at).await {
                report.transitions.push(link.id);
            }
            report.results.insert(link.id, outcome);
        }
        report.elapsed = started.elapsed();

        info!(
            total = report.total(),
            reachable = report.reachable(),
            unreachable = report.unreachable(),
            timed_out = report.timed_out(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "link monitor scan finished"
        );

        report
    }

    async fn probe_all(&self, links: Vec<Link>) -> Vec<(Link, ProbeOutcome)> {
        let prober = self.prober.as_ref();
        let probe_timeout = self.settings.probe_timeout;

        stream::iter(links)
            .map(|link| async move {
                let outcome = match tokio::time::timeout(probe_timeout, prober.probe(&link.long_url))
                    .await
                {
                    Ok(status) => ProbeOutcome::from(status),
                    Err(_) => ProbeOutcome::TimedOut,
                };
                (link, outcome)
            })
            .buffer_unordered(self.settings.max_concurrent_probes)
            .collect()
            .await
    }

    /// Logs and persists one outcome. Returns `true` on a state change.
    async fn record(&mut self, link: &Link, outcome: ProbeOutcome, checked_at: DateTime<Utc>) -> bool {
        let reachable = outcome.is_reachable();

        match outcome {
            ProbeOutcome::Reachable => {
                debug!(link_id = link.id, code = %link.code, "link reachable");
            }
            ProbeOutcome::Unreachable => {
                metrics::counter!("monitor_unreachable_total").increment(1);
                warn!(link_id = link.id, code = %link.code, url = %link.long_url, "link unreachable");
            }
            ProbeOutcome::TimedOut => {
                metrics::counter!("monitor_unreachable_total").increment(1);
                warn!(
                    link_id = link.id,
                    code = %link.code,
                    url = %link.long_url,
                    timeout_ms = self.settings.probe_timeout.as_millis() as u64,
                    "link probe timed out"
                );
            }
        }

        let previous = self
            .known_states
            .insert(link.id, reachable)
            .or(link.reachable);
        let changed = previous.is_some_and(|was| was != reachable);
        if changed {
            info!(
                link_id = link.id,
                code = %link.code,
                url = %link.long_url,
                from = state_label(!reachable),
                to = state_label(reachable),
                "link status changed"
            );
        }

        let health = LinkHealth {
            link_id: link.id,
            reachable,
            checked_at,
        };
        if let Err(e) = self.links.update_health(health).await {
            error!(link_id = link.id, error = %e, "failed to store link health");
        }

        changed
    }
}

fn state_label(reachable: bool) -> &'static str {
    if reachable { "reachable" } else { "unreachable" }
}
