//! HTTP implementation of the link monitor's liveness probe.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use tracing::debug;

use crate::domain::link_monitor::{LinkProber, ProbeStatus};

const MAX_REDIRECTS: usize = 5;

/// Probes a target with a `HEAD` request.
///
/// A target is reachable when the final response (after following up to
/// five redirects) has a 2xx or 3xx status. Connection errors, TLS errors,
/// client timeouts and 4xx/5xx answers all count as unreachable.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Builds a prober whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("snaplink-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &str) -> ProbeStatus {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || status.is_redirection() {
                    ProbeStatus::Reachable
                } else {
                    debug!(url, status = status.as_u16(), "probe got error status");
                    ProbeStatus::Unreachable
                }
            }
            Err(e) => {
                debug!(url, error = %e, "probe request failed");
                ProbeStatus::Unreachable
            }
        }
    }
}
