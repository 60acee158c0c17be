// src/prober.rs
use crate::catalog::ProbeCatalog;
use crate::session::Session;
use crate::types::{ProbeOutcome, ProbeStatus};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use reqwest::StatusCode;
use std::time::{Duration, Instant};

/// Concurrently checks one identifier against every catalog platform.
///
/// Each probe owns its own timeout; a slow or hanging platform delays
/// only its own outcome, never its siblings. There is no retry and no
/// batch-wide cancellation, and the presence signal is a heuristic:
/// platforms that block automated clients will misclassify.
pub struct ExistenceProber {
    session: Session,
    timeout: Duration,
}

impl ExistenceProber {
    pub fn new(session: Session, timeout: Duration) -> Self {
        Self { session, timeout }
    }

    /// Probes all catalog entries for `identifier` and returns exactly
    /// one outcome per entry, in catalog order.
    ///
    /// Completion order over the network is arbitrary, so each task
    /// reports back with its catalog index and results are slotted into
    /// an index-addressed buffer before being returned.
    pub async fn probe_all(&self, identifier: &str, catalog: &ProbeCatalog) -> Vec<ProbeOutcome> {
        let started = Instant::now();
        let mut futures = FuturesUnordered::new();

        for (index, target) in catalog.entries().iter().enumerate() {
            let url = target.resolve(identifier);
            let platform = target.platform.clone();
            let session = self.session.clone();
            let timeout = self.timeout;

            futures.push(async move {
                let status = Self::probe_one(&session, &url, timeout).await;
                debug!("{}: {} -> {}", platform, url, status);
                (
                    index,
                    ProbeOutcome {
                        platform,
                        url,
                        status,
                    },
                )
            });
        }

        let mut slots: Vec<Option<ProbeOutcome>> = vec![None; catalog.len()];
        while let Some((index, outcome)) = futures.next().await {
            slots[index] = Some(outcome);
        }

        // A task vanishing without reporting would be a bug, but a single
        // target must never abort the batch; fold any hole into an error
        // outcome for that target.
        let outcomes: Vec<ProbeOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    warn!("Probe task for catalog index {} reported nothing", index);
                    catalog.entries()[index].error_outcome(identifier)
                })
            })
            .collect();

        debug!(
            "Probed {} platforms for {:?} in {:?}",
            outcomes.len(),
            identifier,
            started.elapsed()
        );

        outcomes
    }

    async fn probe_one(session: &Session, url: &str, timeout: Duration) -> ProbeStatus {
        let result = session
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, session.probe_user_agent())
            .timeout(timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => ProbeStatus::Found,
            Ok(_) => ProbeStatus::NotFound,
            // Timeout, DNS failure, connection refused, TLS failure
            Err(_) => ProbeStatus::Error,
        }
    }
}
