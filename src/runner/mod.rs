//! Run orchestration: one bounded-concurrency pass over the source list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};

use crate::adapters;
use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::detector;
use crate::digest;
use crate::domain::{Outcome, RunSummary, SourceReport};
use crate::fetcher::{FetchOutcome, Fetcher};
use crate::fingerprint;
use crate::normalizer::Normalizer;
use crate::notify::Notifier;
use crate::store::StateStore;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_RUN_DEADLINE_SECS: u64 = 120;

pub struct Runner {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    store: Arc<dyn StateStore + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    normalizer: Normalizer,
    semaphore: Arc<Semaphore>,
    run_deadline: Duration,
}

impl Runner {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn StateStore + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        Self::with_limits(
            fetcher,
            store,
            notifier,
            DEFAULT_WORKERS,
            Duration::from_secs(DEFAULT_RUN_DEADLINE_SECS),
        )
    }

    pub fn with_limits(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn StateStore + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        workers: usize,
        run_deadline: Duration,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            normalizer: Normalizer::new(),
            semaphore: Arc::new(Semaphore::new(workers)),
            run_deadline,
        }
    }

    /// One complete pass: every source is processed end-to-end in its own
    /// task, failures stay per-source, and at most one digest is dispatched.
    /// Errors out only before any fetch (configuration); never for an
    /// individual source.
    pub async fn run_once(&self, sources: Vec<SourceDefinition>) -> Result<RunSummary> {
        let started = std::time::Instant::now();
        let deadline = Instant::now() + self.run_deadline;

        let mut handles = Vec::new();
        for source in sources {
            let fetcher = self.fetcher.clone();
            let store = self.store.clone();
            let normalizer = self.normalizer.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");

                match timeout_at(
                    deadline,
                    process_source(fetcher.as_ref(), store.as_ref(), &normalizer, &source),
                )
                .await
                {
                    Ok(report) => report,
                    Err(_) => {
                        tracing::warn!(source = %source.id, "abandoned at run deadline");
                        SourceReport::error(&source, "run deadline exceeded")
                    }
                }
            });

            handles.push(handle);
        }

        let mut reports = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        let mut notify_failed = false;
        if let Some(digest) = digest::build(&reports) {
            if let Err(e) = self.notifier.send(&digest.subject, &digest.body).await {
                tracing::error!("Failed to dispatch digest: {}", e);
                notify_failed = true;
            }
        } else {
            tracing::info!("No changes detected");
        }

        let mut summary = RunSummary::from_reports(&reports, started.elapsed().as_millis() as u64);
        summary.notify_failed = notify_failed;
        tracing::info!(
            checked = summary.checked,
            changed = summary.changed,
            first_seen = summary.first_seen,
            errored = summary.errored,
            notify_failed = summary.notify_failed,
            duration_ms = summary.duration_ms,
            "run complete"
        );
        Ok(summary)
    }
}

/// Per-source pipeline with the failure boundary: everything except config
/// errors is downgraded to an `Error` report here.
async fn process_source(
    fetcher: &(dyn Fetcher + Send + Sync),
    store: &(dyn StateStore + Send + Sync),
    normalizer: &Normalizer,
    source: &SourceDefinition,
) -> SourceReport {
    match check_source(fetcher, store, normalizer, source).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(source = %source.id, "source check failed: {}", e);
            SourceReport::error(source, &e.to_string())
        }
    }
}

async fn check_source(
    fetcher: &(dyn Fetcher + Send + Sync),
    store: &(dyn StateStore + Send + Sync),
    normalizer: &Normalizer,
    source: &SourceDefinition,
) -> Result<SourceReport> {
    let prev = store.get(&source.id)?;

    let outcome = fetcher
        .fetch(
            source,
            prev.as_ref().and_then(|s| s.etag.as_deref()),
            prev.as_ref().and_then(|s| s.last_modified.as_deref()),
        )
        .await?;

    match outcome {
        FetchOutcome::NotModified => {
            detector::on_not_modified(store, &source.id, prev.as_ref())?;
            Ok(SourceReport::of(source, Outcome::NotModified))
        }
        FetchOutcome::Content {
            body,
            etag,
            last_modified,
        } => {
            let items = adapters::extract(&body, source)?;
            let patterns = source.compiled_ignore_patterns();
            let items = normalizer.normalize(items, &patterns);

            // Zero items after a successful fetch is a broken extraction
            // (dead selector, format change), not "no new content".
            if items.is_empty() {
                return Err(DriftError::Parse(format!(
                    "[{}] extraction produced no items",
                    source.id
                )));
            }

            let new_fingerprint = fingerprint::fingerprint(&items, source.max_items);
            let outcome = detector::on_content(
                store,
                &source.id,
                prev.as_ref(),
                &new_fingerprint,
                etag,
                last_modified,
                &items,
            )?;

            match outcome {
                Outcome::Changed => Ok(SourceReport::changed(source, items)),
                other => Ok(SourceReport::of(source, other)),
            }
        }
    }
}
