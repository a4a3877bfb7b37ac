use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{DriftError, Result};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::notify::{ConsoleNotifier, Notifier, WebhookNotifier};
use crate::runner::{Runner, DEFAULT_RUN_DEADLINE_SECS, DEFAULT_WORKERS};
use crate::store::sqlite::SqliteStore;
use crate::store::StateStore;

pub struct AppContext {
    pub store: Arc<dyn StateStore + Send + Sync>,
    pub runner: Runner,
}

impl AppContext {
    pub fn with_limits(
        db_path: Option<PathBuf>,
        workers: usize,
        run_deadline: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store: Arc<dyn StateStore + Send + Sync> = Arc::new(SqliteStore::new(&db_path)?);
        Ok(Self::wire(store, workers, run_deadline, dry_run))
    }

    pub fn in_memory() -> Result<Self> {
        let store: Arc<dyn StateStore + Send + Sync> = Arc::new(SqliteStore::in_memory()?);
        Ok(Self::wire(
            store,
            DEFAULT_WORKERS,
            Duration::from_secs(DEFAULT_RUN_DEADLINE_SECS),
            true,
        ))
    }

    fn wire(
        store: Arc<dyn StateStore + Send + Sync>,
        workers: usize,
        run_deadline: Duration,
        dry_run: bool,
    ) -> Self {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new());

        // Dry runs print to stdout; otherwise the webhook wins when
        // configured and stdout is the fallback.
        let notifier: Arc<dyn Notifier + Send + Sync> = if dry_run {
            Arc::new(ConsoleNotifier)
        } else {
            match WebhookNotifier::from_env() {
                Some(webhook) => Arc::new(webhook),
                None => Arc::new(ConsoleNotifier),
            }
        };

        let runner = Runner::with_limits(fetcher, store.clone(), notifier, workers, run_deadline);

        Self { store, runner }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| DriftError::Config("Could not find data directory".into()))?;
        let driftwatch_dir = data_dir.join("driftwatch");
        std::fs::create_dir_all(&driftwatch_dir)?;
        Ok(driftwatch_dir.join("driftwatch.db"))
    }
}
