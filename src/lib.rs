//! # Driftwatch
//!
//! A scheduled watcher for web sources that notifies on content changes.
//!
//! ## Architecture
//!
//! Driftwatch follows a modular pipeline architecture:
//!
//! ```text
//! Fetcher → Adapter → Normalizer → Fingerprint → Detector → Digest → Notifier
//! ```
//!
//! - [`fetcher`]: HTTP client with ETag/conditional request support
//! - [`adapters`]: Per-format item extraction (feeds, HTML, JSON)
//! - [`detector`]: Fingerprint comparison against persisted state
//! - [`digest`]: One aggregated notification per run
//!
//! ## Quick Start
//!
//! ```bash
//! # Validate the source list
//! driftwatch validate
//!
//! # Check every source once, printing the digest
//! driftwatch run --dry-run
//!
//! # Check and notify
//! driftwatch run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, fetcher, notifier, runner.
pub mod app;

/// Item extraction, one adapter per source shape.
///
/// - `feed` / `release`: RSS and Atom via feed-rs
/// - `html_articles` / `html_changelog`: CSS-selector scraping
/// - `structured_endpoint`: JSON documents
pub mod adapters;

/// Command-line interface using clap.
///
/// - `run [--dry-run] [--deadline <secs>]` - Check every source once
/// - `validate` - Check the source list without fetching
/// - `list` - Show the configured sources
pub mod cli;

/// Source-list configuration loaded from TOML.
pub mod config;

/// Change detection against the persisted per-source state.
pub mod detector;

/// Digest assembly: the single notification body for a run.
pub mod digest;

/// Core domain models.
///
/// - [`ExtractedItem`](domain::ExtractedItem): One unit of source content
/// - [`SourceState`](domain::SourceState): Persisted per-source record
/// - [`SourceReport`](domain::SourceReport): Per-source run outcome
pub mod domain;

/// HTTP fetching with conditional request support.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for source fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Content fingerprinting over normalized items.
pub mod fingerprint;

/// Item normalization: noise stripping before fingerprinting.
pub mod normalizer;

/// Digest dispatch.
///
/// - [`Notifier`](notify::Notifier): Async trait for digest delivery
/// - [`WebhookNotifier`](notify::WebhookNotifier): JSON POST to a webhook
pub mod notify;

/// Run orchestration with bounded concurrency and per-source isolation.
pub mod runner;

/// SQLite persistence layer.
///
/// - [`StateStore`](store::StateStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
