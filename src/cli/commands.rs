use std::path::Path;

use crate::app::{AppContext, Result};
use crate::config::SourcesConfig;

pub async fn run(ctx: &AppContext, config_path: &Path) -> Result<()> {
    let config = SourcesConfig::load(config_path)?;

    if config.sources.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    println!("Checking {} sources...", config.sources.len());
    let summary = ctx.runner.run_once(config.sources).await?;

    println!(
        "Run complete: {} checked, {} changed, {} first seen, {} errors ({} ms)",
        summary.checked,
        summary.changed,
        summary.first_seen,
        summary.errored,
        summary.duration_ms
    );
    if summary.notify_failed {
        eprintln!("Digest dispatch failed; see logs");
    }
    Ok(())
}

pub fn validate(config_path: &Path) -> Result<()> {
    let config = SourcesConfig::load(config_path)?;
    println!(
        "{}: {} sources, all valid",
        config_path.display(),
        config.sources.len()
    );
    Ok(())
}

pub fn list(config_path: &Path) -> Result<()> {
    let config = SourcesConfig::load(config_path)?;

    if config.sources.is_empty() {
        println!("No sources configured");
        return Ok(());
    }

    for source in &config.sources {
        println!(
            "{} [{}]\n  {} - {}",
            source.id,
            source.adapter.as_str(),
            source.org,
            source.url
        );
    }

    Ok(())
}
