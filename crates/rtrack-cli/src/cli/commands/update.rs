//! `rtrack update` – fetch traffic, merge into history, regenerate the badge.

use anyhow::{Context, Result};
use rtrack_core::config::{Credentials, RtrackConfig};
use rtrack_core::fetch::HttpTrafficSource;
use rtrack_core::store::JsonFileStore;
use rtrack_core::update::{self, BadgeTarget};
use std::sync::Arc;

pub async fn run_update(cfg: &RtrackConfig, repo: Option<&str>) -> Result<()> {
    // Credential check comes before any I/O.
    let creds = Credentials::from_env(repo)?;
    println!("Fetching traffic data for {}...", creds.repo);

    let source = HttpTrafficSource::new(cfg, &creds)?;
    let store = JsonFileStore::new(&cfg.data_file);
    let badge = BadgeTarget::from_config(cfg);

    let summary = update::run_update(Arc::new(source), &store, &badge, chrono::Utc::now())
        .await
        .with_context(|| format!("update traffic for {}", creds.repo))?;

    println!(
        "Fetched: {} views ({} uniques), {} clones in the current window.",
        summary.window_views, summary.window_uniques, summary.window_clones
    );
    println!(
        "History: {} days, {} views, {} cumulative daily uniques.",
        summary.days_recorded, summary.total_views, summary.total_uniques
    );
    println!("Updated data saved to {}", cfg.data_file.display());
    println!("SVG badge generated at {}", cfg.svg_file.display());
    Ok(())
}
