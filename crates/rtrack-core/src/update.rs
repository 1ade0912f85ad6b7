//! One traffic update: load, fetch, validate, merge, persist, render.
//!
//! Fail-fast. Nothing is written until the fetch and merge have both
//! succeeded; the history is written before the badge.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

use crate::badge::{self, BadgeOptions, BadgeStyle};
use crate::config::RtrackConfig;
use crate::error::Result;
use crate::fetch::{self, TrafficSource};
use crate::history::{self, HistoryRecord};
use crate::store::{self, HistoryStore};

/// Where and how the badge is written.
#[derive(Debug, Clone)]
pub struct BadgeTarget {
    pub path: PathBuf,
    pub style: BadgeStyle,
    pub options: BadgeOptions,
}

impl BadgeTarget {
    pub fn from_config(cfg: &RtrackConfig) -> Self {
        Self {
            path: cfg.svg_file.clone(),
            style: cfg.style,
            options: BadgeOptions {
                label: cfg.label.clone(),
                chart_days: cfg.chart_days,
            },
        }
    }
}

/// What a run fetched and what the history holds afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Views reported for the remote window.
    pub window_views: u64,
    pub window_uniques: u64,
    /// Clones reported for the remote window.
    pub window_clones: u64,
    pub total_views: u64,
    pub total_uniques: u64,
    pub days_recorded: usize,
}

/// Run a full update against `source`, persisting through `store` and
/// writing the badge described by `badge`.
pub async fn run_update<S>(
    source: Arc<dyn TrafficSource>,
    store: &S,
    badge: &BadgeTarget,
    now: DateTime<Utc>,
) -> Result<UpdateSummary>
where
    S: HistoryStore + ?Sized,
{
    let existing = store.load()?;

    let (views, clones) = fetch::fetch_both(source).await?;
    tracing::info!(
        "fetched {} views ({} uniques) and {} clones in the current window",
        views.count,
        views.uniques,
        clones.count
    );

    let view_days = history::validate_entries(&views.views)?;
    let clone_days = history::validate_entries(&clones.clones)?;

    let merged = history::merge(existing, &view_days, now)?;
    let merged = history::merge_clones(merged, &clone_days)?;

    store.save(&merged)?;
    write_badge(&merged, badge)?;

    Ok(UpdateSummary {
        window_views: views.count,
        window_uniques: views.uniques,
        window_clones: clones.count,
        total_views: merged.total_views,
        total_uniques: merged.total_uniques,
        days_recorded: merged.daily.len(),
    })
}

/// Re-render the badge from stored history; no network access.
pub fn render_only<S>(store: &S, badge: &BadgeTarget) -> Result<HistoryRecord>
where
    S: HistoryStore + ?Sized,
{
    let history = store.load()?;
    write_badge(&history, badge)?;
    Ok(history)
}

fn write_badge(history: &HistoryRecord, badge: &BadgeTarget) -> Result<()> {
    let svg = badge::render(badge.style, history, &badge.options);
    store::write_atomic(&badge.path, svg.as_bytes())?;
    tracing::info!("{} badge written to {}", badge.style, badge.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrafficError;
    use crate::fetch::{CloneTraffic, TrafficEntry, ViewTraffic};
    use crate::store::JsonFileStore;
    use chrono::TimeZone;
    use std::path::Path;

    struct Canned {
        views: Vec<(&'static str, i64, i64)>,
        clones_status: Option<u32>,
    }

    fn entries(items: &[(&str, i64, i64)]) -> Vec<TrafficEntry> {
        items
            .iter()
            .map(|(t, c, u)| TrafficEntry {
                timestamp: t.to_string(),
                count: *c,
                uniques: *u,
            })
            .collect()
    }

    impl TrafficSource for Canned {
        fn fetch_views(&self) -> Result<ViewTraffic> {
            let views = entries(&self.views);
            Ok(ViewTraffic {
                count: views.iter().map(|e| e.count.max(0) as u64).sum(),
                uniques: 0,
                views,
            })
        }

        fn fetch_clones(&self) -> Result<CloneTraffic> {
            if let Some(status) = self.clones_status {
                return Err(TrafficError::Remote {
                    status,
                    body: "boom".to_string(),
                });
            }
            Ok(CloneTraffic {
                count: 1,
                uniques: 1,
                clones: entries(&[("2024-01-02T00:00:00Z", 1, 1)]),
            })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
    }

    fn target(dir: &Path) -> BadgeTarget {
        BadgeTarget {
            path: dir.join("traffic-stat.svg"),
            style: BadgeStyle::Flat,
            options: BadgeOptions::default(),
        }
    }

    #[tokio::test]
    async fn update_writes_history_and_badge() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("traffic-data.json"));
        let badge = target(dir.path());
        let source = Arc::new(Canned {
            views: vec![("2024-01-01T00:00:00Z", 9, 3), ("2024-01-02T00:00:00Z", 4, 1)],
            clones_status: None,
        });

        let summary = run_update(source.clone(), &store, &badge, now()).await.unwrap();
        assert_eq!(summary.total_views, 13);
        assert_eq!(summary.total_uniques, 4);
        assert_eq!(summary.days_recorded, 2);
        assert_eq!(summary.window_clones, 1);

        let saved = store.load().unwrap();
        assert_eq!(saved.updated_at, Some(now()));
        assert_eq!(saved.clones.as_ref().unwrap().total_clones, 1);
        let svg = std::fs::read_to_string(&badge.path).unwrap();
        assert!(svg.contains(">13</text>"));

        // Same window again: nothing double counted.
        let again = run_update(source, &store, &badge, now()).await.unwrap();
        assert_eq!(again, summary);
    }

    #[tokio::test]
    async fn failed_fetch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("traffic-data.json"));
        let badge = target(dir.path());
        let source = Arc::new(Canned {
            views: vec![("2024-01-01T00:00:00Z", 9, 3)],
            clones_status: Some(502),
        });

        let err = run_update(source, &store, &badge, now()).await.unwrap_err();
        assert!(matches!(err, TrafficError::Remote { status: 502, .. }));
        assert!(!store.path().exists());
        assert!(!badge.path.exists());
    }

    #[tokio::test]
    async fn invalid_entry_keeps_previous_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("traffic-data.json"));
        let badge = target(dir.path());
        let good = Arc::new(Canned {
            views: vec![("2024-01-01T00:00:00Z", 5, 2)],
            clones_status: None,
        });
        run_update(good, &store, &badge, now()).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let bad = Arc::new(Canned {
            views: vec![("2024-01-01T00:00:00Z", 50, 2), ("garbage", 1, 1)],
            clones_status: None,
        });
        let err = run_update(bad, &store, &badge, now()).await.unwrap_err();
        assert!(matches!(err, TrafficError::Validation { .. }));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn render_only_uses_stored_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("traffic-data.json"));
        let mut h = HistoryRecord::default();
        h.total_views = 2500;
        store.save(&h).unwrap();
        let badge = target(dir.path());
        let loaded = render_only(&store, &badge).unwrap();
        assert_eq!(loaded.total_views, 2500);
        let svg = std::fs::read_to_string(&badge.path).unwrap();
        assert!(svg.contains("2.5k"));
    }
}
