//! `rtrack status` – show totals and recent days of the stored history.

use anyhow::Result;
use rtrack_core::config::RtrackConfig;
use rtrack_core::history::HistoryRecord;
use rtrack_core::store::{HistoryStore, JsonFileStore};

pub fn run_status(cfg: &RtrackConfig, days: usize) -> Result<()> {
    let history = JsonFileStore::new(&cfg.data_file).load()?;
    print!("{}", format_status(&history, days));
    Ok(())
}

pub(crate) fn format_status(history: &HistoryRecord, days: usize) -> String {
    if history.daily.is_empty() {
        return "No traffic recorded yet.\n".to_string();
    }
    let mut out = String::new();
    out.push_str(&format!("Total views:              {}\n", history.total_views));
    out.push_str(&format!("Cumulative daily uniques: {}\n", history.total_uniques));
    if let Some(c) = &history.clones {
        out.push_str(&format!(
            "Total clones:             {} ({} cumulative daily uniques)\n",
            c.total_clones, c.total_uniques
        ));
    }
    if let Some((first, last)) = history.date_range() {
        out.push_str(&format!(
            "Recorded days:            {} ({} to {})\n",
            history.daily.len(),
            first,
            last
        ));
    }
    if let Some(t) = history.updated_at {
        out.push_str(&format!("Last update:              {}\n", t.to_rfc3339()));
    }
    out.push('\n');
    out.push_str(&format!("{:<12} {:>8} {:>8}\n", "DATE", "VIEWS", "UNIQUES"));
    for (date, day) in history.recent_days(days) {
        out.push_str(&format!(
            "{:<12} {:>8} {:>8}\n",
            date.to_string(),
            day.views,
            day.uniques
        ));
    }
    out
}
