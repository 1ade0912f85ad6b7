//! Daily traffic history and the merge that keeps it.
//!
//! The history is a date-keyed map plus totals derived from it. Fetched
//! windows overlap from run to run, so a date seen again overwrites its old
//! record and the totals are always summed from the whole map. Merging the
//! same window twice therefore changes nothing.
//!
//! `total_uniques` is a sum of per-day unique counts ("cumulative daily
//! uniques"). A visitor active on several days is counted once per day, so
//! it is not a deduplicated visitor count.

mod validate;

pub use validate::{entry_date, validate_entries, DailyCount};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TrafficError};

/// A total that does not fit in `u64`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} total overflows u64")]
pub struct TotalsOverflow(pub &'static str);

fn checked_sum(what: &'static str, mut values: impl Iterator<Item = u64>) -> Result<u64, TotalsOverflow> {
    values.try_fold(0u64, u64::checked_add).ok_or(TotalsOverflow(what))
}

/// Views on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayRecord {
    pub views: u64,
    pub uniques: u64,
}

/// Clones on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CloneDay {
    pub clones: u64,
    pub uniques: u64,
}

/// Clone counts, kept alongside views. Older history files lack it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CloneHistory {
    #[serde(default)]
    pub total_clones: u64,
    #[serde(default)]
    pub total_uniques: u64,
    #[serde(default)]
    pub daily: BTreeMap<NaiveDate, CloneDay>,
}

/// The persisted history document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Sum of `daily[*].views`.
    #[serde(default)]
    pub total_views: u64,
    /// Sum of `daily[*].uniques` (cumulative daily uniques).
    #[serde(default)]
    pub total_uniques: u64,
    #[serde(default)]
    pub daily: BTreeMap<NaiveDate, DayRecord>,
    /// Time of the last successful update; absent before the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clones: Option<CloneHistory>,
}

impl HistoryRecord {
    /// Recompute both totals from the full daily map (views and clones).
    /// On overflow the record is left unchanged.
    pub fn recompute_totals(&mut self) -> Result<(), TotalsOverflow> {
        let views = checked_sum("views", self.daily.values().map(|d| d.views))?;
        let uniques = checked_sum("uniques", self.daily.values().map(|d| d.uniques))?;
        let clone_totals = match &self.clones {
            Some(c) => Some((
                checked_sum("clones", c.daily.values().map(|d| d.clones))?,
                checked_sum("clone uniques", c.daily.values().map(|d| d.uniques))?,
            )),
            None => None,
        };
        self.total_views = views;
        self.total_uniques = uniques;
        if let (Some(clones), Some((total, uniques))) = (self.clones.as_mut(), clone_totals) {
            clones.total_clones = total;
            clones.total_uniques = uniques;
        }
        Ok(())
    }

    /// True when the stored totals match the daily maps. A map whose sum
    /// overflows is never consistent.
    pub fn totals_consistent(&self) -> bool {
        let mut fresh = self.clone();
        fresh.recompute_totals().is_ok()
            && fresh.total_views == self.total_views
            && fresh.total_uniques == self.total_uniques
            && fresh.clones == self.clones
    }

    /// The last `n` recorded days of views, oldest first.
    pub fn recent_days(&self, n: usize) -> Vec<(NaiveDate, DayRecord)> {
        let mut days: Vec<_> = self.daily.iter().rev().take(n).map(|(d, r)| (*d, *r)).collect();
        days.reverse();
        days
    }

    /// First and last recorded dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.daily.keys().next()?;
        let last = self.daily.keys().next_back()?;
        Some((*first, *last))
    }
}

/// Merge a validated views window into `history` and stamp `updated_at`.
///
/// Each entry overwrites whatever was recorded for its date; totals are then
/// recomputed over every recorded day. Takes the history by value; a batch
/// that would overflow a total is rejected with [`TrafficError::Validation`].
pub fn merge(
    mut history: HistoryRecord,
    entries: &[DailyCount],
    now: DateTime<Utc>,
) -> Result<HistoryRecord> {
    for e in entries {
        history.daily.insert(
            e.date,
            DayRecord {
                views: e.count,
                uniques: e.uniques,
            },
        );
    }
    history
        .recompute_totals()
        .map_err(|e| overflow_error(entries, e))?;
    history.updated_at = Some(now);
    Ok(history)
}

/// Merge a validated clones window into the clone section, creating it on
/// first use. Same overwrite-by-date rule as [`merge`]; `updated_at` is left
/// to the views merge.
pub fn merge_clones(mut history: HistoryRecord, entries: &[DailyCount]) -> Result<HistoryRecord> {
    let clones = history.clones.get_or_insert_with(CloneHistory::default);
    for e in entries {
        clones.daily.insert(
            e.date,
            CloneDay {
                clones: e.count,
                uniques: e.uniques,
            },
        );
    }
    history
        .recompute_totals()
        .map_err(|e| overflow_error(entries, e))?;
    Ok(history)
}

fn overflow_error(entries: &[DailyCount], e: TotalsOverflow) -> TrafficError {
    let timestamp = match (entries.first(), entries.last()) {
        (Some(a), Some(b)) if a.date != b.date => format!("{}..{}", a.date, b.date),
        (Some(a), _) => a.date.to_string(),
        _ => String::new(),
    };
    TrafficError::Validation {
        timestamp,
        reason: e.to_string(),
    }
}
