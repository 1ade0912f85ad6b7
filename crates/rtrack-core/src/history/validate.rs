//! Shape/range checks on fetched entries before they reach the history.

use chrono::NaiveDate;

use crate::error::{Result, TrafficError};
use crate::fetch::TrafficEntry;

/// A fetched day that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
    pub uniques: u64,
}

/// Calendar date of an API timestamp: the part before `T`, so
/// `2024-01-01T00:00:00Z` and a bare `2024-01-01` both give 2024-01-01.
pub fn entry_date(timestamp: &str) -> Option<NaiveDate> {
    let ts = timestamp.trim();
    let day = ts.split_once('T').map_or(ts, |(d, _)| d);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Validate a whole batch. One bad entry rejects the batch, so a caller that
/// stops on the error leaves its history untouched.
pub fn validate_entries(entries: &[TrafficEntry]) -> Result<Vec<DailyCount>> {
    entries.iter().map(validate_entry).collect()
}

fn validate_entry(e: &TrafficEntry) -> Result<DailyCount> {
    let invalid = |reason: String| TrafficError::Validation {
        timestamp: e.timestamp.clone(),
        reason,
    };
    let date = entry_date(&e.timestamp).ok_or_else(|| invalid("unparseable date".to_string()))?;
    let count = u64::try_from(e.count).map_err(|_| invalid(format!("negative count {}", e.count)))?;
    let uniques =
        u64::try_from(e.uniques).map_err(|_| invalid(format!("negative uniques {}", e.uniques)))?;
    Ok(DailyCount {
        date,
        count,
        uniques,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, count: i64, uniques: i64) -> TrafficEntry {
        TrafficEntry {
            timestamp: ts.to_string(),
            count,
            uniques,
        }
    }

    #[test]
    fn entry_date_takes_prefix_before_t() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(entry_date("2024-01-02T00:00:00Z"), Some(d));
        assert_eq!(entry_date("2024-01-02"), Some(d));
        assert_eq!(entry_date("2024-01-02T23:59:59+02:00"), Some(d));
    }

    #[test]
    fn entry_date_rejects_garbage() {
        assert_eq!(entry_date(""), None);
        assert_eq!(entry_date("yesterday"), None);
        assert_eq!(entry_date("2024-02-30T00:00:00Z"), None);
        assert_eq!(entry_date("01/02/2024"), None);
    }

    #[test]
    fn validate_accepts_zero_counts() {
        let out = validate_entries(&[entry("2024-01-01T00:00:00Z", 0, 0)]).unwrap();
        assert_eq!(out[0].count, 0);
    }

    #[test]
    fn validate_rejects_negative_count() {
        let err = validate_entries(&[
            entry("2024-01-01T00:00:00Z", 3, 1),
            entry("2024-01-02T00:00:00Z", -4, 1),
        ])
        .unwrap_err();
        match err {
            TrafficError::Validation { timestamp, reason } => {
                assert_eq!(timestamp, "2024-01-02T00:00:00Z");
                assert!(reason.contains("negative count"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_negative_uniques() {
        let err = validate_entries(&[entry("2024-01-01", 1, -1)]).unwrap_err();
        assert!(matches!(err, TrafficError::Validation { ref reason, .. } if reason.contains("uniques")));
    }

    #[test]
    fn validate_rejects_bad_date() {
        let err = validate_entries(&[entry("not-a-date", 1, 1)]).unwrap_err();
        assert!(matches!(err, TrafficError::Validation { .. }));
    }
}
