//! Persistence of the history record and the generated badge.
//!
//! The history is a single JSON document at a fixed path. Writes go to a
//! temp file in the target directory and are renamed into place, so an
//! interrupted run leaves the previous file intact.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrafficError};
use crate::history::HistoryRecord;

/// Load/save of the single history record.
pub trait HistoryStore {
    /// The stored history, or an empty one if nothing has been stored yet.
    fn load(&self) -> Result<HistoryRecord>;
    fn save(&self, history: &HistoryRecord) -> Result<()>;
}

/// History kept as pretty-printed JSON in one file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<HistoryRecord> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no history at {}, starting fresh", self.path.display());
                return Ok(HistoryRecord::default());
            }
            Err(e) => return Err(TrafficError::io("read history", &self.path, e)),
        };
        let history: HistoryRecord =
            serde_json::from_slice(&bytes).map_err(|source| TrafficError::Parse {
                what: format!("history file {}", self.path.display()),
                source,
            })?;
        let mut recomputed = history.clone();
        recomputed
            .recompute_totals()
            .map_err(|e| TrafficError::Parse {
                what: format!("history file {}", self.path.display()),
                source: serde::de::Error::custom(e),
            })?;
        if recomputed != history {
            tracing::warn!(
                "stored totals in {} disagree with daily records; they will be recomputed",
                self.path.display()
            );
        }
        tracing::debug!(
            "loaded history: {} days, {} views",
            history.daily.len(),
            history.total_views
        );
        Ok(history)
    }

    fn save(&self, history: &HistoryRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(history).map_err(|source| TrafficError::Parse {
            what: "serialize history".to_string(),
            source,
        })?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::info!("history saved to {}", self.path.display());
        Ok(())
    }
}

/// Write `contents` to `path` via a temp file in the same directory and a rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| TrafficError::io("create dir", &dir, e))?;
    let mut tmp =
        tempfile::NamedTempFile::new_in(&dir).map_err(|e| TrafficError::io("create temp file in", &dir, e))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.flush())
        .map_err(|e| TrafficError::io("write", tmp.path().to_path_buf(), e))?;
    tmp.persist(path)
        .map_err(|e| TrafficError::io("replace", path, e.error))?;
    Ok(())
}
