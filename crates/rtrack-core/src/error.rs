//! Error type shared by the fetcher, accumulator, store and badge writer.
//!
//! Every variant is terminal for a run: nothing here is retried, and the
//! CLI reports the message and exits non-zero.

use std::path::PathBuf;

/// Failure of one step of a traffic update.
#[derive(Debug, thiserror::Error)]
pub enum TrafficError {
    /// Missing credential, malformed repository id, or unreadable config.
    /// Raised before any network I/O.
    #[error("config: {0}")]
    Config(String),

    /// The traffic API answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Remote { status: u32, body: String },

    /// The request never produced a response (connect failure, timeout, TLS).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// A body (remote response or local history file) is not the expected JSON.
    #[error("parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A fetched day entry failed shape/range checks.
    #[error("invalid traffic entry {timestamp:?}: {reason}")]
    Validation { timestamp: String, reason: String },

    /// Local file read/write failure.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrafficError {
    /// True for the two variants that originate on the remote side.
    pub fn is_remote(&self) -> bool {
        matches!(self, TrafficError::Remote { .. } | TrafficError::Transport { .. })
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrafficError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TrafficError> = std::result::Result<T, E>;
