//! Typed traffic API responses.

use serde::Deserialize;

use crate::error::{Result, TrafficError};

/// One day of traffic as reported by the API.
///
/// Counts are signed and the timestamp is kept as text so that bad values
/// surface as validation errors in the accumulator, not as parse errors here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrafficEntry {
    pub timestamp: String,
    pub count: i64,
    pub uniques: i64,
}

/// `GET /repos/{owner}/{repo}/traffic/views`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewTraffic {
    /// Views over the whole window.
    pub count: u64,
    /// Unique visitors over the whole window.
    pub uniques: u64,
    pub views: Vec<TrafficEntry>,
}

/// `GET /repos/{owner}/{repo}/traffic/clones`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloneTraffic {
    pub count: u64,
    pub uniques: u64,
    pub clones: Vec<TrafficEntry>,
}

pub(crate) fn parse_body<T: for<'de> Deserialize<'de>>(what: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| TrafficError::Parse {
        what: what.to_string(),
        source,
    })
}
