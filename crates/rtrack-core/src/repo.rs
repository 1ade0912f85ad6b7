//! `owner/name` repository identifier.

use std::fmt;
use std::str::FromStr;

use crate::error::TrafficError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Path segments below the API base, e.g. `["repos", "octo", "hello"]`.
    pub fn api_segments(&self) -> [&str; 3] {
        ["repos", &self.owner, &self.name]
    }
}

/// One part of an id: ASCII letters, digits, `.`, `_` and `-`, and not a
/// dot-segment.
fn valid_part(part: &str) -> bool {
    !part.is_empty()
        && part != "."
        && part != ".."
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl FromStr for RepoId {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| TrafficError::Config(format!("repository {s:?} is not owner/name")))?;
        if !valid_part(owner) || !valid_part(name) {
            return Err(TrafficError::Config(format!(
                "repository {s:?} is not owner/name"
            )));
        }
        Ok(RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
