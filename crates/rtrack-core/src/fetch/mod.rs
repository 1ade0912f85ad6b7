//! Traffic API client.
//!
//! Uses the curl crate (libcurl) for two read-only GETs, `traffic/views` and
//! `traffic/clones`, and decodes them into typed records. Requests are
//! blocking; [`fetch_both`] runs them on Tokio's blocking pool.

mod parse;

pub use parse::{CloneTraffic, TrafficEntry, ViewTraffic};

use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::{Credentials, RtrackConfig};
use crate::error::{Result, TrafficError};

/// Source of traffic data. Implemented over HTTP by [`HttpTrafficSource`];
/// tests substitute canned data.
pub trait TrafficSource: Send + Sync {
    fn fetch_views(&self) -> Result<ViewTraffic>;
    fn fetch_clones(&self) -> Result<CloneTraffic>;
}

/// Traffic API client for one repository.
pub struct HttpTrafficSource {
    repo_base: Url,
    token: String,
    user_agent: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpTrafficSource {
    pub fn new(cfg: &RtrackConfig, creds: &Credentials) -> Result<Self> {
        if creds.token.trim().is_empty() {
            return Err(TrafficError::Config("empty API token".to_string()));
        }
        let mut base = cfg.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let mut repo_base = Url::parse(&base)
            .map_err(|e| TrafficError::Config(format!("api_base {:?}: {}", cfg.api_base, e)))?;
        repo_base
            .path_segments_mut()
            .map_err(|()| {
                TrafficError::Config(format!("api_base {:?} cannot be a base URL", cfg.api_base))
            })?
            .pop_if_empty()
            .extend(creds.repo.api_segments())
            // Trailing slash so endpoint joins stay below the repository.
            .push("");
        Ok(Self {
            repo_base,
            token: creds.token.trim().to_string(),
            user_agent: cfg.user_agent.clone(),
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.request_timeout(),
        })
    }

    /// Full URL for an endpoint below the repository, e.g. `traffic/views`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.repo_base
            .join(path)
            .map_err(|e| TrafficError::Config(format!("endpoint {path}: {e}")))
    }

    /// Performs a GET and returns the body of a 2xx response.
    fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(path)?;
        let transport = |source: curl::Error| TrafficError::Transport {
            url: url.to_string(),
            source,
        };
        tracing::debug!("GET {}", url);

        let mut body: Vec<u8> = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).map_err(transport)?;
        easy.get(true).map_err(transport)?;
        easy.follow_location(true).map_err(transport)?;
        easy.max_redirections(5).map_err(transport)?;
        easy.connect_timeout(self.connect_timeout).map_err(transport)?;
        easy.timeout(self.timeout).map_err(transport)?;
        easy.useragent(&self.user_agent).map_err(transport)?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: token {}", self.token))
            .map_err(transport)?;
        list.append("Accept: application/vnd.github.v3+json")
            .map_err(transport)?;
        easy.http_headers(list).map_err(transport)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform().map_err(transport)?;
        }

        let code = easy.response_code().map_err(transport)?;
        if !(200..300).contains(&code) {
            let body = String::from_utf8_lossy(&body).trim().to_string();
            tracing::warn!("GET {} returned HTTP {}", url, code);
            return Err(TrafficError::Remote { status: code, body });
        }
        tracing::debug!("GET {} -> {} ({} bytes)", url, code, body.len());
        Ok(body)
    }
}

impl TrafficSource for HttpTrafficSource {
    fn fetch_views(&self) -> Result<ViewTraffic> {
        let body = self.get("traffic/views")?;
        parse::parse_body("traffic/views response", &body)
    }

    fn fetch_clones(&self) -> Result<CloneTraffic> {
        let body = self.get("traffic/clones")?;
        parse::parse_body("traffic/clones response", &body)
    }
}

/// Fetch views and clones concurrently; fails if either request fails.
pub async fn fetch_both(source: Arc<dyn TrafficSource>) -> Result<(ViewTraffic, CloneTraffic)> {
    let views_src = Arc::clone(&source);
    let views = tokio::task::spawn_blocking(move || views_src.fetch_views());
    let clones = tokio::task::spawn_blocking(move || source.fetch_clones());
    let (views, clones) = tokio::join!(views, clones);
    // Blocking tasks are never aborted, so a join error is always a panic.
    let views = views.unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;
    let clones = clones.unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;
    Ok((views, clones))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(repo: &str, token: &str) -> Credentials {
        Credentials {
            repo: repo.parse().unwrap(),
            token: token.to_string(),
        }
    }

    #[test]
    fn endpoint_joins_repo_path() {
        let src = HttpTrafficSource::new(&RtrackConfig::default(), &creds("octo/hello", "t")).unwrap();
        assert_eq!(
            src.endpoint("traffic/views").unwrap().as_str(),
            "https://api.github.com/repos/octo/hello/traffic/views"
        );
    }

    #[test]
    fn endpoint_keeps_enterprise_prefix() {
        let cfg = RtrackConfig {
            api_base: "https://ghe.example.com/api/v3".to_string(),
            ..RtrackConfig::default()
        };
        let src = HttpTrafficSource::new(&cfg, &creds("octo/hello", "t")).unwrap();
        assert_eq!(
            src.endpoint("traffic/clones").unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/octo/hello/traffic/clones"
        );
    }

    #[test]
    fn repo_segments_are_encoded_not_resolved() {
        let mut creds = creds("octo/hello", "t");
        creds.repo.name = "a?b".to_string();
        let src = HttpTrafficSource::new(&RtrackConfig::default(), &creds).unwrap();
        assert_eq!(
            src.endpoint("traffic/views").unwrap().as_str(),
            "https://api.github.com/repos/octo/a%3Fb/traffic/views"
        );
    }

    #[test]
    fn empty_token_is_config_error() {
        let err = HttpTrafficSource::new(&RtrackConfig::default(), &creds("octo/hello", "  "))
            .err()
            .unwrap();
        assert!(matches!(err, TrafficError::Config(_)));
    }

    #[test]
    fn invalid_api_base_is_config_error() {
        let cfg = RtrackConfig {
            api_base: "not a url".to_string(),
            ..RtrackConfig::default()
        };
        let err = HttpTrafficSource::new(&cfg, &creds("octo/hello", "t")).err().unwrap();
        assert!(matches!(err, TrafficError::Config(_)));
    }
}
