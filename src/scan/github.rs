//! Tree listings fetched live from the GitHub API
//!
//! One unauthenticated call to the recursive trees endpoint returns the
//! whole repository as `{path, type, size}` records. Unauthenticated clients
//! get 60 requests an hour.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::FetchError;

use super::remote::{Listing, TreeSource, listing_from_json, parse_repo_url};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("scaffold/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);
/// Recursive listings of large repositories run to tens of megabytes.
const MAX_BODY: u64 = 64 * 1024 * 1024;

/// True for the GitHub URL spellings `analyze` fetches remotely.
pub fn is_github_url(source: &str) -> bool {
    let lower = source.to_lowercase();
    ["https://github.com/", "http://github.com/", "github.com/", "git@github.com:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// A repository on github.com.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    owner: String,
    repo: String,
}

impl GitHubSource {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        parse_repo_url(url).map(|(owner, repo)| Self::new(owner, repo))
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn tree_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/HEAD?recursive=1",
            API_BASE, self.owner, self.repo
        )
    }
}

impl TreeSource for GitHubSource {
    fn fetch(&self) -> Result<Listing, FetchError> {
        let config = Agent::config_builder()
            .timeout_global(Some(TIMEOUT))
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();

        let url = self.tree_url();
        debug!("fetching {}", url);
        let mut response = agent
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let rate_remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY)
            .read_to_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        listing_from_response(self, status, rate_remaining.as_deref(), &body)
    }
}

/// Interpret a trees API response by status code.
fn listing_from_response(
    source: &GitHubSource,
    status: u16,
    rate_remaining: Option<&str>,
    body: &str,
) -> Result<Listing, FetchError> {
    match status {
        200 => listing_from_json(body),
        404 => Err(FetchError::NotFound(format!(
            "{}/{}",
            source.owner, source.repo
        ))),
        403 if rate_remaining == Some("0") => Err(FetchError::RateLimited),
        403 => Err(FetchError::Forbidden(
            "repository might be private".to_string(),
        )),
        other => Err(FetchError::Transport(format!(
            "GitHub API error (status {}): {}",
            other,
            body.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GitHubSource {
        GitHubSource::new("owner", "repo")
    }

    #[test]
    fn test_is_github_url() {
        assert!(is_github_url("https://github.com/owner/repo"));
        assert!(is_github_url("HTTP://GitHub.com/owner/repo"));
        assert!(is_github_url("github.com/owner/repo"));
        assert!(is_github_url("git@github.com:owner/repo.git"));
        assert!(!is_github_url("owner/repo"));
        assert!(!is_github_url("./github.com"));
        assert!(!is_github_url("https://gitlab.com/owner/repo"));
    }

    #[test]
    fn test_from_url() {
        let source = GitHubSource::from_url("https://github.com/someone/widget.git").unwrap();
        assert_eq!(source.repo(), "widget");
        assert_eq!(
            source.tree_url(),
            "https://api.github.com/repos/someone/widget/git/trees/HEAD?recursive=1"
        );
        assert!(GitHubSource::from_url("https://github.com/someone").is_none());
    }

    #[test]
    fn test_ok_response_decodes_listing() {
        let body = r#"{"tree": [{"path": "src", "type": "tree"}], "truncated": true}"#;
        let listing = listing_from_response(&source(), 200, Some("59"), body).unwrap();
        assert_eq!(listing.tree.len(), 1);
        assert!(listing.truncated);
    }

    #[test]
    fn test_status_codes_map_to_errors() {
        match listing_from_response(&source(), 404, None, "") {
            Err(FetchError::NotFound(name)) => assert_eq!(name, "owner/repo"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            listing_from_response(&source(), 403, Some("0"), ""),
            Err(FetchError::RateLimited)
        ));
        assert!(matches!(
            listing_from_response(&source(), 403, Some("12"), ""),
            Err(FetchError::Forbidden(_))
        ));
        assert!(matches!(
            listing_from_response(&source(), 403, None, ""),
            Err(FetchError::Forbidden(_))
        ));
        match listing_from_response(&source(), 502, None, " bad gateway\n") {
            Err(FetchError::Transport(msg)) => {
                assert_eq!(msg, "GitHub API error (status 502): bad gateway")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_error_messages() {
        let err = listing_from_response(&source(), 404, None, "").unwrap_err();
        assert_eq!(err.to_string(), "repository not found: owner/repo");
        let err = listing_from_response(&source(), 403, Some("0"), "").unwrap_err();
        assert_eq!(err.to_string(), "rate limit exceeded, try again later");
    }
}
