//! Remote tree listings
//!
//! A hosting service describes a repository as a flat list of
//! `{path, type, size}` records (`type` is `blob` for files and `tree` for
//! directories). [`forest_from_listing`] folds such a list into a forest the
//! same way a filtered local walk would build it. Fetching the listing is
//! behind [`TreeSource`]; [`ListingFile`] reads a saved API response.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::tree::Node;

use super::{ScanConfig, ScanResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Blob,
    Tree,
    /// Submodule pointers and anything else the service may return.
    #[serde(other)]
    Other,
}

/// One record of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    #[serde(default)]
    pub size: u64,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryType::Tree
    }
}

/// A full listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub tree: Vec<RemoteEntry>,
    /// Set by the service when the listing was cut short.
    #[serde(default)]
    pub truncated: bool,
}

/// Anything that can produce a remote listing.
pub trait TreeSource {
    fn fetch(&self) -> Result<Listing, FetchError>;
}

/// A listing saved to disk, e.g. the body of a recursive tree API call.
#[derive(Debug, Clone)]
pub struct ListingFile {
    path: PathBuf,
}

impl ListingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TreeSource for ListingFile {
    fn fetch(&self) -> Result<Listing, FetchError> {
        let text = fs::read_to_string(&self.path).map_err(|source| FetchError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        listing_from_json(&text)
    }
}

/// Decode a listing body, recognising the service's error payloads.
pub(crate) fn listing_from_json(text: &str) -> Result<Listing, FetchError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if value.get("tree").is_none() {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return Err(classify_error_message(message));
        }
    }

    serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))
}

fn classify_error_message(message: &str) -> FetchError {
    let lower = message.to_lowercase();
    if lower.contains("not found") {
        FetchError::NotFound(message.to_string())
    } else if lower.contains("rate limit") {
        FetchError::RateLimited
    } else if lower.contains("forbidden") || lower.contains("private") {
        FetchError::Forbidden(message.to_string())
    } else {
        FetchError::Transport(message.to_string())
    }
}

/// Fold a listing into a forest rooted at `root_name`.
///
/// Records nested `max_depth` or more slashes deep are skipped, as is any
/// record with a path segment the filter rejects. Missing intermediate
/// segments are created as directories. The root is only emitted when it
/// received at least one child.
pub fn forest_from_listing(root_name: &str, listing: &Listing, config: &ScanConfig) -> ScanResult {
    let filter = config.filter();
    let mut result = ScanResult::default();
    let mut root = Node::dir(root_name, Vec::new());

    if listing.truncated {
        debug!("remote listing for {} is truncated", root_name);
    }

    for entry in &listing.tree {
        result.total_scanned += 1;

        let depth = entry.path.matches('/').count();
        if depth >= config.max_depth {
            result.filtered_count += 1;
            continue;
        }

        let parts: Vec<&str> = entry.path.split('/').filter(|p| !p.is_empty()).collect();
        let Some((last, ancestors)) = parts.split_last() else {
            result.filtered_count += 1;
            continue;
        };
        if filter.excludes(last, entry.is_dir())
            || ancestors.iter().any(|a| filter.excludes(a, true))
        {
            result.filtered_count += 1;
            continue;
        }

        if !insert_path(&mut root, &parts, entry.is_dir()) {
            debug!("skipping {}: conflicts with a file earlier in the listing", entry.path);
            result.filtered_count += 1;
            continue;
        }
        if entry.is_dir() {
            result.dir_count += 1;
        } else {
            result.file_count += 1;
        }
    }

    if !root.children.is_empty() {
        result.nodes.push(root);
        result.dir_count += 1;
    }

    debug!(
        "listing for {}: {} records, {} filtered",
        root_name, result.total_scanned, result.filtered_count
    );
    result
}

/// Insert one record, creating missing ancestors as directories.
///
/// Returns false without touching the tree when a segment already exists
/// with the other kind, e.g. `a/b` after a file `a`.
fn insert_path(root: &mut Node, parts: &[&str], is_dir: bool) -> bool {
    let mut current = root;
    for (i, part) in parts.iter().enumerate() {
        let wants_dir = i + 1 < parts.len() || is_dir;
        let idx = match current.children.iter().position(|c| c.name == *part) {
            Some(idx) => {
                if current.children[idx].is_dir != wants_dir {
                    return false;
                }
                idx
            }
            None => {
                current.add_child(*part, wants_dir);
                current.children.len() - 1
            }
        };
        current = &mut current.children[idx];
    }
    true
}

/// Extract `(owner, repo)` from the usual repository URL spellings.
///
/// Accepts `https://host/owner/repo`, `git@host:owner/repo.git` and bare
/// `owner/repo`.
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    let mut rest = url.trim();
    for prefix in ["https://", "http://", "git@"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }
    for host in ["github.com:", "github.com/"] {
        if let Some(stripped) = rest.strip_prefix(host) {
            rest = stripped;
        }
    }
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    let mut parts = rest.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Some((owner.to_string(), repo.to_string()))
        }
        _ => None,
    }
}
