//! Building layouts from existing directory trees
//!
//! Two sources feed the analysis side of the tool: a live walk of a local
//! directory ([`LocalScanner`]) and a flat remote tree listing
//! ([`forest_from_listing`]), fetched from GitHub ([`GitHubSource`]) or
//! read from a saved file ([`ListingFile`]). Both apply the same
//! [`EntryFilter`] and depth limit, and both report what they saw in a
//! [`ScanResult`].

pub mod filter;
mod github;
mod local;
mod remote;

pub use filter::{EntryFilter, should_filter};
pub use github::{GitHubSource, is_github_url};
pub use local::LocalScanner;
pub use remote::{EntryType, Listing, ListingFile, RemoteEntry, TreeSource, forest_from_listing, parse_repo_url};

use crate::tree::Node;

pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Configuration for directory scans.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Deepest level whose entries are listed; the root's children are level 1.
    pub max_depth: usize,
    /// Extra glob patterns matched against entry names.
    pub ignore_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            ignore_patterns: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn filter(&self) -> EntryFilter {
        EntryFilter::new(&self.ignore_patterns)
    }
}

/// The forest produced by a scan plus statistics about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub nodes: Vec<Node>,
    /// Directories kept, the emitted root included.
    pub dir_count: usize,
    pub file_count: usize,
    /// Entries dropped by the filter.
    pub filtered_count: usize,
    pub total_scanned: usize,
}
