//! LocalScanner - builds a layout forest from a live directory

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ScanError;
use crate::tree::{Node, join_path};

use super::filter::EntryFilter;
use super::{ScanConfig, ScanResult};

/// Depth-limited, filtered walk of a local directory.
pub struct LocalScanner {
    config: ScanConfig,
    filter: EntryFilter,
}

impl LocalScanner {
    pub fn new(config: ScanConfig) -> Self {
        let filter = config.filter();
        Self { config, filter }
    }

    /// Scan `source` into a single-root forest named after the directory.
    pub fn scan(&self, source: &Path) -> Result<ScanResult, ScanError> {
        let meta = fs::metadata(source).map_err(|e| ScanError::Access {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory {
                path: source.to_path_buf(),
            });
        }

        let root_name = root_name(source);
        let mut result = ScanResult::default();
        let children = self.walk_dir(source, &root_name, 1, &mut result);

        // An empty directory still yields its root so the layout is not blank.
        if !children.is_empty() || (result.dir_count == 0 && result.file_count == 0) {
            result.nodes.push(Node {
                path: root_name.clone(),
                name: root_name,
                is_dir: true,
                children,
                line: None,
            });
            result.dir_count += 1;
        }

        debug!(
            "scanned {} entries under {}, kept {} directories and {} files",
            result.total_scanned,
            source.display(),
            result.dir_count,
            result.file_count
        );
        Ok(result)
    }

    fn walk_dir(
        &self,
        dir: &Path,
        parent_path: &str,
        depth: usize,
        result: &mut ScanResult,
    ) -> Vec<Node> {
        if depth > self.config.max_depth {
            return Vec::new();
        }

        // Unreadable directories are left empty rather than failing the scan.
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                debug!("skipping unreadable directory {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
        entries.sort_by_key(|e| e.file_name());

        let mut nodes = Vec::new();
        for entry in entries {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            // Skip symlinks to avoid cycles and escaping the scanned tree
            if file_type.is_symlink() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = file_type.is_dir();
            result.total_scanned += 1;

            if self.filter.excludes(&name, is_dir) {
                result.filtered_count += 1;
                continue;
            }

            let path = join_path(parent_path, &name);
            if is_dir {
                result.dir_count += 1;
                let children = self.walk_dir(&entry.path(), &path, depth + 1, result);
                nodes.push(Node {
                    name,
                    is_dir: true,
                    path,
                    children,
                    line: None,
                });
            } else {
                result.file_count += 1;
                nodes.push(Node {
                    name,
                    is_dir: false,
                    path,
                    children: Vec::new(),
                    line: None,
                });
            }
        }
        nodes
    }
}

/// Base name of the scanned directory, resolving `.` and `/` to something readable.
fn root_name(source: &Path) -> String {
    if let Some(name) = source.file_name() {
        return name.to_string_lossy().to_string();
    }
    fs::canonicalize(source)
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| source.to_string_lossy().to_string())
}
