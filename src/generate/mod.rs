//! Materializing a forest on disk
//!
//! Generation is best-effort and merges with what is already there:
//! existing paths are skipped (existing directories are still descended
//! into), and a failure on one node is recorded without stopping its
//! siblings. Directories are created with mode `0755` and files with `0644`.

mod report;

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io;
use std::path::{Component, Path};

use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::tree::Node;

pub use report::GenerationReport;

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Create every node of `forest` under `target`.
///
/// The target directory is created if needed. Per-node failures are
/// collected; if any occurred the report comes back inside
/// [`GenerateError::Incomplete`].
pub fn generate(forest: &[Node], target: &Path) -> Result<GenerationReport, GenerateError> {
    ensure_dir(target).map_err(|source| GenerateError::Target {
        path: target.to_path_buf(),
        source,
    })?;
    debug!("target directory: {}", target.display());

    let mut report = GenerationReport::default();
    for root in forest {
        generate_node(root, target, &mut report);
    }

    if report.has_errors() {
        return Err(GenerateError::Incomplete { report });
    }
    Ok(report)
}

fn generate_node(node: &Node, parent: &Path, report: &mut GenerationReport) {
    // An absolute or multi-segment name would let `join` leave the target.
    if !is_single_segment(&node.name) {
        report.record_error(format!(
            "refusing to create '{}' under {}: not a single path segment",
            node.name,
            parent.display()
        ));
        return;
    }
    let full_path = parent.join(&node.name);

    if full_path.exists() {
        warn!("skip: {} (already exists)", full_path.display());
        report.record_skipped(full_path.clone());
        if node.is_dir {
            for child in &node.children {
                generate_node(child, &full_path, report);
            }
        }
        return;
    }

    if node.is_dir {
        if let Err(e) = create_dir(&full_path) {
            report.record_error(format!(
                "failed to create directory {}: {}",
                full_path.display(),
                e
            ));
            return;
        }
        debug!("create: {}/", full_path.display());
        report.record_created(full_path.clone());
        for child in &node.children {
            generate_node(child, &full_path, report);
        }
        return;
    }

    if let Some(dir) = full_path.parent() {
        if let Err(e) = ensure_dir(dir) {
            report.record_error(format!(
                "failed to create parent directory for {}: {}",
                full_path.display(),
                e
            ));
            return;
        }
    }

    match create_file(&full_path) {
        Ok(_) => {
            debug!("create: {}", full_path.display());
            report.record_created(full_path);
        }
        // Lost a race with something else creating the same path
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!("skip: {} (already exists)", full_path.display());
            report.record_skipped(full_path);
        }
        Err(e) => {
            report.record_error(format!(
                "failed to create file {}: {}",
                full_path.display(),
                e
            ));
        }
    }
}

fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Create `path` and any missing ancestors; an existing directory is fine.
fn ensure_dir(path: &Path) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("path exists but is not a directory: {}", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_dir(path),
        Err(e) => Err(e),
    }
}

fn create_dir(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}

fn create_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options.open(path)
}
