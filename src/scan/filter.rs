//! Entry filtering for directory scans
//!
//! [`should_filter`] is the fixed policy that keeps dependency folders, build
//! output, secrets and editor noise out of analyzed layouts. [`EntryFilter`]
//! layers user-supplied glob patterns on top of it.

use glob::Pattern;

/// Directories excluded by exact, case-insensitive name.
const IGNORED_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // Dependencies
    "node_modules",
    "vendor",
    "venv",
    ".venv",
    "env",
    ".env.local",
    "virtualenv",
    "bower_components",
    "jspm_packages",
    // Build output
    "dist",
    "build",
    "target",
    "out",
    "output",
    "bin",
    "obj",
    "_build",
    // Caches
    "__pycache__",
    ".cache",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".coverage",
    ".nyc_output",
    // IDEs and editors
    ".idea",
    ".vscode",
    ".vs",
    ".sublime-workspace",
    "*.xcworkspace",
    ".project",
    ".classpath",
    ".settings",
    // Temporary
    "tmp",
    "temp",
    ".tmp",
    ".temp",
    // Package managers
    ".bundle",
    ".dart_tool",
    ".packages",
    ".pub-cache",
    ".pub",
    "Pods",
    // Other
    "coverage",
    "htmlcov",
    ".hypothesis",
    ".phpunit.result.cache",
    "*.egg-info",
    ".eggs",
];

/// Files excluded by exact, case-insensitive name.
const IGNORED_FILES: &[&str] = &[
    // OS metadata
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    // Lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Gemfile.lock",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "Cargo.lock",
    "go.sum",
    // Environment files with secrets
    ".env",
    ".env.local",
    ".env.production",
    ".env.development",
];

/// File suffixes excluded case-insensitively.
const IGNORED_EXTENSIONS: &[&str] = &[
    // Binaries
    ".exe", ".dll", ".so", ".dylib", ".a", ".o", ".obj", ".class", ".jar", ".war", ".pyc", ".pyo",
    ".pyd", // Archives
    ".zip", ".tar", ".gz", ".bz2", ".7z", ".rar", // Databases
    ".db", ".sqlite", ".sqlite3", // Logs
    ".log", // Backups
    ".bak", ".backup", ".old", ".orig", "~", // Editor files
    ".iml", ".suo", ".user", ".swp", ".swo", ".swn",
];

/// Dotfiles that describe project structure and are worth keeping.
const ALLOWED_DOTFILES: &[&str] = &[
    ".gitignore",
    ".dockerignore",
    ".eslintrc",
    ".prettierrc",
    ".editorconfig",
    ".gitattributes",
    ".npmrc",
    ".nvmrc",
    ".ruby-version",
    ".python-version",
    ".tool-versions",
];

/// Generated-asset markers inside file names.
const GENERATED_MARKERS: &[&str] = &[".min.", ".bundle.", ".packed.", ".compiled."];

/// Decide whether a scanned entry is left out of the layout.
///
/// Rules apply in order and the first match wins.
pub fn should_filter(name: &str, is_dir: bool) -> bool {
    if name.is_empty() {
        return true;
    }

    let lower = name.to_lowercase();

    if is_dir {
        if IGNORED_DIRS.iter().any(|d| d.to_lowercase() == lower) {
            return true;
        }
    } else {
        if IGNORED_FILES.iter().any(|f| f.to_lowercase() == lower) {
            return true;
        }
        if IGNORED_EXTENSIONS
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
        {
            return true;
        }
    }

    if name.starts_with('.') {
        // Only files can be rescued by the allowlist.
        let allowed = !is_dir
            && ALLOWED_DOTFILES.iter().any(|a| {
                let a = a.to_lowercase();
                lower == a || lower.starts_with(&format!("{}.", a))
            });
        return !allowed;
    }

    if name.starts_with('~') || name.starts_with('#') {
        return true;
    }

    !is_dir && GENERATED_MARKERS.iter().any(|m| lower.contains(m))
}

/// The fixed policy plus extra user glob patterns matched against names.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    patterns: Vec<Pattern>,
}

impl EntryFilter {
    /// Build a filter from glob patterns; invalid patterns are dropped.
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    /// Check if an entry should be left out.
    pub fn excludes(&self, name: &str, is_dir: bool) -> bool {
        should_filter(name, is_dir) || self.patterns.iter().any(|p| p.matches(name))
    }
}
