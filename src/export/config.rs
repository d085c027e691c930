//! Output configuration types

/// Configuration for the box-drawing tree view.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub use_color: bool,
    /// Append a `N directories, M files` line after the tree.
    pub show_summary: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_summary: false,
        }
    }
}

impl ExportConfig {
    /// Plain output with no summary, as used for piping and tests.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            show_summary: false,
        }
    }
}
