//! Rendering forests back to text
//!
//! Every rendering orders siblings the same way: directories first, then
//! case-insensitive name order. The order is applied while rendering, so any
//! forest can be exported as-is.

mod config;
mod map;
mod simple;
mod tree;

use std::fmt;
use std::str::FromStr;

pub use config::ExportConfig;
pub use map::{render_json, render_yaml};
pub use simple::render_simple;
pub use tree::TreeFormatter;

use crate::error::ExportError;
use crate::tree::Node;

/// The closed set of output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Box-drawing tree view.
    Tree,
    /// Two-space indented listing.
    Simple,
    Yaml,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Tree,
        ExportFormat::Simple,
        ExportFormat::Yaml,
        ExportFormat::Json,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Tree => "tree",
            ExportFormat::Simple => "simple",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tree" => Ok(ExportFormat::Tree),
            "simple" | "txt" => Ok(ExportFormat::Simple),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown export format '{}' (expected tree, simple, yaml or json)",
                other
            )),
        }
    }
}

/// Render a forest to text. The tree view is rendered without color.
pub fn render(forest: &[Node], format: ExportFormat, config: &ExportConfig) -> Result<String, ExportError> {
    match format {
        ExportFormat::Tree => {
            let config = ExportConfig {
                use_color: false,
                ..config.clone()
            };
            Ok(TreeFormatter::new(config).format(forest))
        }
        ExportFormat::Simple => Ok(render_simple(forest)),
        ExportFormat::Yaml => render_yaml(forest),
        ExportFormat::Json => render_json(forest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_roundtrip() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>(), Ok(format));
        }
        assert_eq!("YML".parse::<ExportFormat>(), Ok(ExportFormat::Yaml));
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_render_dispatch() {
        let forest = vec![Node::dir("app", vec![Node::file("main.rs")])];
        let config = ExportConfig::default();
        assert_eq!(
            render(&forest, ExportFormat::Tree, &config).unwrap(),
            "app/\n└── main.rs\n"
        );
        assert_eq!(
            render(&forest, ExportFormat::Simple, &config).unwrap(),
            "app/\n  main.rs\n"
        );
        assert_eq!(
            render(&forest, ExportFormat::Yaml, &config).unwrap(),
            "app:\n  main.rs: null\n"
        );
        assert!(render(&forest, ExportFormat::Json, &config).unwrap().ends_with("}\n"));
    }
}
