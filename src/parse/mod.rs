//! Layout parsing
//!
//! Three surface syntaxes produce the same forest of [`Node`]s:
//!
//! - `indent` - the indentation-based plain-text tree (`.txt`, `.tree`, stdin)
//! - `yaml` - nested YAML maps (`.yaml`, `.yml`)
//! - `json` - nested JSON objects (`.json`)
//!
//! The format set is closed, so dispatch goes through the [`Format`] enum
//! rather than a trait object.

mod indent;
mod json;
mod map;
mod yaml;

use std::fmt;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{FormatError, ParseError};
use crate::tree::{Node, count_nodes};

pub use indent::{IndentChar, parse_indented};
pub use json::parse_json;
pub use yaml::parse_yaml;

/// Supported layout formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Indented,
    Yaml,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Indented => "plain-text",
            Format::Yaml => "YAML",
            Format::Json => "JSON",
        };
        f.write_str(name)
    }
}

impl Format {
    /// Pick a format from a layout file name.
    ///
    /// `-` stands for stdin and always reads the indentation form.
    pub fn detect(path: &Path) -> Result<Format, FormatError> {
        if path.as_os_str() == "-" {
            return Ok(Format::Indented);
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "tree" => Ok(Format::Indented),
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(FormatError::Unrecognized {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Fixed indentation width for the plain-text form.
    /// `None` (or `Some(0)`) auto-detects it from the input.
    pub indent_width: Option<usize>,
}

/// Parse a layout from raw bytes.
pub fn parse_bytes(
    input: &[u8],
    format: Format,
    options: &ParseOptions,
) -> Result<Vec<Node>, ParseError> {
    let text = std::str::from_utf8(input).map_err(|e| {
        let valid = &input[..e.valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        ParseError::Decode {
            format,
            line: Some(line),
            message: "input is not valid UTF-8".to_string(),
        }
    })?;

    let forest = match format {
        Format::Indented => parse_indented(text, options)?,
        Format::Yaml => parse_yaml(text)?,
        Format::Json => parse_json(text)?,
    };

    debug!("parsed {} nodes from {} layout", count_nodes(&forest), format);
    Ok(forest)
}

/// Read a whole layout from `reader` and parse it.
pub fn parse<R: Read>(
    mut reader: R,
    format: Format,
    options: &ParseOptions,
) -> Result<Vec<Node>, ParseError> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    parse_bytes(&input, format, options)
}
