//! Shared tree construction for the map-based formats (YAML and JSON)
//!
//! Both decoders produce a dynamic value tree. [`MapValue`] classifies a
//! decoded value into the handful of shapes a layout cares about, so the
//! recursion below is written once for both formats.

use crate::error::ParseError;
use crate::tree::{Node, join_path};

use super::Format;

/// How a decoded value maps onto a layout entry.
pub(crate) enum Shape<'a, V> {
    /// Nested map: a directory with these entries.
    Map(Vec<(&'a str, &'a V)>),
    /// `null` or `""`: a file.
    File,
    /// A map whose keys are not all strings.
    NonStringKey,
    /// A non-empty string.
    Text(&'a str),
    /// An array or sequence.
    Sequence,
    /// Any other scalar, labelled with its type name.
    Scalar(&'static str),
}

pub(crate) trait MapValue: Sized {
    fn is_null(&self) -> bool;
    fn shape(&self) -> Shape<'_, Self>;
}

/// Build a forest from a decoded document root.
///
/// A null root (empty document) yields an empty forest; any root other than
/// a map is rejected.
pub(crate) fn forest_from_root<V: MapValue>(root: &V, format: Format) -> Result<Vec<Node>, ParseError> {
    if root.is_null() {
        return Ok(Vec::new());
    }

    match root.shape() {
        Shape::Map(entries) => build_entries(entries, "", format),
        Shape::Sequence => Err(ParseError::structure(format!(
            "{} root must be an object, not an array",
            format
        ))),
        Shape::NonStringKey => Err(ParseError::structure(format!(
            "non-string key at the {} root",
            format
        ))),
        Shape::Text(_) | Shape::File => Err(ParseError::structure(format!(
            "unexpected {} root type: string",
            format
        ))),
        Shape::Scalar(kind) => Err(ParseError::structure(format!(
            "unexpected {} root type: {}",
            format, kind
        ))),
    }
}

/// Turn one map level into sibling nodes, in sorted key order.
fn build_entries<V: MapValue>(
    mut entries: Vec<(&str, &V)>,
    parent_path: &str,
    format: Format,
) -> Result<Vec<Node>, ParseError> {
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut nodes = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        check_key(name, parent_path, format)?;
        let path = join_path(parent_path, name);

        let node = match value.shape() {
            Shape::Map(children) => Node {
                name: name.to_string(),
                is_dir: true,
                children: build_entries(children, &path, format)?,
                path,
                line: None,
            },
            Shape::File => Node {
                name: name.to_string(),
                is_dir: false,
                path,
                children: Vec::new(),
                line: None,
            },
            Shape::Text(text) => {
                return Err(ParseError::structure(format!(
                    "unexpected string value for '{}': files should have null or empty string value, got {:?}",
                    name, text
                )));
            }
            Shape::Sequence => return Err(unexpected_type(name, "array")),
            Shape::Scalar(kind) => return Err(unexpected_type(name, kind)),
            Shape::NonStringKey => {
                return Err(ParseError::structure(format!(
                    "non-string key in {} at '{}'",
                    format, name
                )));
            }
        };
        nodes.push(node);
    }

    Ok(nodes)
}

/// Keys are single path segments, like names in the indentation form.
fn check_key(name: &str, parent_path: &str, format: Format) -> Result<(), ParseError> {
    if name.is_empty() {
        let location = if parent_path.is_empty() { "the root" } else { parent_path };
        return Err(ParseError::structure(format!(
            "empty key in {} at {}",
            format, location
        )));
    }
    if name.contains('/') {
        return Err(ParseError::structure(format!(
            "invalid key '{}': names cannot contain '/'",
            name
        )));
    }
    Ok(())
}

fn unexpected_type(name: &str, kind: &str) -> ParseError {
    ParseError::structure(format!(
        "unexpected value type for '{}': {} (use null for files, {{}} for directories)",
        name, kind
    ))
}
