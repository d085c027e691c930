//! YAML layouts: nested mappings are directories, `null` or `""` are files

use serde_yaml::Value;

use crate::error::ParseError;
use crate::tree::Node;

use super::Format;
use super::map::{MapValue, Shape, forest_from_root};

impl MapValue for Value {
    fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn shape(&self) -> Shape<'_, Self> {
        match self {
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map {
                    match key.as_str() {
                        Some(k) => entries.push((k, value)),
                        None => return Shape::NonStringKey,
                    }
                }
                Shape::Map(entries)
            }
            Value::Null => Shape::File,
            Value::String(s) if s.is_empty() => Shape::File,
            Value::String(s) => Shape::Text(s),
            Value::Sequence(_) => Shape::Sequence,
            Value::Bool(_) => Shape::Scalar("boolean"),
            Value::Number(_) => Shape::Scalar("number"),
            Value::Tagged(_) => Shape::Scalar("tagged value"),
        }
    }
}

/// Parse a YAML layout into a forest.
///
/// An empty document is an empty forest. YAML has no separate literal for an
/// explicitly empty directory; `{}` and an empty mapping behave the same.
pub fn parse_yaml(text: &str) -> Result<Vec<Node>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root: Value = serde_yaml::from_str(text).map_err(|e| ParseError::Decode {
        format: Format::Yaml,
        line: e.location().map(|loc| loc.line()),
        message: e.to_string(),
    })?;
    forest_from_root(&root, Format::Yaml)
}
