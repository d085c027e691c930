//! JSON layouts: nested objects are directories, `null` or `""` are files

use serde_json::Value;

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
            Value::Object(map) => Shape::Map(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
            Value::Null => Shape::File,
            Value::String(s) if s.is_empty() => Shape::File,
            Value::String(s) => Shape::Text(s),
            Value::Array(_) => Shape::Sequence,
            Value::Bool(_) => Shape::Scalar("boolean"),
            Value::Number(_) => Shape::Scalar("number"),
        }
    }
}

/// Parse a JSON layout into a forest.
pub fn parse_json(text: &str) -> Result<Vec<Node>, ParseError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ParseError::Decode {
        format: Format::Json,
        line: Some(e.line()).filter(|&l| l > 0),
        message: e.to_string(),
    })?;
    forest_from_root(&root, Format::Json)
}
