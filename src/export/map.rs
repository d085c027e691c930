//! Nested-map rendering for YAML and JSON
//!
//! Directories become maps, files become `null`. [`MapView`] serializes the
//! forest directly so entries keep render order instead of being collected
//! into an intermediate map type.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ExportError;
use crate::tree::{Node, sorted_siblings};

/// A sibling list viewed as one map level.
struct MapView<'a>(&'a [Node]);

/// The value for a single key.
struct EntryView<'a>(&'a Node);

impl Serialize for MapView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in sorted_siblings(self.0) {
            map.serialize_entry(&node.name, &EntryView(node))?;
        }
        map.end()
    }
}

impl Serialize for EntryView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_dir {
            MapView(&self.0.children).serialize(serializer)
        } else {
            serializer.serialize_unit()
        }
    }
}

pub fn render_yaml(forest: &[Node]) -> Result<String, ExportError> {
    Ok(serde_yaml::to_string(&MapView(forest))?)
}

/// Pretty JSON with two-space indentation and a trailing newline.
pub fn render_json(forest: &[Node]) -> Result<String, ExportError> {
    let mut text = serde_json::to_string_pretty(&MapView(forest))?;
    text.push('\n');
    Ok(text)
}
