//! In-memory layout forests
//!
//! A forest is an ordered list of root [`Node`]s. Parsers and scanners build
//! forests, the validator fixes up their paths once, and the exporter and
//! generator only read them.

mod node;
mod order;

pub use node::{Node, count_kinds, count_nodes, join_path};
pub use order::{render_order, sorted_siblings};
