//! Sibling ordering used by every rendering

use std::cmp::Ordering;

use super::Node;

/// Directories before files, then case-insensitive name order.
pub fn render_order(a: &Node, b: &Node) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// Borrow a sibling list in render order without touching the forest.
pub fn sorted_siblings(nodes: &[Node]) -> Vec<&Node> {
    let mut sorted: Vec<&Node> = nodes.iter().collect();
    sorted.sort_by(|a, b| render_order(a, b));
    sorted
}
