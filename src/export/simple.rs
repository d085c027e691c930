//! Two-space indented listing, readable back by the indentation parser

use crate::tree::{Node, sorted_siblings};

const INDENT: &str = "  ";

pub fn render_simple(forest: &[Node]) -> String {
    let mut output = String::new();
    for root in sorted_siblings(forest) {
        write_node(root, 0, &mut output);
    }
    output
}

fn write_node(node: &Node, depth: usize, output: &mut String) {
    output.push_str(&INDENT.repeat(depth));
    output.push_str(&node.name);
    if node.is_dir {
        output.push('/');
    }
    output.push('\n');

    for child in sorted_siblings(&node.children) {
        write_node(child, depth + 1, output);
    }
}
