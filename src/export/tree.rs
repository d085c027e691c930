//! Tree formatter for box-drawing output
//!
//! `TreeFormatter` renders a forest with `├──`/`└──`/`│` connectors, either
//! into a string or to stdout with colors. Siblings are ordered at render
//! time; the forest is never reordered.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::tree::{Node, count_kinds, sorted_siblings};

use super::config::ExportConfig;

/// Formatter for the box-drawing tree view.
pub struct TreeFormatter {
    config: ExportConfig,
}

impl TreeFormatter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, forest: &[Node]) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into memory cannot fail.
        let _ = self.write_forest(forest, &mut out);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    pub fn print(&self, forest: &[Node]) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_forest(forest, &mut stdout)
    }

    /// Render the forest to any color-capable writer.
    pub fn write_forest<W: WriteColor>(&self, forest: &[Node], out: &mut W) -> io::Result<()> {
        for root in sorted_siblings(forest) {
            self.write_node(root, out, "", true, true)?;
        }

        if self.config.show_summary {
            let (dir_count, file_count) = count_kinds(forest);
            writeln!(out)?;
            writeln!(out, "{} directories, {} files", dir_count, file_count)?;
        }
        Ok(())
    }

    fn write_node<W: WriteColor>(
        &self,
        node: &Node,
        out: &mut W,
        prefix: &str,
        is_last: bool,
        is_root: bool,
    ) -> io::Result<()> {
        if !is_root {
            let connector = if is_last { "└── " } else { "├── " };
            write!(out, "{}{}", prefix, connector)?;
        }

        if node.is_dir {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            write!(out, "{}/", node.name)?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
            write!(out, "{}", node.name)?;
        }
        out.reset()?;
        writeln!(out)?;

        let new_prefix = if is_root {
            String::new()
        } else if is_last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };

        let children = sorted_siblings(&node.children);
        for (i, child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            self.write_node(child, out, &new_prefix, child_is_last, false)?;
        }
        Ok(())
    }
}
