//! What a generation run did

use std::io::{self, Write};
use std::path::PathBuf;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Accumulated outcome of [`generate`](super::generate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub created_paths: Vec<PathBuf>,
    /// Paths that already existed and were left untouched.
    pub skipped_paths: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl GenerationReport {
    pub fn created(&self) -> usize {
        self.created_paths.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped_paths.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn record_created(&mut self, path: PathBuf) {
        self.created_paths.push(path);
    }

    pub(crate) fn record_skipped(&mut self, path: PathBuf) {
        self.skipped_paths.push(path);
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn print_summary(&self, use_color: bool) -> io::Result<()> {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_summary(&mut stdout)
    }

    pub fn write_summary<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Summary:")?;
        write_count(out, "Created:", self.created(), Color::Green)?;
        write_count(out, "Skipped:", self.skipped(), Color::Yellow)?;
        if self.has_errors() {
            write_count(out, "Errors: ", self.errors.len(), Color::Red)?;
            for error in &self.errors {
                writeln!(out, "    - {}", error)?;
            }
        }
        Ok(())
    }
}

fn write_count<W: WriteColor>(out: &mut W, label: &str, count: usize, color: Color) -> io::Result<()> {
    write!(out, "  ")?;
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", label)?;
    out.reset()?;
    writeln!(out, " {}", count)
}
