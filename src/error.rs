//! Error types for every stage of the layout pipeline.
//!
//! Each stage returns its own typed error so callers can tell a malformed
//! layout apart from an unsafe one or from a filesystem failure. The binary
//! converts them to [`anyhow::Error`] at the command boundary.
//!
//! ```text
//! ParseError       syntax, indentation and decoder failures (always fatal)
//! FormatError      unrecognized layout file extension
//! ValidationError  first unsafe or platform-incompatible node
//! GenerateError    target unusable, or per-node failures with the report
//! ExportError      YAML/JSON serialization failures
//! ScanError        analyzed source missing or not a directory
//! FetchError       remote tree listing failures
//! GeneralizeError  generalization collaborator failures
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::generate::GenerationReport;
use crate::parse::{Format, IndentChar};

/// A layout could not be turned into a forest.
///
/// Parsers never return a partial forest alongside this error.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed line or structural rule violation in the indentation form.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Spaces and tabs were both used for indentation in one input.
    #[error("line {line}, column {column}: inconsistent indentation: cannot mix {expected} and {found}")]
    MixedIndentation {
        line: usize,
        column: usize,
        expected: IndentChar,
        found: IndentChar,
    },

    /// Indentation is not a whole multiple of the indentation width.
    #[error("line {line}: inconsistent indentation: expected a multiple of {width} {unit}, got {found} {unit}")]
    IndentWidth {
        line: usize,
        width: usize,
        found: usize,
        unit: IndentChar,
    },

    /// A map-based layout has the wrong shape (bad root, bad value type).
    #[error("{message}")]
    Structure { message: String },

    /// The YAML or JSON decoder rejected the input.
    #[error("parsing {format}: {message}")]
    Decode {
        format: Format,
        line: Option<usize>,
        message: String,
    },

    #[error("reading input: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// The 1-indexed source line the error refers to, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::MixedIndentation { line, .. }
            | ParseError::IndentWidth { line, .. } => Some(*line),
            ParseError::Decode { line, .. } => *line,
            ParseError::Structure { .. } | ParseError::Io(_) => None,
        }
    }

    /// True for the indentation-specific errors.
    pub fn is_indentation(&self) -> bool {
        matches!(
            self,
            ParseError::MixedIndentation { .. } | ParseError::IndentWidth { .. }
        )
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        ParseError::Structure {
            message: message.into(),
        }
    }
}

/// The layout file's format could not be determined from its name.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unknown file format for {} (supported: .txt, .tree, .yaml, .yml, .json)", path.display())]
    Unrecognized { path: PathBuf },
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    DuplicatePath,
    PathTooLong,
    PathTraversal,
    InvalidCharacters,
    ReservedName,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValidationErrorKind::DuplicatePath => "duplicate-path",
            ValidationErrorKind::PathTooLong => "path-too-long",
            ValidationErrorKind::PathTraversal => "path-traversal",
            ValidationErrorKind::InvalidCharacters => "invalid-characters",
            ValidationErrorKind::ReservedName => "reserved-name",
        };
        f.write_str(label)
    }
}

/// The first node that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation error at '{path}': {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }
}

/// Generation could not complete cleanly.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The target directory itself could not be created.
    #[error("failed to create target directory {}: {source}", path.display())]
    Target { path: PathBuf, source: io::Error },

    /// Some nodes failed; the report still lists everything that was done.
    #[error("generation completed with {} errors", report.errors.len())]
    Incomplete { report: GenerationReport },
}

impl GenerateError {
    /// The partial report, if generation got as far as walking the forest.
    pub fn report(&self) -> Option<&GenerationReport> {
        match self {
            GenerateError::Target { .. } => None,
            GenerateError::Incomplete { report } => Some(report),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to marshal YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to marshal JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A local directory could not be scanned.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot access source {}: {source}", path.display())]
    Access { path: PathBuf, source: io::Error },

    #[error("source must be a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
}

/// A remote tree listing could not be obtained.
#[derive(Error, Debug)]
pub enum FetchError {
    /// A saved listing file could not be read.
    #[error("cannot read listing {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("rate limit exceeded, try again later")]
    RateLimited,

    #[error("access forbidden: {0}")]
    Forbidden(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed listing: {0}")]
    Malformed(String),
}

/// The generalization collaborator failed; callers fall back to raw output.
#[derive(Error, Debug)]
pub enum GeneralizeError {
    #[error("failed to run generalizer '{program}': {source}")]
    Spawn { program: String, source: io::Error },

    #[error("generalizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("generalizer returned no output")]
    Empty,

    #[error("generalizer output is not valid UTF-8")]
    InvalidOutput,
}
