//! Scaffold - compile directory layouts into real directory trees
//!
//! A layout (indented text, YAML or JSON) is parsed into a forest of
//! [`Node`]s, validated against a [`PlatformProfile`], and generated on disk
//! with merge semantics. The analysis side scans existing trees and exports
//! them back to any layout format.

pub mod error;
pub mod export;
pub mod generalize;
pub mod generate;
pub mod parse;
pub mod scan;
pub mod tree;
pub mod validate;

pub use error::{
    ExportError, FetchError, FormatError, GenerateError, GeneralizeError, ParseError, ScanError,
    ValidationError, ValidationErrorKind,
};
pub use export::{ExportConfig, ExportFormat, TreeFormatter, render};
pub use generalize::{CommandGeneralizer, Generalizer, generalize_or_raw};
pub use generate::{GenerationReport, generate};
pub use parse::{Format, ParseOptions, parse, parse_bytes};
pub use scan::{LocalScanner, ScanConfig, ScanResult, forest_from_listing, should_filter};
pub use tree::Node;
pub use validate::{PlatformProfile, validate};
