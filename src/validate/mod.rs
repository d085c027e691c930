//! Structural and platform validation of layout forests
//!
//! [`validate`] walks the forest once in pre-order, recomputing each node's
//! path and rejecting the first node that is unsafe to create: empty names,
//! traversal attempts, control characters, platform-reserved names or
//! characters, over-long paths, and duplicate paths anywhere in the forest.

mod platform;

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::tree::{Node, join_path};

pub use platform::PlatformProfile;

/// Validate a forest against a platform profile.
///
/// Returns the first violation in traversal order. Paths of every visited
/// node are rewritten to `parent/name` along the way.
pub fn validate(forest: &mut [Node], profile: &PlatformProfile) -> Result<(), ValidationError> {
    let mut validator = Validator {
        profile,
        seen: HashSet::new(),
    };
    for root in forest.iter_mut() {
        validator.visit(root, "")?;
    }
    debug!(
        "validated {} paths against the {} profile",
        validator.seen.len(),
        profile.name
    );
    Ok(())
}

struct Validator<'a> {
    profile: &'a PlatformProfile,
    /// Normalized full paths seen so far.
    seen: HashSet<String>,
}

impl Validator<'_> {
    fn visit(&mut self, node: &mut Node, parent_path: &str) -> Result<(), ValidationError> {
        node.path = join_path(parent_path, &node.name);

        if node.name.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidCharacters,
                parent_path,
                "empty name not allowed",
            ));
        }

        self.check_name(&node.name, &node.path)?;
        self.check_length(&node.path)?;

        let key = self.profile.path_key(&node.path);
        if !self.seen.insert(key) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicatePath,
                node.path.clone(),
                "duplicate path",
            ));
        }

        let path = node.path.clone();
        for child in &mut node.children {
            self.visit(child, &path)?;
        }
        Ok(())
    }

    fn check_name(&self, name: &str, path: &str) -> Result<(), ValidationError> {
        if name == ".." || name.starts_with("../") {
            return Err(ValidationError::new(
                ValidationErrorKind::PathTraversal,
                path,
                format!("path traversal not allowed: '{}'", name),
            ));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(ValidationError::new(
                ValidationErrorKind::PathTraversal,
                path,
                format!("path separators not allowed in name: '{}'", name),
            ));
        }

        if name.contains('\0') {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidCharacters,
                path,
                "null bytes not allowed in path",
            ));
        }
        if name.chars().any(|c| (c as u32) < 32) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidCharacters,
                path,
                "control characters not allowed in paths",
            ));
        }

        let profile = self.profile;
        if profile.is_reserved(name) {
            return Err(ValidationError::new(
                ValidationErrorKind::ReservedName,
                path,
                format!("'{}' is a reserved name on {}", name, profile.name),
            ));
        }
        if let Some(c) = profile.forbidden_char(name) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidCharacters,
                path,
                format!("character '{}' not allowed in {} paths", c, profile.name),
            ));
        }
        if profile.reject_trailing_dot_or_space && (name.ends_with('.') || name.ends_with(' ')) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidCharacters,
                path,
                format!("paths cannot end with dots or spaces on {}", profile.name),
            ));
        }

        Ok(())
    }

    fn check_length(&self, path: &str) -> Result<(), ValidationError> {
        let max = self.profile.max_path_len;
        if path.len() > max {
            return Err(ValidationError::new(
                ValidationErrorKind::PathTooLong,
                path,
                format!("path length {} exceeds maximum of {}", path.len(), max),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix() -> PlatformProfile {
        PlatformProfile::unix()
    }

    fn windows() -> PlatformProfile {
        PlatformProfile::windows()
    }

    fn err_kind(forest: &mut [Node], profile: &PlatformProfile) -> ValidationErrorKind {
        validate(forest, profile).unwrap_err().kind
    }

    #[test]
    fn test_valid_forest_passes_and_paths_are_recomputed() {
        let mut src = Node::dir("src", vec![Node::file("main.rs")]);
        src.children[0].path = "stale".to_string();
        let mut forest = vec![Node::dir("app", vec![src, Node::file("README.md")])];
        forest[0].path = "wrong".to_string();

        validate(&mut forest, &unix()).unwrap();
        assert_eq!(forest[0].path, "app");
        assert_eq!(forest[0].children[0].children[0].path, "app/src/main.rs");
        assert_eq!(forest[0].children[1].path, "app/README.md");
    }

    #[test]
    fn test_empty_name() {
        let mut forest = vec![Node::dir("app", vec![Node::file("")])];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidCharacters);
        assert_eq!(err.path, "app");
    }

    #[test]
    fn test_traversal() {
        let mut forest = vec![Node::dir("app", vec![Node::file("..")])];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PathTraversal);
        assert_eq!(err.path, "app/..");

        let mut forest = vec![Node::file("../escape")];
        assert_eq!(err_kind(&mut forest, &unix()), ValidationErrorKind::PathTraversal);
    }

    #[test]
    fn test_separators_in_names() {
        let mut forest = vec![Node::file("/tmp/pwned.txt")];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PathTraversal);
        assert!(err.message.contains("path separators not allowed"));

        let mut forest = vec![Node::dir("a", vec![Node::file("x/../../../escaped.txt")])];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PathTraversal);
        assert_eq!(err.path, "a/x/../../../escaped.txt");

        let mut forest = vec![Node::file("..\\escape")];
        assert_eq!(err_kind(&mut forest, &unix()), ValidationErrorKind::PathTraversal);
        assert_eq!(err_kind(&mut forest, &windows()), ValidationErrorKind::PathTraversal);
    }

    #[test]
    fn test_control_characters() {
        let mut forest = vec![Node::file("bad\0name")];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidCharacters);
        assert!(err.message.contains("null bytes"));

        let mut forest = vec![Node::file("tab\there")];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert!(err.message.contains("control characters"));
    }

    #[test]
    fn test_windows_rules() {
        let mut forest = vec![Node::file("aux.c")];
        assert_eq!(err_kind(&mut forest, &windows()), ValidationErrorKind::ReservedName);
        validate(&mut forest, &unix()).unwrap();

        let mut forest = vec![Node::file("what?.txt")];
        assert_eq!(err_kind(&mut forest, &windows()), ValidationErrorKind::InvalidCharacters);
        validate(&mut forest, &unix()).unwrap();

        let mut forest = vec![Node::file("trailing.")];
        assert_eq!(err_kind(&mut forest, &windows()), ValidationErrorKind::InvalidCharacters);
        let mut forest = vec![Node::file("trailing ")];
        assert_eq!(err_kind(&mut forest, &windows()), ValidationErrorKind::InvalidCharacters);
    }

    #[test]
    fn test_path_length_limits() {
        let long = "x".repeat(200);
        let mut forest = vec![Node::dir(long.clone(), vec![Node::file(long.clone())])];
        let err = validate(&mut forest, &windows()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PathTooLong);
        assert!(err.message.contains("exceeds maximum of 260"));
        validate(&mut forest, &unix()).unwrap();

        let mut forest = vec![Node::file("y".repeat(4097))];
        assert_eq!(err_kind(&mut forest, &unix()), ValidationErrorKind::PathTooLong);
    }

    #[test]
    fn test_duplicate_siblings() {
        let mut forest = vec![Node::dir(
            "app",
            vec![Node::file("a.txt"), Node::file("b.txt"), Node::file("a.txt")],
        )];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicatePath);
        assert_eq!(err.path, "app/a.txt");
    }

    #[test]
    fn test_duplicate_roots_across_forest() {
        let mut forest = vec![
            Node::dir("app", vec![Node::file("x")]),
            Node::dir("app", vec![Node::file("y")]),
        ];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicatePath);
        assert_eq!(err.path, "app");
    }

    #[test]
    fn test_duplicates_are_case_insensitive_on_windows() {
        let mut forest = vec![Node::dir(
            "app",
            vec![Node::file("Readme.md"), Node::file("README.md")],
        )];
        validate(&mut forest, &unix()).unwrap();
        let err = validate(&mut forest, &windows()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicatePath);
        assert_eq!(err.path, "app/README.md");
    }

    #[test]
    fn test_first_error_wins_in_preorder() {
        let mut forest = vec![
            Node::dir("a", vec![Node::file("..")]),
            Node::file("bad\u{1}"),
        ];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PathTraversal);
    }

    #[test]
    fn test_error_display() {
        let mut forest = vec![Node::file("a"), Node::file("a")];
        let err = validate(&mut forest, &unix()).unwrap_err();
        assert_eq!(err.to_string(), "validation error at 'a': duplicate path");
    }
}
