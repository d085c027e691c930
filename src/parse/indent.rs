//! Parser for the indentation-based plain-text tree form
//!
//! ```text
//! # comment
//! app/
//!   src/
//!     main.go
//!   README.md
//! ```
//!
//! A trailing `/` marks a directory. Nesting is expressed purely by leading
//! whitespace, which must be all spaces or all tabs across the whole input.

use std::fmt;

use tracing::debug;

use crate::error::ParseError;
use crate::tree::{Node, join_path};

use super::ParseOptions;

const DEFAULT_INDENT_WIDTH: usize = 2;

/// Character used for indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChar {
    Space,
    Tab,
}

impl IndentChar {
    fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(IndentChar::Space),
            '\t' => Some(IndentChar::Tab),
            _ => None,
        }
    }
}

impl fmt::Display for IndentChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentChar::Space => f.write_str("spaces"),
            IndentChar::Tab => f.write_str("tabs"),
        }
    }
}

/// A non-blank, non-comment input line.
#[derive(Debug)]
struct Line<'a> {
    number: usize,
    indent: usize,
    name: &'a str,
    is_dir: bool,
}

/// Parse the plain-text tree form into a forest.
pub fn parse_indented(text: &str, options: &ParseOptions) -> Result<Vec<Node>, ParseError> {
    let (lines, unit) = classify_lines(text)?;
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let width = match options.indent_width.filter(|&w| w > 0) {
        Some(w) => w,
        None => {
            let w = detect_width(&lines);
            debug!("detected indentation width {}", w);
            w
        }
    };

    build_forest(&lines, width, unit.unwrap_or(IndentChar::Space))
}

/// Drop blank lines and comments, measure indentation, and split off the
/// directory marker.
///
/// Also returns the indentation character the input settled on, if any line
/// was indented at all.
fn classify_lines(text: &str) -> Result<(Vec<Line<'_>>, Option<IndentChar>), ParseError> {
    let mut lines = Vec::new();
    let mut indent_char: Option<IndentChar> = None;

    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let mut indent = 0;
        for (col, c) in raw.chars().enumerate() {
            let Some(found) = IndentChar::from_char(c) else {
                break;
            };
            match indent_char {
                None => indent_char = Some(found),
                Some(expected) if expected != found => {
                    return Err(ParseError::MixedIndentation {
                        line: number,
                        column: col + 1,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            indent += 1;
        }

        let (name, is_dir) = match content.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (content, false),
        };

        if name.is_empty() {
            return Err(ParseError::syntax(number, "empty name after trimming"));
        }
        if name.contains('/') {
            return Err(ParseError::syntax(
                number,
                format!(
                    "invalid name '{}': names cannot contain '/' except at the end for directories",
                    name
                ),
            ));
        }

        lines.push(Line {
            number,
            indent,
            name,
            is_dir,
        });
    }

    Ok((lines, indent_char))
}

/// The first positive indentation step between consecutive lines.
fn detect_width(lines: &[Line<'_>]) -> usize {
    lines
        .windows(2)
        .find_map(|pair| pair[1].indent.checked_sub(pair[0].indent).filter(|&d| d > 0))
        .unwrap_or(DEFAULT_INDENT_WIDTH)
}

/// Assemble lines into a forest using a stack of open nodes, one per depth.
///
/// `stack[d]` is the most recent node at depth `d`. A node is attached to its
/// parent (or to the roots) when it is popped, which keeps ownership strictly
/// top-down and preserves sibling order.
fn build_forest(lines: &[Line<'_>], width: usize, unit: IndentChar) -> Result<Vec<Node>, ParseError> {
    if let Some(first) = lines.first() {
        if first.indent > 0 {
            return Err(ParseError::syntax(first.number, "first line must not be indented"));
        }
    }

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Node> = Vec::new();

    for line in lines {
        if line.indent % width != 0 {
            return Err(ParseError::IndentWidth {
                line: line.number,
                width,
                found: line.indent,
                unit,
            });
        }
        let depth = line.indent / width;

        close_to_depth(&mut stack, &mut roots, depth);

        if depth > stack.len() {
            return Err(ParseError::syntax(
                line.number,
                format!(
                    "invalid indentation: jumped from level {} to {} (can only increase by 1)",
                    stack.len().saturating_sub(1),
                    depth
                ),
            ));
        }

        let path = match stack.last() {
            Some(parent) if depth > 0 => {
                if !parent.is_dir {
                    return Err(ParseError::syntax(
                        line.number,
                        format!(
                            "cannot add children to file '{}' (only directories can have children)",
                            parent.name
                        ),
                    ));
                }
                join_path(&parent.path, line.name)
            }
            _ => line.name.to_string(),
        };

        stack.push(Node {
            name: line.name.to_string(),
            is_dir: line.is_dir,
            path,
            children: Vec::new(),
            line: Some(line.number),
        });
    }

    close_to_depth(&mut stack, &mut roots, 0);
    Ok(roots)
}

/// Pop open nodes until only `depth` remain, attaching each to its parent.
fn close_to_depth(stack: &mut Vec<Node>, roots: &mut Vec<Node>, depth: usize) {
    while stack.len() > depth {
        let Some(node) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<Node>, ParseError> {
        parse_indented(text, &ParseOptions::default())
    }

    fn parse_width(text: &str, width: usize) -> Result<Vec<Node>, ParseError> {
        parse_indented(
            text,
            &ParseOptions {
                indent_width: Some(width),
            },
        )
    }

    #[test]
    fn test_basic_layout() {
        let forest = parse("app/\n  src/\n    main.go\n  README.md").unwrap();
        assert_eq!(forest.len(), 1);
        let app = &forest[0];
        assert_eq!(app.name, "app");
        assert!(app.is_dir);
        assert_eq!(app.line, Some(1));
        assert_eq!(app.children.len(), 2);

        let src = &app.children[0];
        assert_eq!(src.name, "src");
        assert!(src.is_dir);
        assert_eq!(src.path, "app/src");
        assert_eq!(src.children[0].name, "main.go");
        assert_eq!(src.children[0].path, "app/src/main.go");
        assert_eq!(src.children[0].line, Some(3));

        let readme = &app.children[1];
        assert_eq!(readme.name, "README.md");
        assert!(!readme.is_dir);
        assert!(readme.children.is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let forest = parse("# layout\n\napp/\n  # inner comment\n\n  lib.rs\n").unwrap();
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].name, "lib.rs");
        assert_eq!(forest[0].children[0].line, Some(6));
    }

    #[test]
    fn test_multiple_roots() {
        let forest = parse("a/\n  x\nb/\nc.txt\n").unwrap();
        let names: Vec<&str> = forest.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c.txt"]);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_dedent_across_levels() {
        let forest = parse("a/\n  b/\n    c/\n      d\n  e\nf\n").unwrap();
        assert_eq!(forest.len(), 2);
        let a = &forest[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].children[0].children[0].path, "a/b/c/d");
        assert_eq!(a.children[1].path, "a/e");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n# only a comment\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_tabs_are_accepted() {
        let forest = parse("app/\n\tsrc/\n\t\tmain.rs\n").unwrap();
        assert_eq!(forest[0].children[0].children[0].path, "app/src/main.rs");
    }

    #[test]
    fn test_mixed_tabs_and_spaces_across_lines() {
        let err = parse("app/\n  one.txt\n\ttwo.txt\n").unwrap_err();
        assert!(err.is_indentation());
        assert_eq!(err.line(), Some(3));
        match err {
            ParseError::MixedIndentation {
                expected, found, ..
            } => {
                assert_eq!(expected, IndentChar::Space);
                assert_eq!(found, IndentChar::Tab);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mixed_within_one_line() {
        let err = parse("app/\n \tfile\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("cannot mix spaces and tabs"));
        assert!(err.to_string().contains("column 2"));
    }

    #[test]
    fn test_wrong_multiple_of_width() {
        let err = parse("app/\n  a\n   b\n").unwrap_err();
        assert!(err.is_indentation());
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("expected a multiple of 2 spaces, got 3"));
    }

    #[test]
    fn test_auto_detected_width() {
        let forest = parse("app/\n    src/\n        main.rs\n").unwrap();
        assert_eq!(forest[0].children[0].children[0].path, "app/src/main.rs");
    }

    #[test]
    fn test_configured_width() {
        let forest = parse_width("app/\n    src/\n", 4).unwrap();
        assert_eq!(forest[0].children[0].name, "src");
        let err = parse_width("app/\n  src/\n", 4).unwrap_err();
        assert!(err.is_indentation());
    }

    #[test]
    fn test_depth_jump_is_rejected() {
        let err = parse_width("app/\n    deep\n", 2).unwrap_err();
        assert!(!err.is_indentation());
        assert_eq!(err.line(), Some(2));
        assert!(
            err.to_string()
                .contains("invalid indentation: jumped from level 0 to 2"),
            "got: {err}"
        );

        let err = parse("a/\n  b\nc/\n    d\n").unwrap_err();
        assert!(err.to_string().contains("jumped from level 0 to 2"));
    }

    #[test]
    fn test_first_line_indented() {
        let err = parse("  app/\n").unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert!(err.to_string().contains("first line must not be indented"));
    }

    #[test]
    fn test_file_cannot_have_children() {
        let err = parse("main.rs\n  nested\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        let msg = err.to_string();
        assert!(msg.contains("'main.rs'"));
        assert!(msg.contains("only directories can have children"));
    }

    #[test]
    fn test_empty_name() {
        let err = parse("app/\n  /\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn test_slash_inside_name() {
        let err = parse("src/main.rs\n").unwrap_err();
        assert!(err.to_string().contains("names cannot contain '/'"));
        assert!(parse("a//\n").is_err());
    }

    #[test]
    fn test_crlf_input() {
        let forest = parse("app/\r\n  main.rs\r\n").unwrap();
        assert_eq!(forest[0].children[0].name, "main.rs");
    }
}
