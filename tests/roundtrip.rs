//! Property-based tests: every exported layout parses back to the same tree
//!
//! Forests are generated as sibling maps so names are unique per directory,
//! which keeps them valid for all three layout formats.

use std::collections::BTreeMap;

use proptest::prelude::*;
use scaffold::export::{render_json, render_simple, render_yaml};
use scaffold::parse::{parse_indented, parse_json, parse_yaml};
use scaffold::{Node, ParseOptions, PlatformProfile, validate};

#[derive(Debug, Clone)]
enum Entry {
    File,
    Dir(BTreeMap<String, Entry>),
}

/// Layout names: lowercase words, files sometimes with an extension.
fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}",
        "[a-z][a-z0-9_-]{0,6}\\.(rs|go|md|txt)",
    ]
}

fn entry_strategy() -> impl Strategy<Value = Entry> {
    let leaf = prop_oneof![
        3 => Just(Entry::File),
        1 => Just(Entry::Dir(BTreeMap::new())),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop::collection::btree_map(name_strategy(), inner, 0..5).prop_map(Entry::Dir)
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::btree_map(name_strategy(), entry_strategy(), 1..4).prop_map(|roots| {
        roots
            .into_iter()
            .map(|(name, entry)| to_node(name, entry))
            .collect()
    })
}

fn to_node(name: String, entry: Entry) -> Node {
    match entry {
        Entry::File => Node::file(name),
        Entry::Dir(children) => Node::dir(
            name,
            children
                .into_iter()
                .map(|(n, e)| to_node(n, e))
                .collect(),
        ),
    }
}

/// Order-independent view of a forest: names, kinds and nesting only.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Shape {
    name: String,
    is_dir: bool,
    children: Vec<Shape>,
}

fn shape(forest: &[Node]) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = forest
        .iter()
        .map(|n| Shape {
            name: n.name.clone(),
            is_dir: n.is_dir,
            children: shape(&n.children),
        })
        .collect();
    shapes.sort();
    shapes
}

proptest! {
    #[test]
    fn test_simple_export_parses_back(forest in forest_strategy()) {
        let text = render_simple(&forest);
        let parsed = parse_indented(&text, &ParseOptions::default());
        prop_assert!(parsed.is_ok(), "failed to parse:\n{}", text);
        prop_assert_eq!(shape(&parsed.unwrap()), shape(&forest));
    }

    #[test]
    fn test_json_export_parses_back(forest in forest_strategy()) {
        let text = render_json(&forest).unwrap();
        let parsed = parse_json(&text);
        prop_assert!(parsed.is_ok(), "failed to parse:\n{}", text);
        prop_assert_eq!(shape(&parsed.unwrap()), shape(&forest));
    }

    #[test]
    fn test_yaml_export_parses_back(forest in forest_strategy()) {
        let text = render_yaml(&forest).unwrap();
        let parsed = parse_yaml(&text);
        prop_assert!(parsed.is_ok(), "failed to parse:\n{}", text);
        prop_assert_eq!(shape(&parsed.unwrap()), shape(&forest));
    }

    #[test]
    fn test_parsed_layouts_validate(forest in forest_strategy()) {
        let text = render_simple(&forest);
        let mut parsed = parse_indented(&text, &ParseOptions::default()).unwrap();
        prop_assert!(validate(&mut parsed, &PlatformProfile::unix()).is_ok());
        prop_assert!(validate(&mut parsed, &PlatformProfile::windows()).is_ok() || has_reserved(&parsed));
    }
}

/// True if any name collides with a Windows device name such as `con` or `aux`.
fn has_reserved(forest: &[Node]) -> bool {
    let windows = PlatformProfile::windows();
    forest
        .iter()
        .any(|n| windows.is_reserved(&n.name) || has_reserved(&n.children))
}

#[test]
fn test_readme_layout_round_trip() {
    let text = "app/\n  src/\n    main.go\n  README.md\n";
    let forest = parse_indented(text, &ParseOptions::default()).unwrap();
    assert_eq!(render_simple(&forest), text);

    let yaml = render_yaml(&forest).unwrap();
    assert_eq!(shape(&parse_yaml(&yaml).unwrap()), shape(&forest));
}
