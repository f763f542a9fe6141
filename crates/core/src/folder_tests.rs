// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    root = { "\\", "\\" },
    single = { "\\Jobs", "\\Jobs" },
    nested = { "\\A\\B\\C", "\\A\\B\\C" },
    trailing_separator = { "\\Jobs\\", "\\Jobs" },
    spaces_inside = { "\\My Jobs\\Nightly", "\\My Jobs\\Nightly" },
)]
fn parses_and_normalizes(input: &str, expected: &str) {
    let path = FolderPath::parse(input).unwrap();
    assert_eq!(path.to_string(), expected);
}

#[parameterized(
    empty = { "" },
    relative = { "Jobs" },
    double_root = { "\\\\Jobs" },
    empty_segment = { "\\A\\\\B" },
    forward_slash = { "\\A/B" },
    wildcard = { "\\A*" },
    dot_dot = { "\\A\\.." },
    padded = { "\\ A" },
)]
fn rejects_invalid_paths(input: &str) {
    let err = FolderPath::parse(input).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidFolderPath { .. }));
}

#[test]
fn root_has_no_segments_or_parent() {
    let root = FolderPath::root();
    assert!(root.is_root());
    assert!(root.segments().is_empty());
    assert_eq!(root.parent(), None);
    assert_eq!(root.name(), None);
    assert_eq!(root.ancestry().count(), 0);
}

#[test]
fn parent_and_join_are_inverse() {
    let path = FolderPath::parse("\\A\\B").unwrap();
    let parent = path.parent().unwrap();
    assert_eq!(parent.to_string(), "\\A");
    assert_eq!(parent.join("B").unwrap(), path);
    assert_eq!(path.name(), Some("B"));
}

#[test]
fn join_rejects_bad_segment() {
    let err = FolderPath::root().join("a|b").unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidFolderPath {
            path: "\\a|b".to_string(),
            reason: "folder name 'a|b' contains '|'".to_string(),
        }
    );
}

#[test]
fn ancestry_walks_from_top() {
    let path = FolderPath::parse("\\A\\B\\C").unwrap();
    let chain: Vec<String> = path.ancestry().map(|p| p.to_string()).collect();
    assert_eq!(chain, vec!["\\A", "\\A\\B", "\\A\\B\\C"]);
}

#[test]
fn task_path_joins_name() {
    assert_eq!(FolderPath::root().task_path("Backup"), "\\Backup");
    assert_eq!(
        FolderPath::parse("\\Jobs").unwrap().task_path("Backup"),
        "\\Jobs\\Backup"
    );
}

#[test]
fn serde_uses_display_form() {
    #[derive(Deserialize)]
    struct Wrapper {
        folder: FolderPath,
    }

    let parsed: Wrapper = toml::from_str("folder = '\\Jobs\\Nightly'").unwrap();
    assert_eq!(parsed.folder.segments(), ["Jobs", "Nightly"]);

    let bad = toml::from_str::<Wrapper>("folder = 'Jobs'");
    assert!(bad.is_err());
}

fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_][A-Za-z0-9_ -]{0,10}[A-Za-z0-9_]"
}

proptest! {
    #[test]
    fn display_then_parse_is_identity(segments in proptest::collection::vec(arb_segment(), 0..6)) {
        let mut path = FolderPath::root();
        for segment in &segments {
            path = path.join(segment).unwrap();
        }
        let reparsed = FolderPath::parse(&path.to_string()).unwrap();
        prop_assert_eq!(reparsed, path);
    }

    #[test]
    fn ancestry_ends_at_self(segments in proptest::collection::vec(arb_segment(), 1..6)) {
        let raw = format!("\\{}", segments.join("\\"));
        let path = FolderPath::parse(&raw).unwrap();
        let chain: Vec<FolderPath> = path.ancestry().collect();
        prop_assert_eq!(chain.len(), segments.len());
        prop_assert_eq!(chain.last(), Some(&path));
    }
}
