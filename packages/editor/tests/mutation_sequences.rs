//! Composite operations and their inverse properties
//!
//! This tests:
//! - Split/fuse round trips, in ordinal children and in slots
//! - Wrap/unwrap round trips, whole-node and text-range
//! - Remove/add round trips
//! - Replaying serialized edit descriptions

use anyhow::Result;
use serde_json::json;
use stanza_editor::{
    DocumentEditor, Edit, EditError, Locator, Node, Path, TextLocation,
};

#[test]
fn split_then_fuse_restores_the_original_tree() -> Result<()> {
    let body = Node::tag("body")
        .with_child(Node::tag("div").with_child(Node::text("ab")));
    let mut editor = DocumentEditor::new(body);

    let locator = TextLocation {
        path: Path::root().child(0).child(0),
        offset: 1,
    };
    let new_path = editor.split_at(locator, 1)?;
    assert_eq!(new_path, Path::root().child(1));
    assert_eq!(
        editor.root().to_value()?,
        json!(["body", [["div", [["#t", "a"]]], ["div", [["#t", "b"]]]]])
    );

    let fused = editor.fuse_back(&Path::root().child(1).child(0), Some(1))?;
    assert_eq!(fused, Some(Path::root().child(0)));
    assert_eq!(
        editor.root().to_value()?,
        json!(["body", [["div", [["#t", "ab"]]]]])
    );
    Ok(())
}

#[test]
fn split_duplicates_the_ancestor_header_only() -> Result<()> {
    let body = Node::tag("body").with_child(
        Node::tag("section")
            .with_attr("kind", "aside")
            .with_child(Node::tag("p").with_child(Node::text("one")))
            .with_child(Node::tag("p").with_child(Node::text("two")))
            .with_slot("meta", vec![Node::tag("time")]),
    );
    let mut editor = DocumentEditor::new(body);

    let new_path = editor.split_at(Path::root().child(0).child(1), 1)?;
    assert_eq!(new_path, Path::root().child(1));

    let original = editor.node_at(&Path::root().child(0))?;
    assert_eq!(original.children().len(), 1);
    assert_eq!(original.slot("meta").map(<[Node]>::len), Some(1));

    // the duplicate carries name and attributes, not the slots
    let duplicate = editor.node_at(&new_path)?;
    assert_eq!(duplicate.name(), Some("section"));
    assert_eq!(duplicate.attribute("kind"), Some(&json!("aside")));
    assert_eq!(duplicate.children().len(), 1);
    assert_eq!(duplicate.slot("meta"), None);
    Ok(())
}

#[test]
fn split_inside_a_slot_homes_the_tail_in_the_same_slot() -> Result<()> {
    let body = Node::tag("body").with_child(Node::tag("section").with_slot(
        "notes",
        vec![
            Node::tag("p").with_child(Node::text("one")),
            Node::tag("p").with_child(Node::text("two")),
            Node::tag("p").with_child(Node::text("three")),
        ],
    ));
    let mut editor = DocumentEditor::new(body);

    let new_path = editor.split_at(Path::root().child(0).slot_child("notes", 1), 1)?;
    assert_eq!(new_path, Path::root().child(1));

    assert_eq!(
        editor
            .node_at(&Path::root().child(0))?
            .slot("notes")
            .map(<[Node]>::len),
        Some(1)
    );
    let duplicate = editor.node_at(&new_path)?;
    assert!(duplicate.children().is_empty());
    assert_eq!(duplicate.slot("notes").map(<[Node]>::len), Some(2));
    Ok(())
}

#[test]
fn split_with_zero_levels_is_a_no_op_for_node_locators() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("body").with_child(Node::tag("div")),
    );

    let path = editor.split_at(Path::root().child(0), 0)?;

    assert_eq!(path, Path::root().child(0));
    assert_eq!(editor.version(), 0);
    Ok(())
}

#[test]
fn split_counts_characters_not_bytes() -> Result<()> {
    let body = Node::tag("body")
        .with_child(Node::tag("div").with_child(Node::text("héllo")));
    let mut editor = DocumentEditor::new(body);

    editor.split_at(
        TextLocation {
            path: Path::root().child(0).child(0),
            offset: 2,
        },
        1,
    )?;

    assert_eq!(
        editor.root().to_value()?,
        json!(["body", [["div", [["#t", "hé"]]], ["div", [["#t", "llo"]]]]])
    );
    Ok(())
}

#[test]
fn split_rejects_node_locators_on_text_nodes() {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::text("ab")),
    );
    let err = editor
        .split_at(Path::root().child(0), 1)
        .unwrap_err();
    assert!(matches!(err, EditError::WrongVariant { .. }));
}

#[test]
fn split_past_the_root_fails_without_rollback() {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::tag("p").with_child(Node::text("ab"))),
    );

    let err = editor
        .split_at(
            TextLocation {
                path: Path::root().child(0).child(0),
                offset: 1,
            },
            2,
        )
        .unwrap_err();
    assert!(matches!(err, EditError::RootOperation { .. }));

    // the lower level already split; composite operations do not roll back
    assert_eq!(
        editor.root().to_value().unwrap(),
        json!(["div", [["p", [["#t", "a"]]], ["p", [["#t", "b"]]]]])
    );
}

#[test]
fn fuse_back_ascends_until_a_preceding_sibling_exists() -> Result<()> {
    let body = Node::tag("body")
        .with_child(Node::tag("div").with_child(Node::tag("p").with_child(Node::text("one"))))
        .with_child(Node::tag("div").with_child(Node::tag("p").with_child(Node::text("two"))));
    let mut editor = DocumentEditor::new(body);

    let fused = editor.fuse_back(&Path::root().child(1).child(0).child(0), None)?;

    assert_eq!(fused, Some(Path::root().child(0)));
    assert_eq!(editor.root().children().len(), 1);
    assert_eq!(editor.node_at(&Path::root().child(0))?.children().len(), 2);
    Ok(())
}

#[test]
fn fuse_back_stops_when_the_ancestor_limit_runs_out() -> Result<()> {
    let body = Node::tag("body")
        .with_child(Node::tag("div").with_child(Node::tag("p")))
        .with_child(Node::tag("div").with_child(Node::tag("p")));
    let mut editor = DocumentEditor::new(body);
    let before = editor.root().clone();

    let fused = editor.fuse_back(&Path::root().child(1).child(0), Some(0))?;

    assert_eq!(fused, None);
    assert_eq!(editor.root(), &before);
    assert_eq!(editor.version(), 0);
    Ok(())
}

#[test]
fn fuse_back_merges_slots_key_by_key() -> Result<()> {
    let body = Node::tag("body")
        .with_child(
            Node::tag("section")
                .with_child(Node::text("one"))
                .with_slot("notes", vec![Node::text("x")]),
        )
        .with_child(
            Node::tag("section")
                .with_child(Node::text("two"))
                .with_slot("notes", vec![Node::text("y")])
                .with_slot("refs", vec![Node::tag("a")]),
        );
    let mut editor = DocumentEditor::new(body);

    editor.fuse_back(&Path::root().child(1), None)?;

    let merged = editor.node_at(&Path::root().child(0))?;
    // adjacent text runs re-normalize in children and per slot
    assert_eq!(merged.children(), &[Node::text("onetwo")]);
    assert_eq!(merged.slot("notes").unwrap(), &[Node::text("xy")]);
    assert_eq!(merged.slot("refs").unwrap(), &[Node::tag("a")]);
    Ok(())
}

#[test]
fn fuse_back_rejects_name_mismatches() {
    let body = Node::tag("body")
        .with_child(Node::tag("div"))
        .with_child(Node::tag("p"));
    let mut editor = DocumentEditor::new(body);
    let before = editor.root().clone();

    let err = editor
        .fuse_back(&Path::root().child(1), None)
        .unwrap_err();

    assert!(matches!(err, EditError::NameMismatch { .. }));
    assert_eq!(editor.root(), &before);
}

#[test]
fn fuse_back_from_the_first_child_of_the_root_is_an_error() {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::tag("p").with_child(Node::text("x"))),
    );
    let err = editor
        .fuse_back(&Path::root().child(0).child(0), None)
        .unwrap_err();
    assert!(matches!(err, EditError::RootOperation { .. }));
}

#[test]
fn remove_then_re_add_round_trips() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("div")
            .with_child(Node::tag("a"))
            .with_child(Node::tag("b"))
            .with_child(Node::tag("c")),
    );
    let original = editor.root().clone();
    let path = Path::root().child(1);

    let node = editor.node_at(&path)?.clone();
    editor.remove_node(&path)?;
    editor.add_children(&Path::root(), 1usize, vec![node])?;

    assert_eq!(editor.root(), &original);
    Ok(())
}

#[test]
fn wrap_text_range_produces_the_triplet() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::text("hello")),
    );

    let start = TextLocation {
        path: Path::root().child(0),
        offset: 1,
    };
    let end = TextLocation {
        path: Path::root().child(0),
        offset: 3,
    };
    let wrapped = editor.wrap_with_node(Node::tag("b"), start, Some(end.into()))?;

    assert_eq!(wrapped, Path::root().child(1));
    assert_eq!(
        editor.root().to_value()?,
        json!(["div", [["#t", "h"], ["b", [["#t", "el"]]], ["#t", "lo"]]])
    );
    Ok(())
}

#[test]
fn wrap_text_range_keeps_empty_edge_pieces() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::text("hello")),
    );

    let start = TextLocation {
        path: Path::root().child(0),
        offset: 0,
    };
    let end = TextLocation {
        path: Path::root().child(0),
        offset: 5,
    };
    editor.wrap_with_node(Node::tag("b"), start, Some(end.into()))?;

    assert_eq!(
        editor.root().to_value()?,
        json!(["div", [["#t", ""], ["b", [["#t", "hello"]]], ["#t", ""]]])
    );
    Ok(())
}

#[test]
fn wrap_range_across_different_nodes_is_rejected() {
    let mut editor = DocumentEditor::new(
        Node::tag("div")
            .with_child(Node::text("one"))
            .with_child(Node::tag("hr"))
            .with_child(Node::text("two")),
    );

    let start = TextLocation {
        path: Path::root().child(0),
        offset: 1,
    };
    let end = TextLocation {
        path: Path::root().child(2),
        offset: 1,
    };
    let err = editor
        .wrap_with_node(Node::tag("b"), start, Some(end.into()))
        .unwrap_err();
    assert!(matches!(err, EditError::UnsupportedRange));
}

#[test]
fn wrap_rejects_text_templates() {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::tag("p")),
    );
    let err = editor
        .wrap_with_node(Node::text("no"), Path::root().child(0), None)
        .unwrap_err();
    assert!(matches!(err, EditError::WrongVariant { .. }));
}

#[test]
fn whole_node_wrap_requires_a_plain_path() {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::text("x")),
    );
    let half_open = Locator::Text(TextLocation {
        path: Path::root().child(0),
        offset: 0,
    });
    let err = editor
        .wrap_with_node(Node::tag("b"), half_open, None)
        .unwrap_err();
    assert!(matches!(err, EditError::UnsupportedRange));
}

#[test]
fn wrap_then_unwrap_restores_the_sequence() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("div")
            .with_child(Node::tag("p").with_child(Node::text("body")))
            .with_child(Node::tag("hr")),
    );
    let original = editor.root().clone();

    let wrapper = editor.wrap_with_node(Node::tag("blockquote"), Path::root().child(0), None)?;
    assert_eq!(wrapper, Path::root().child(0));
    assert_eq!(editor.name_at(&wrapper)?, "blockquote");

    editor.unwrap_content(&wrapper)?;
    assert_eq!(editor.root(), &original);
    Ok(())
}

#[test]
fn wrap_inside_a_slot_stays_in_the_slot() -> Result<()> {
    let mut editor = DocumentEditor::new(Node::tag("article").with_slot(
        "header",
        vec![Node::tag("h1").with_child(Node::text("title"))],
    ));

    let target = Path::root().slot_child("header", 0);
    let wrapper = editor.wrap_with_node(Node::tag("div"), target.clone(), None)?;

    assert_eq!(wrapper, target);
    let wrapped = editor.node_at(&wrapper)?;
    assert_eq!(wrapped.name(), Some("div"));
    assert_eq!(wrapped.children()[0].name(), Some("h1"));
    Ok(())
}

#[test]
fn unwrap_normalizes_adjacent_text_runs() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("div")
            .with_child(Node::tag("em").with_child(Node::text("x")))
            .with_child(Node::text("y")),
    );

    editor.unwrap_content(&Path::root().child(0))?;

    assert_eq!(
        editor.root().to_value()?,
        json!(["div", [["#t", "xy"]]])
    );
    Ok(())
}

#[test]
fn unwrap_rejects_text_nodes_and_the_root() {
    let mut editor = DocumentEditor::new(
        Node::tag("div").with_child(Node::text("x")),
    );

    let err = editor.unwrap_content(&Path::root().child(0)).unwrap_err();
    assert!(matches!(err, EditError::WrongVariant { .. }));

    let err = editor.unwrap_content(&Path::root()).unwrap_err();
    assert!(matches!(err, EditError::RootOperation { .. }));
}

#[test]
fn serialized_edits_replay_like_method_calls() -> Result<()> {
    let mut editor = DocumentEditor::new(
        Node::tag("article")
            .with_child(Node::tag("p").with_child(Node::text("draft"))),
    );

    let edits: Vec<Edit> = serde_json::from_value(json!([
        { "type": "SetText", "path": "0/0", "value": "final" },
        { "type": "SetProperty", "path": "0", "name": "class", "value": "lead" },
        { "type": "AddChildren", "path": "", "position": "end", "nodes": [["hr"]] },
        {
            "type": "SplitAt",
            "locator": { "path": "0/0", "offset": 2 },
            "ancestor_levels": 1
        },
    ]))?;
    for edit in edits {
        editor.apply(edit)?;
    }

    assert_eq!(
        editor.root().to_value()?,
        json!([
            "article",
            [
                ["p", [["#t", "fi"]], { "class": "lead" }],
                ["p", [["#t", "nal"]], { "class": "lead" }],
                ["hr"]
            ]
        ])
    );
    Ok(())
}
