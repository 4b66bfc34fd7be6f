//! Integration tests for the editor command surface
//!
//! This tests:
//! - Order invariant across command sequences
//! - Change notification exactly once per command
//! - Plugin registration and extend_editor composition
//! - Selection and focus flows

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use blockwise_editor::{
    Block, BlockChildren, CommandError, DeleteOptions, DocumentValue, Editor, EditorConfig,
    EditorError, EditorEvent, InsertOptions, PluginDescriptor, PluginRegistry, Propagation,
    RegistryError, SelectOptions, ON_KEY_DOWN,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn registry() -> PluginRegistry {
    PluginRegistry::with_plugins(vec![
        PluginDescriptor::new("paragraph", || Block::new("paragraph")),
        PluginDescriptor::new("heading", || Block::new("heading").with_data("level", 1))
            .shortcut("#"),
        PluginDescriptor::new("divider", || Block::new("divider"))
            .shortcut("---")
            .extend_editor(|methods| {
                methods.wrap_is_void(|block, previous| block.block_type == "divider" || previous(block))
            }),
        PluginDescriptor::new("bulleted-list", || Block::new("bulleted-list"))
            .shortcut("-")
            .child_plugin(PluginDescriptor::new("list-item", || Block::new("list-item"))),
    ])
    .unwrap()
}

fn paragraph(id: &str) -> Block {
    Block::new("paragraph").with_id(id)
}

fn editor_with(ids: &[&str]) -> Editor {
    let mut editor = Editor::new(registry());
    for id in ids {
        editor
            .insert_block(paragraph(id), InsertOptions::append())
            .unwrap();
    }
    editor
}

fn ids_in_order(editor: &Editor) -> Vec<String> {
    editor.blocks_in_order().map(|b| b.id.clone()).collect()
}

fn assert_compact(editor: &Editor) {
    let mut orders: Vec<usize> = editor.snapshot().values().map(|b| b.meta.order).collect();
    orders.sort_unstable();
    let expected: Vec<usize> = (0..editor.block_count()).collect();
    assert_eq!(orders, expected, "orders must be exactly 0..N");
}

fn change_counter(editor: &mut Editor) -> Rc<RefCell<Vec<DocumentValue>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    editor.on(EditorEvent::Change, move |value| {
        sink.borrow_mut().push(value.clone());
    });
    seen
}

#[test]
fn test_insert_into_middle() {
    init_tracing();
    let mut editor = editor_with(&["a", "b", "c"]);

    editor
        .insert_block(paragraph("x"), InsertOptions::at(1))
        .unwrap();

    assert_eq!(ids_in_order(&editor), vec!["a", "x", "b", "c"]);
    assert_eq!(editor.order_of("b"), Some(2));
    assert_eq!(editor.order_of("c"), Some(3));
    assert_compact(&editor);
}

#[test]
fn test_insert_at_end_and_append() {
    let mut editor = editor_with(&["a"]);
    editor.insert_block(paragraph("b"), InsertOptions::at(1)).unwrap();
    editor.insert_block(paragraph("c"), InsertOptions::append()).unwrap();
    assert_eq!(ids_in_order(&editor), vec!["a", "b", "c"]);
}

#[test]
fn test_insert_past_end_fails_without_emit() {
    let mut editor = editor_with(&["a", "b"]);
    let seen = change_counter(&mut editor);

    let err = editor
        .insert_block(paragraph("x"), InsertOptions::at(5))
        .unwrap_err();

    assert_eq!(err, CommandError::InvalidPath { at: 5, len: 2 });
    assert!(err.is_validation());
    assert!(!editor.contains("x"));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_delete_from_head() {
    let mut editor = editor_with(&["a", "b", "c"]);

    let deleted = editor.delete_block(DeleteOptions::paths([0])).unwrap();

    assert_eq!(deleted, vec!["a"]);
    assert_eq!(ids_in_order(&editor), vec!["b", "c"]);
    assert_eq!(editor.order_of("b"), Some(0));
    assert_eq!(editor.order_of("c"), Some(1));
}

#[test]
fn test_delete_multiple_paths_resolved_before_deletion() {
    let mut editor = editor_with(&["a", "b", "c", "d"]);

    let deleted = editor.delete_block(DeleteOptions::paths([1, 3])).unwrap();

    assert_eq!(deleted, vec!["b", "d"]);
    assert_eq!(ids_in_order(&editor), vec!["a", "c"]);
    assert_compact(&editor);
}

#[test]
fn test_delete_stale_path_is_silent() {
    let mut editor = editor_with(&["a", "b"]);
    let seen = change_counter(&mut editor);

    let deleted = editor.delete_block(DeleteOptions::paths([7])).unwrap();

    assert!(deleted.is_empty());
    assert_eq!(editor.block_count(), 2);
    assert!(seen.borrow().is_empty(), "no-op delete must not emit");
}

#[test]
fn test_delete_clears_selection_of_removed_blocks() {
    let mut editor = editor_with(&["a", "b"]);
    editor.set_block_selected(0, SelectOptions::default()).unwrap();
    editor.set_block_selected(1, SelectOptions::default()).unwrap();

    editor.delete_block(DeleteOptions::paths([0])).unwrap();

    assert_eq!(editor.selection().selected_block_ids, vec!["b"]);
}

#[test]
fn test_move_to_head() {
    let mut editor = editor_with(&["a", "c"]);
    let b1 = Block::new("paragraph").with_id("b1").with_text("moved");
    editor.insert_block(b1.clone(), InsertOptions::append()).unwrap();

    editor.move_block("b1", 0).unwrap();

    assert_eq!(ids_in_order(&editor), vec!["b1", "a", "c"]);
    let moved = editor.block("b1").unwrap();
    assert_eq!(moved.children, b1.children);
    assert_eq!(moved.data, b1.data);
    assert_compact(&editor);
}

#[test]
fn test_move_unknown_block() {
    let mut editor = editor_with(&["a"]);
    let err = editor.move_block("ghost", 0).unwrap_err();
    assert_eq!(err, CommandError::BlockNotFound("ghost".to_string()));
    assert!(err.is_not_found());
}

#[test]
fn test_order_invariant_across_sequences() {
    init_tracing();
    let mut editor = editor_with(&["a", "b", "c", "d", "e"]);

    editor.move_block("e", 0).unwrap();
    assert_compact(&editor);
    editor.delete_block(DeleteOptions::paths([2, 0])).unwrap();
    assert_compact(&editor);
    editor.insert_block(paragraph("f"), InsertOptions::at(1)).unwrap();
    assert_compact(&editor);
    editor.move_block("f", 3).unwrap();
    assert_compact(&editor);
    let _ = editor.insert_block(paragraph("g"), InsertOptions::at(99));
    assert_compact(&editor);
    editor.delete_block(DeleteOptions::paths([3, 3, 42])).unwrap();
    assert_compact(&editor);

    assert_eq!(ids_in_order(&editor), vec!["a", "c", "d"]);
}

#[test]
fn test_change_emitted_once_per_command() {
    let mut editor = Editor::new(registry());
    let seen = change_counter(&mut editor);

    editor.insert_block(paragraph("a"), InsertOptions::append()).unwrap();
    editor.insert_block(paragraph("b"), InsertOptions::at(0).focus()).unwrap();
    editor.move_block("a", 0).unwrap();
    editor.delete_block(DeleteOptions::paths([0, 1])).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[1].len(), 2);
    assert_eq!(seen[2]["a"].meta.order, 0);
    assert!(seen[3].is_empty());
}

#[test]
fn test_change_payload_is_full_value() {
    let mut editor = editor_with(&["a", "b"]);
    let seen = change_counter(&mut editor);

    editor.move_block("b", 0).unwrap();

    let seen = seen.borrow();
    let value = &seen[0];
    assert_eq!(value.len(), 2);
    assert_eq!(value["b"].meta.order, 0);
    assert_eq!(value["a"].meta.order, 1);
}

#[test]
fn test_off_stops_notifications() {
    let mut editor = Editor::new(registry());
    let count = Rc::new(RefCell::new(0));
    let counter = count.clone();
    let sub = editor.on(EditorEvent::Change, move |_| *counter.borrow_mut() += 1);

    editor.insert_block(paragraph("a"), InsertOptions::append()).unwrap();
    assert!(editor.off(sub));
    assert!(!editor.off(sub));
    editor.insert_block(paragraph("b"), InsertOptions::append()).unwrap();

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_duplicate_plugin_type_rejected() {
    let mut registry = registry();
    let before = registry.len();

    let err = registry
        .register(PluginDescriptor::new("paragraph", || Block::new("paragraph")))
        .unwrap_err();

    assert_eq!(err, RegistryError::DuplicateType("paragraph".to_string()));
    assert_eq!(registry.len(), before);
}

#[test]
fn test_shortcut_lookup() {
    let registry = registry();
    assert_eq!(registry.find_by_shortcut("-").unwrap().block_type(), "bulleted-list");
    assert_eq!(registry.find_by_shortcut("#").unwrap().block_type(), "heading");
    assert!(registry.find_by_shortcut("```").is_none());
}

#[test]
fn test_composite_blocks_seed_a_child() {
    let registry = registry();
    let list = registry.define_element("bulleted-list").unwrap();

    let children = list.child_blocks().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].block_type, "list-item");
    assert_eq!(children[0].meta.depth, 1);
    assert_eq!(children[0].meta.order, 0);
}

#[test]
fn test_extend_editor_composes_is_void() {
    let registry = PluginRegistry::with_plugins(vec![
        PluginDescriptor::new("paragraph", || Block::new("paragraph")),
        PluginDescriptor::new("divider", || Block::new("divider")).extend_editor(|m| {
            m.wrap_is_void(|block, previous| block.block_type == "divider" || previous(block))
        }),
        PluginDescriptor::new("image", || Block::new("image")).extend_editor(|m| {
            m.wrap_is_void(|block, previous| block.block_type == "image" || previous(block))
        }),
    ])
    .unwrap();

    let mut editor = Editor::new(registry);
    editor.insert_block(paragraph("p"), InsertOptions::append()).unwrap();
    editor
        .insert_block(Block::new("divider").with_id("d"), InsertOptions::append())
        .unwrap();
    editor
        .insert_block(Block::new("image").with_id("i"), InsertOptions::append())
        .unwrap();

    assert!(!editor.is_void("p"));
    assert!(editor.is_void("d"));
    assert!(editor.is_void("i"));
}

#[test]
fn test_normalize_block_runs_on_insert() {
    let registry = PluginRegistry::with_plugins(vec![PluginDescriptor::new("code", || {
        Block::new("code")
    })
    .extend_editor(|methods| {
        methods.wrap_normalize_block(|block, previous| {
            previous(block);
            if block.block_type == "code" && !block.data.contains_key("language") {
                block.data.insert("language".into(), "javascript".into());
            }
        })
    })])
    .unwrap();

    let mut editor = Editor::new(registry);
    let id = editor
        .insert_block(Block::new("code"), InsertOptions::append())
        .unwrap();

    assert_eq!(editor.block(&id).unwrap().data["language"], "javascript");
}

#[test]
fn test_handler_can_issue_commands() {
    let registry = PluginRegistry::with_plugins(vec![
        PluginDescriptor::new("paragraph", || Block::new("paragraph")),
        PluginDescriptor::new("divider", || Block::new("divider")).on(
            ON_KEY_DOWN,
            |editor, ctx, event| {
                if !ctx.hotkeys.is_backspace(event) {
                    return Ok(Propagation::Continue);
                }
                let Some(order) = editor.focused_block().map(|b| b.meta.order) else {
                    return Ok(Propagation::Continue);
                };
                editor.delete_block(DeleteOptions::paths([order]))?;
                Ok(Propagation::Stop)
            },
        ),
    ])
    .unwrap();

    let mut editor = Editor::new(registry);
    editor.insert_block(paragraph("p"), InsertOptions::append()).unwrap();
    editor
        .insert_block(Block::new("divider").with_id("d"), InsertOptions::append())
        .unwrap();
    editor.focus_block("d").unwrap();

    let propagation = editor
        .dispatch_event(ON_KEY_DOWN, &blockwise_editor::InputEvent::key("Backspace"))
        .unwrap();

    assert_eq!(propagation, Propagation::Stop);
    assert!(!editor.contains("d"));
    assert!(editor.focused_block_id().is_none());
}

#[test]
fn test_set_selection_and_select_block() {
    let mut editor = editor_with(&["a", "b", "c"]);

    editor.set_selection(Some(2));
    assert_eq!(editor.selection().anchor_path, Some(2));
    assert_eq!(editor.selection().focus_path, Some(2));

    editor.select_block("b").unwrap();
    assert_eq!(editor.selection().focus_path, Some(1));
    assert_eq!(editor.selection().selected_block_ids, vec!["b"]);
    assert_eq!(editor.focused_block_id(), Some("b"));

    editor.set_selection(None);
    assert_eq!(editor.selection().focus_path, None);
}

#[test]
fn test_convert_keeps_identity_and_order() {
    let mut editor = editor_with(&["a", "b"]);
    editor
        .update_block("b", |block| block.children = BlockChildren::text("hi"))
        .unwrap();

    editor.create_element("b", "bulleted-list").unwrap();

    let list = editor.block("b").unwrap();
    assert_eq!(list.block_type, "bulleted-list");
    assert_eq!(list.meta.order, 1);
    assert_eq!(list.child_blocks().unwrap().len(), 1);
}

#[test]
fn test_load_value_repairs_orders() -> anyhow::Result<()> {
    let json = r#"{
        "x": {"id": "x", "type": "paragraph", "meta": {"order": 4, "depth": 0}, "data": {}, "children": [{"text": "second"}]},
        "y": {"id": "y", "type": "heading", "meta": {"order": 1, "depth": 0}, "data": {"level": 2}, "children": [{"text": "first"}]}
    }"#;

    let mut editor = Editor::new(registry());
    editor.load_json(json)?;

    assert_eq!(ids_in_order(&editor), vec!["y", "x"]);
    assert_eq!(editor.block("x").unwrap().meta.order, 1);
    assert_eq!(editor.block("x").unwrap().plain_text(), "second");
    Ok(())
}

#[test]
fn test_load_rejects_malformed_json() {
    let mut editor = Editor::new(registry());
    let err = editor.load_json("{ not json").unwrap_err();
    assert!(matches!(err, EditorError::Json(_)));
}

#[test]
fn test_auto_focus_on_load() -> anyhow::Result<()> {
    let config = EditorConfig {
        auto_focus: true,
        ..EditorConfig::default()
    };
    let mut value = DocumentValue::new();
    value.insert("a".into(), paragraph("a").with_order(0));
    value.insert("b".into(), paragraph("b").with_order(1));

    let editor = Editor::with_config(registry(), config).with_value(value)?;

    assert_eq!(editor.focused_block_id(), Some("a"));
    assert_eq!(editor.selection().focus_path, Some(0));
    Ok(())
}

#[test]
fn test_separate_instances_are_isolated() {
    let mut a = editor_with(&["a1"]);
    let b = editor_with(&["b1"]);

    a.delete_block(DeleteOptions::paths([0])).unwrap();

    assert_eq!(a.block_count(), 0);
    assert_eq!(b.block_count(), 1);
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_text_subtree_survives_export_and_import() -> anyhow::Result<()> {
    init_tracing();
    let element = json!({
        "id": "el1",
        "type": "paragraph",
        "children": [{ "text": "hi" }],
        "props": { "nodeType": "block" }
    });
    let mut editor = Editor::new(registry());
    editor.insert_block(
        paragraph("a").with_children(BlockChildren::Subtree(vec![element])),
        InsertOptions::append(),
    )?;
    editor.insert_block(
        paragraph("b").with_children(BlockChildren::Subtree(Vec::new())),
        InsertOptions::append(),
    )?;

    let mut other = Editor::new(registry());
    other.load_json(&editor.to_json()?)?;

    assert_eq!(other.snapshot(), editor.snapshot());
    assert!(other.block("a").unwrap().child_blocks().is_none());
    assert_eq!(other.block("a").unwrap().plain_text(), "hi");
    Ok(())
}

#[test]
fn test_load_rejects_rekeyed_blocks() {
    let json = r#"{
        "x": {"id": "y", "type": "paragraph", "meta": {"order": 0}, "data": {}, "children": [{"text": ""}]}
    }"#;

    let mut editor = Editor::new(registry());
    let err = editor.load_json(json).unwrap_err();

    assert!(matches!(
        err,
        EditorError::Command(CommandError::KeyMismatch { ref key, ref id }) if key == "x" && id == "y"
    ));
    assert_eq!(editor.block_count(), 0);
}
