use bdock_editor::{
    Attributes, BlockInserter, BlockRequest, InsertError, InsertOptions, MemoryEditor, NodeFactory,
    NodeId, StateStore,
};
use bdock_registry::BlockRegistry;
use pretty_assertions::assert_eq;
use serde_json::json;

fn attrs(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

fn setup() -> (BlockRegistry, MemoryEditor) {
    let registry = BlockRegistry::builtin();
    let editor = MemoryEditor::for_registry(&registry);
    (registry, editor)
}

#[test]
fn unregistered_type_fails_without_touching_store() {
    let (registry, mut editor) = setup();
    let outcome = BlockInserter::new(&registry, &mut editor).insert(
        "core/nope",
        Attributes::new(),
        InsertOptions::default(),
    );
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(InsertError::BlockNotRegistered("core/nope".into())));
    assert_eq!(outcome.error_code(), Some("BlockNotRegistered"));
    assert_eq!(editor.mutation_counts().total(), 0);
}

#[test]
fn insert_defaults_to_end_of_document() {
    let (registry, mut editor) = setup();
    editor.seed(&NodeId::root(), "core/heading", Attributes::new());
    let outcome = BlockInserter::new(&registry, &mut editor).insert(
        "core/text",
        Attributes::new(),
        InsertOptions::default(),
    );
    assert!(outcome.success);
    assert_eq!(editor.root_names(), vec!["core/heading", "core/text"]);
    assert_eq!(editor.selected_node_id(), outcome.id);
}

#[test]
fn caller_attributes_override_defaults() {
    let (registry, mut editor) = setup();
    let outcome = BlockInserter::new(&registry, &mut editor).insert(
        "core/heading",
        attrs(json!({"level": 3})),
        InsertOptions::default(),
    );
    let id = outcome.id.expect("inserted");
    let node = editor.node(&id).expect("node exists");
    assert_eq!(node.attributes.get("level"), Some(&json!(3)));
    assert_eq!(node.attributes.get("content"), Some(&json!("")));
}

#[test]
fn explicit_index_is_clamped() {
    let (registry, mut editor) = setup();
    editor.seed(&NodeId::root(), "core/text", Attributes::new());
    let outcome = BlockInserter::new(&registry, &mut editor).insert(
        "core/divider",
        Attributes::new(),
        InsertOptions::at(99, NodeId::root()).without_select(),
    );
    assert!(outcome.success);
    assert_eq!(editor.root_names(), vec!["core/text", "core/divider"]);
    assert_eq!(editor.selected_node_id(), None);
}

#[test]
fn missing_parent_is_reported_not_inserted() {
    let (registry, mut editor) = setup();
    editor.seed(&NodeId::root(), "core/text", Attributes::new());
    let gone = NodeId::new("gone");
    let mut inserter = BlockInserter::new(&registry, &mut editor);

    let single = inserter.insert("core/text", Attributes::new(), InsertOptions::at(0, gone.clone()));
    assert!(!single.success);
    assert_eq!(single.id, None);
    assert_eq!(single.error, Some(InsertError::NodeNotFound(gone.clone())));

    let batch = inserter.insert_multiple(
        &[BlockRequest::new("core/heading"), BlockRequest::new("core/text")],
        InsertOptions::default().with_parent(gone.clone()),
    );
    assert_eq!(batch.error_code(), Some("NodeNotFound"));

    let preset = inserter.insert_preset("hero", InsertOptions::at(0, gone));
    assert_eq!(preset.error_code(), Some("NodeNotFound"));

    assert_eq!(editor.root_names(), vec!["core/text"]);
    assert_eq!(editor.undo_depth(), 0);
    assert_eq!(editor.mutation_counts().total(), 0);
}

#[test]
fn insert_after_selected_places_next_sibling() {
    let (registry, mut editor) = setup();
    let group = editor.seed(&NodeId::root(), "core/group", Attributes::new());
    let first = editor.seed(&group, "core/text", Attributes::new());
    editor.seed(&group, "core/image", Attributes::new());
    editor.select(Some(first));

    let outcome =
        BlockInserter::new(&registry, &mut editor).insert_after_selected("core/quote", Attributes::new());
    let id = outcome.id.expect("inserted");
    assert_eq!(editor.node_index(&id, &group), Some(1));
}

#[test]
fn selection_operations_require_selection() {
    let (registry, mut editor) = setup();
    let mut api = BlockInserter::new(&registry, &mut editor);
    assert_eq!(api.insert_after_selected("core/text", Attributes::new()).error, Some(InsertError::NoSelection));
    assert_eq!(api.insert_as_child("core/text", Attributes::new()).error, Some(InsertError::NoSelection));
    assert_eq!(api.duplicate_selected().error, Some(InsertError::NoSelection));
    assert_eq!(api.remove_selected().error, Some(InsertError::NoSelection));
    assert_eq!(api.replace_selected("core/text", Attributes::new()).error, Some(InsertError::NoSelection));
}

#[test]
fn insert_as_child_appends() {
    let (registry, mut editor) = setup();
    let group = editor.seed(&NodeId::root(), "core/group", Attributes::new());
    editor.seed(&group, "core/text", Attributes::new());
    editor.select(Some(group.clone()));
    let outcome = BlockInserter::new(&registry, &mut editor).insert_as_child("core/image", Attributes::new());
    let id = outcome.id.expect("inserted");
    assert_eq!(editor.node_index(&id, &group), Some(1));
}

#[test]
fn insert_multiple_is_one_transaction() {
    let (registry, mut editor) = setup();
    let requests = [BlockRequest::new("core/heading"), BlockRequest::new("core/text")];
    let outcome = BlockInserter::new(&registry, &mut editor).insert_multiple(&requests, InsertOptions::default());
    assert!(outcome.success);
    assert_eq!(editor.root_names(), vec!["core/heading", "core/text"]);
    assert_eq!(outcome.id, Some(editor.roots()[0].id.clone()));
    assert_eq!(editor.undo_depth(), 1);
    assert_eq!(editor.mutation_counts().insert_nodes, 1);
    assert!(editor.undo());
    assert!(editor.roots().is_empty());
}

#[test]
fn insert_multiple_rejects_any_unregistered_entry() {
    let (registry, mut editor) = setup();
    let requests = [BlockRequest::new("core/heading"), BlockRequest::new("core/ghost")];
    let outcome = BlockInserter::new(&registry, &mut editor).insert_multiple(&requests, InsertOptions::default());
    assert_eq!(outcome.error, Some(InsertError::BlockNotRegistered("core/ghost".into())));
    assert!(editor.roots().is_empty());

    let outcome = BlockInserter::new(&registry, &mut editor).insert_multiple(&[], InsertOptions::default());
    assert_eq!(outcome.error, Some(InsertError::EmptyBatch));
}

#[test]
fn duplicate_copies_subtree_with_fresh_ids() {
    let (registry, mut editor) = setup();
    let group = editor.seed(&NodeId::root(), "core/group", attrs(json!({"align": "wide"})));
    editor.seed(&group, "core/heading", Attributes::new());
    let buttons = editor.seed(&group, "core/buttons", Attributes::new());
    editor.seed(&buttons, "core/button", Attributes::new());
    editor.seed(&NodeId::root(), "core/divider", Attributes::new());
    editor.select(Some(group.clone()));

    let outcome = BlockInserter::new(&registry, &mut editor).duplicate_selected();
    let copy_id = outcome.id.expect("duplicated");
    assert_eq!(editor.root_names(), vec!["core/group", "core/group", "core/divider"]);
    assert_eq!(editor.selected_node_id(), Some(copy_id.clone()));

    let original = editor.node(&group).expect("original");
    let copy = editor.node(&copy_id).expect("copy");
    assert_eq!(copy.descendant_count(), original.descendant_count());
    assert_eq!(copy.attributes, original.attributes);
    for id in copy.subtree_ids() {
        assert!(!original.subtree_ids().contains(&id));
    }
}

#[test]
fn replace_and_remove_selected() {
    let (registry, mut editor) = setup();
    let text = editor.seed(&NodeId::root(), "core/text", Attributes::new());
    editor.select(Some(text.clone()));

    let replaced = BlockInserter::new(&registry, &mut editor).replace_selected("core/heading", Attributes::new());
    let heading = replaced.id.expect("replaced");
    assert_eq!(editor.root_names(), vec!["core/heading"]);
    assert_eq!(editor.node(&text), None);

    let removed = BlockInserter::new(&registry, &mut editor).remove_selected();
    assert_eq!(removed.id, Some(heading));
    assert!(editor.roots().is_empty());
}

#[test]
fn preset_expands_in_one_transaction() {
    let (registry, mut editor) = setup();
    let outcome = BlockInserter::new(&registry, &mut editor).insert_preset("hero", InsertOptions::default());
    let id = outcome.id.expect("inserted");
    let hero = editor.node(&id).expect("hero");
    assert_eq!(hero.name, "core/group");
    assert_eq!(hero.descendant_count(), 4);
    assert_eq!(hero.attributes.get("align"), Some(&json!("full")));
    assert_eq!(hero.attributes.get("tagName"), Some(&json!("div")));
    assert_eq!(editor.undo_depth(), 1);

    let missing = BlockInserter::new(&registry, &mut editor).insert_preset("nope", InsertOptions::default());
    assert_eq!(missing.error_code(), Some("PresetNotFound"));
}

#[test]
fn allowed_types_gate_insertion() {
    use bdock_editor::BlockTypeFilter;

    let (registry, mut editor) = setup();
    editor.set_allowed_block_types(Some(vec!["core/text".into()]));
    assert!(!editor.is_type_registered("core/heading"));
    let outcome = BlockInserter::new(&registry, &mut editor).insert(
        "core/heading",
        Attributes::new(),
        InsertOptions::default(),
    );
    assert_eq!(outcome.error_code(), Some("BlockNotRegistered"));
}

#[test]
fn outcome_serializes_uniformly() {
    let (registry, mut editor) = setup();
    let outcome = BlockInserter::new(&registry, &mut editor).insert(
        "core/nope",
        Attributes::new(),
        InsertOptions::default(),
    );
    let value = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(value, json!({"success": false, "id": null, "error": "BlockNotRegistered"}));
}
