//! Flatten-then-normalize over whole response envelopes.

use nocli::{flatten_record_map, normalize_block, unwrap_record, BlockParent, NotionId};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn reflatten(envelope: &Value) -> nocli::RecordMap {
    flatten_record_map(&flatten_record_map(envelope).into_envelope())
}

#[test]
fn double_wrapped_page_flattens_and_normalizes() {
    let envelope = json!({"recordMap": {"block": {"abc": {"value": {"value": {
        "id": "abc", "type": "page", "alive": true, "content": ["x"]
    }}}}}});

    let flat = flatten_record_map(&envelope);
    assert_eq!(
        serde_json::to_value(&flat).unwrap(),
        json!({"block": {"abc": {"id": "abc", "type": "page", "alive": true, "content": ["x"]}}})
    );

    let record = flat.record("block", "abc").unwrap();
    let block = normalize_block(record);
    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(value["object"], json!("block"));
    assert_eq!(value["id"], json!("abc"));
    assert_eq!(value["type"], json!("page"));
    assert_eq!(value["has_children"], json!(true));
    assert_eq!(value["archived"], json!(false));
    assert_eq!(value["in_trash"], json!(false));
    assert_eq!(value["page"]["children"], json!(["x"]));
    assert_eq!(value["private_value"], Value::Object(record.clone()));
}

#[test]
fn unwrap_is_idempotent_for_assorted_shapes() {
    let shapes = [
        json!({"id": "a"}),
        json!({"value": {"id": "a", "role": "editor"}}),
        json!({"role": "reader", "value": {"value": {"value": {"id": "a"}}}}),
        json!({"value": "scalar", "id": "a"}),
        json!({"value": [1, 2], "other": null}),
        json!({"value": {"value": {}}}),
    ];
    for shape in shapes {
        let envelope = json!({"recordMap": {"t": {"id": shape.clone()}}});
        assert_eq!(
            flatten_record_map(&envelope),
            reflatten(&envelope),
            "shape {}",
            shape
        );
    }
}

#[test]
fn tables_of_empty_records_and_reserved_tables_vanish() {
    let envelope = json!({"recordMap": {
        "__meta": {"a": {"value": {"id": "a"}}},
        "discussion": {"d1": {"value": {}}, "d2": {"value": {"value": {}}}},
        "comment": {},
        "block": {"b": {"value": {"id": "b"}}, "gone": {"value": {}}},
    }});
    let flat = flatten_record_map(&envelope);
    assert_eq!(flat.table_names().collect::<Vec<_>>(), vec!["block"]);
    assert!(flat.record("block", "gone").is_none());
    assert_eq!(unwrap_record(&json!({"value": {}})), None);
}

#[test]
fn realistic_chunk_normalizes_parents_and_timestamps() {
    let envelope = json!({"recordMap": {
        "block": {
            "row": {"spaceId": "s", "value": {"value": {
                "id": "row", "type": "page", "parent_id": "coll", "parent_table": "collection",
                "created_time": 1700000000000_i64, "last_edited_time": 1700000000500.0,
                "created_by_id": "u1", "last_edited_by_id": "u2", "alive": true,
                "properties": {"title": [["Row"]]}
            }, "role": "editor"}},
            "top": {"value": {
                "id": "top", "type": "page", "parent_id": "space-1", "parent_table": "space",
                "created_time": -1, "alive": false, "content": []
            }},
        },
        "notion_user": {"u1": {"value": {"id": "u1", "email": "a@example.com"}}},
    }});
    let flat = flatten_record_map(&envelope);

    let row = normalize_block(flat.record("block", "row").unwrap());
    assert_eq!(
        row.parent,
        Some(BlockParent::DatabaseId {
            database_id: "coll".to_string()
        })
    );
    assert_eq!(row.created_time.as_deref(), Some("2023-11-14T22:13:20Z"));
    assert_eq!(row.last_edited_time.as_deref(), Some("2023-11-14T22:13:20.500Z"));
    assert_eq!(row.last_edited_by.as_ref().map(|u| u.id.as_str()), Some("u2"));
    assert!(!row.has_children);

    let top = serde_json::to_value(normalize_block(flat.record("block", "top").unwrap())).unwrap();
    assert_eq!(top["parent"], json!({"type": "workspace", "workspace": true}));
    assert_eq!(top.get("created_time"), None);
    assert_eq!(top["archived"], json!(true));
    assert_eq!(top["in_trash"], json!(true));
    assert_eq!(top["has_children"], json!(false));
    assert_eq!(top.get("page"), None);

    assert_eq!(flat.counts().get("notion_user"), Some(&1));
}

#[test]
fn id_normalization_from_page_url() {
    let id = NotionId::parse("https://www.example.com/My-Page-1234567890abcdef1234567890abcdef")
        .unwrap();
    assert_eq!(id.as_str(), "12345678-90ab-cdef-1234-567890abcdef");
}
