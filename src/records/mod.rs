// src/records/mod.rs
//! Record-map flattening — turns the private API's nested envelope into
//! `table -> id -> record`.
//!
//! A response carries a `recordMap` of heterogeneous tables. Each record
//! sits under one or more `value` wrappers (role and version containers
//! that changed shape over the API's lifetime), so the depth is not fixed.
//! Flattening descends through them and keeps only the innermost object.

pub mod block;
pub mod fields;

use crate::constants::RESERVED_TABLE_PREFIX;
use fields::Record;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub use block::{normalize_block, BlockObject, BlockParent, TypePayload};
pub use fields::PartialUser;

/// Flattened records keyed by table name, then record ID.
///
/// Both levels are ordered maps, so serialization and iteration are
/// lexicographic without a separate sort step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordMap {
    tables: BTreeMap<String, BTreeMap<String, Record>>,
}

/// One record together with its coordinates in the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEntry<'a> {
    pub table: &'a str,
    pub id: &'a str,
    pub object: &'a Record,
}

impl RecordMap {
    /// Records of one table, if the table survived flattening.
    pub fn table(&self, name: &str) -> Option<&BTreeMap<String, Record>> {
        self.tables.get(name)
    }

    pub fn record(&self, table: &str, id: &str) -> Option<&Record> {
        self.tables.get(table).and_then(|rows| rows.get(id))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of records per table.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.tables
            .iter()
            .map(|(table, rows)| (table.clone(), rows.len()))
            .collect()
    }

    /// All records in (table, id) order.
    pub fn entries(&self) -> impl Iterator<Item = RecordEntry<'_>> {
        self.tables.iter().flat_map(|(table, rows)| {
            rows.iter().map(move |(id, object)| RecordEntry {
                table: table.as_str(),
                id: id.as_str(),
                object,
            })
        })
    }

    /// Records of one table in id order; empty when the table is absent.
    pub fn table_entries<'a>(&'a self, name: &'a str) -> impl Iterator<Item = RecordEntry<'a>> {
        self.tables
            .get_key_value(name)
            .into_iter()
            .flat_map(|(table, rows)| {
                rows.iter().map(move |(id, object)| RecordEntry {
                    table: table.as_str(),
                    id: id.as_str(),
                    object,
                })
            })
    }

    /// Wraps the flattened records back into a response envelope.
    pub fn into_envelope(self) -> Value {
        let record_map = self
            .tables
            .into_iter()
            .map(|(table, rows)| {
                let rows = rows
                    .into_iter()
                    .map(|(id, record)| (id, Value::Object(record)))
                    .collect();
                (table, Value::Object(rows))
            })
            .collect();
        let mut envelope = serde_json::Map::new();
        envelope.insert("recordMap".to_string(), Value::Object(record_map));
        Value::Object(envelope)
    }
}

/// Flattens a raw API response into a [`RecordMap`].
///
/// Never fails: a missing or non-object `recordMap`, non-object tables and
/// records that unwrap to nothing all degrade to fewer entries. Reserved
/// `__`-prefixed tables are dropped, as are tables left with no records.
pub fn flatten_record_map(envelope: &Value) -> RecordMap {
    let Some(record_map) = envelope.get("recordMap").and_then(Value::as_object) else {
        log::debug!("Response carries no recordMap object");
        return RecordMap::default();
    };

    let mut tables = BTreeMap::new();
    for (table, rows) in record_map {
        if table.starts_with(RESERVED_TABLE_PREFIX) {
            continue;
        }
        let Some(rows) = rows.as_object() else {
            continue;
        };

        let flattened: BTreeMap<String, Record> = rows
            .iter()
            .filter_map(|(id, wrapped)| unwrap_record(wrapped).map(|r| (id.clone(), r.clone())))
            .collect();

        if flattened.is_empty() {
            log::debug!("Table '{}' has no usable records", table);
        } else {
            tables.insert(table.clone(), flattened);
        }
    }

    RecordMap { tables }
}

/// Descends through nested `value` wrappers to the innermost record.
///
/// Stops at the first level with no `value` key or whose `value` is not an
/// object. Returns `None` for a non-object input or an empty innermost object.
pub fn unwrap_record(wrapped: &Value) -> Option<&Record> {
    let mut current = wrapped.as_object()?;
    while let Some(next) = current.get("value").and_then(Value::as_object) {
        current = next;
    }
    if current.is_empty() {
        None
    } else {
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unwrap_descends_every_value_level() {
        let wrapped = json!({"role": "reader", "value": {"value": {"id": "a", "version": 3}}});
        assert_eq!(
            Value::Object(unwrap_record(&wrapped).unwrap().clone()),
            json!({"id": "a", "version": 3})
        );
    }

    #[test]
    fn unwrap_stops_at_non_object_value() {
        let wrapped = json!({"value": {"id": "a", "value": 42}});
        assert_eq!(
            Value::Object(unwrap_record(&wrapped).unwrap().clone()),
            json!({"id": "a", "value": 42})
        );
    }

    #[test]
    fn unwrap_rejects_empty_and_non_objects() {
        assert_eq!(unwrap_record(&json!({"value": {}})), None);
        assert_eq!(unwrap_record(&json!({})), None);
        assert_eq!(unwrap_record(&json!("text")), None);
        assert_eq!(unwrap_record(&json!(null)), None);
    }

    #[test]
    fn missing_or_malformed_record_map_is_empty() {
        assert!(flatten_record_map(&json!({})).is_empty());
        assert!(flatten_record_map(&json!({"recordMap": []})).is_empty());
        assert!(flatten_record_map(&json!("not an envelope")).is_empty());
    }

    #[test]
    fn reserved_and_empty_tables_are_dropped() {
        let envelope = json!({
            "recordMap": {
                "__version__": {"x": {"value": {"id": "x"}}},
                "space": {"s1": {"value": {}}, "s2": {}},
                "collection": "oops",
                "block": {"b1": {"value": {"id": "b1"}}},
            }
        });
        let flat = flatten_record_map(&envelope);
        assert_eq!(flat.table_names().collect::<Vec<_>>(), vec!["block"]);
        assert_eq!(flat.counts().get("block"), Some(&1));
    }

    #[test]
    fn entries_iterate_in_table_then_id_order() {
        let envelope = json!({
            "recordMap": {
                "notion_user": {"u2": {"value": {"id": "u2"}}, "u1": {"value": {"id": "u1"}}},
                "block": {"b1": {"value": {"id": "b1"}}},
            }
        });
        let flat = flatten_record_map(&envelope);
        let order: Vec<(&str, &str)> = flat.entries().map(|e| (e.table, e.id)).collect();
        assert_eq!(
            order,
            vec![("block", "b1"), ("notion_user", "u1"), ("notion_user", "u2")]
        );
        assert_eq!(flat.table_entries("notion_user").count(), 2);
        assert_eq!(flat.table_entries("collection").count(), 0);
    }

    #[test]
    fn flattening_is_idempotent_through_an_envelope() {
        let envelope = json!({
            "recordMap": {
                "block": {"abc": {"value": {"value": {"id": "abc", "type": "page"}}}},
            }
        });
        let once = flatten_record_map(&envelope);
        let twice = flatten_record_map(&once.clone().into_envelope());
        assert_eq!(once, twice);
    }
}
