// src/records/block.rs
//! Best-effort translation of private `block` records into the shape of
//! public API block objects.
//!
//! Only the envelope is translated: identity, parent, timestamps, authors,
//! trash state and children. Type-specific payloads are passed through
//! untouched under the block's own type name, and the full source record
//! rides along as `private_value` for anything the translation misses.

use super::fields::{
    bool_field, non_empty_array, non_empty_str, object_field, timestamp_field, PartialUser, Record,
};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Public-API-shaped block object.
///
/// Serializes as a single JSON object. The type payload is keyed by the
/// block type, so it can share a name with a fixed field (`table`,
/// `parent`, ...); on such a clash the later key wins, in the order
/// fixed fields, type payload, `private_value`, `table`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockObject {
    pub object: &'static str,
    pub id: Option<String>,
    pub block_type: Option<String>,
    pub parent: Option<BlockParent>,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
    pub created_by: Option<PartialUser>,
    pub last_edited_by: Option<PartialUser>,
    pub archived: Option<bool>,
    pub in_trash: Option<bool>,
    pub has_children: bool,
    /// At most one entry, keyed by the block type.
    pub type_payload: BTreeMap<String, TypePayload>,
    /// Source table, set by listings that mix tables.
    pub table: Option<String>,
    pub private_value: Record,
}

/// Where a block hangs in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockParent {
    BlockId { block_id: String },
    DatabaseId { database_id: String },
    Workspace { workspace: bool },
}

impl BlockParent {
    /// Maps a private `parent_table` onto the public parent kinds.
    ///
    /// Anything other than `collection` or `space` is treated as a block parent.
    pub fn from_parent_table(parent_table: Option<&str>, parent_id: &str) -> Self {
        match parent_table {
            Some("collection") => Self::DatabaseId {
                database_id: parent_id.to_string(),
            },
            Some("space") => Self::Workspace { workspace: true },
            _ => Self::BlockId {
                block_id: parent_id.to_string(),
            },
        }
    }
}

/// The type-named section of a block object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Value>>,
}

impl TypePayload {
    fn is_empty(&self) -> bool {
        self.properties.is_none() && self.format.is_none() && self.children.is_none()
    }
}

impl BlockObject {
    /// Tags the object with the table it was read from.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Renders the object as one JSON map with unique keys.
    pub fn to_json_map(&self) -> Result<Record, serde_json::Error> {
        let mut map = Record::new();
        put(&mut map, "object", Some(self.object))?;
        put(&mut map, "id", self.id.as_ref())?;
        put(&mut map, "type", self.block_type.as_ref())?;
        put(&mut map, "parent", self.parent.as_ref())?;
        put(&mut map, "created_time", self.created_time.as_ref())?;
        put(&mut map, "last_edited_time", self.last_edited_time.as_ref())?;
        put(&mut map, "created_by", self.created_by.as_ref())?;
        put(&mut map, "last_edited_by", self.last_edited_by.as_ref())?;
        put(&mut map, "archived", self.archived)?;
        put(&mut map, "in_trash", self.in_trash)?;
        put(&mut map, "has_children", Some(self.has_children))?;
        for (block_type, payload) in &self.type_payload {
            put(&mut map, block_type, Some(payload))?;
        }
        map.insert(
            "private_value".to_string(),
            Value::Object(self.private_value.clone()),
        );
        put(&mut map, "table", self.table.as_ref())?;
        Ok(map)
    }
}

fn put<T: Serialize>(
    map: &mut Record,
    key: &str,
    value: Option<T>,
) -> Result<(), serde_json::Error> {
    if let Some(value) = value {
        map.insert(key.to_string(), serde_json::to_value(value)?);
    }
    Ok(())
}

impl Serialize for BlockObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

/// Normalizes one flattened block record.
///
/// Total over any object: each output field is derived independently and
/// a missing or mistyped source field simply leaves its output field out.
pub fn normalize_block(record: &Record) -> BlockObject {
    let block_type = non_empty_str(record, "type");
    let content = non_empty_array(record, "content");

    let parent = non_empty_str(record, "parent_id").map(|parent_id| {
        BlockParent::from_parent_table(non_empty_str(record, "parent_table"), parent_id)
    });

    let alive = bool_field(record, "alive");

    let mut type_payload = BTreeMap::new();
    if let Some(block_type) = block_type {
        let payload = TypePayload {
            properties: object_field(record, "properties").cloned(),
            format: object_field(record, "format").cloned(),
            children: content.cloned(),
        };
        if !payload.is_empty() {
            type_payload.insert(block_type.to_string(), payload);
        }
    }

    BlockObject {
        object: "block",
        id: non_empty_str(record, "id").map(str::to_string),
        block_type: block_type.map(str::to_string),
        parent,
        created_time: timestamp_field(record, "created_time"),
        last_edited_time: timestamp_field(record, "last_edited_time"),
        created_by: non_empty_str(record, "created_by_id").and_then(PartialUser::from_id),
        last_edited_by: non_empty_str(record, "last_edited_by_id").and_then(PartialUser::from_id),
        archived: alive.map(|alive| !alive),
        in_trash: alive.map(|alive| !alive),
        has_children: content.is_some(),
        type_payload,
        table: None,
        private_value: record.clone(),
    }
}
