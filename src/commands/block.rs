// src/commands/block.rs
//! Block commands: fetch one block, or one level of its children.
//!
//! Children take two sequential calls: the parent is fetched to read its
//! `content` list, then every listed child is fetched in one batch.

use crate::api::PrivateApi;
use crate::constants::BLOCK_TABLE;
use crate::error::AppError;
use crate::records::fields::Record;
use crate::records::{flatten_record_map, normalize_block, BlockObject};
use crate::types::NotionId;
use serde::Serialize;
use serde_json::Value;

/// A block as emitted by the block commands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockView {
    /// The flattened private record under its ID
    Raw { id: String, object: Record },
    /// The public-API-shaped translation
    Normalized(Box<BlockObject>),
}

impl BlockView {
    pub fn new(id: &str, record: &Record, notion_block_like: bool) -> Self {
        if notion_block_like {
            Self::Normalized(Box::new(normalize_block(record)))
        } else {
            Self::Raw {
                id: id.to_string(),
                object: record.clone(),
            }
        }
    }
}

/// Output of `block children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockChildrenReport {
    pub parent_id: NotionId,
    pub children: Vec<BlockView>,
}

/// Fetches one block.
///
/// When the response does not carry the requested ID but does carry other
/// blocks, the first of those (by ID) is returned instead.
pub async fn get_block(
    api: &dyn PrivateApi,
    block_id: &NotionId,
    notion_block_like: bool,
) -> Result<BlockView, AppError> {
    let response = api
        .sync_block_records(&[block_id.as_str()])
        .await
        .map_err(|e| e.context(format!("fetch block {}", block_id)))?;
    let flat = flatten_record_map(&response);

    if let Some(record) = flat.record(BLOCK_TABLE, block_id.as_str()) {
        return Ok(BlockView::new(block_id.as_str(), record, notion_block_like));
    }

    let first = flat.table_entries(BLOCK_TABLE).next();
    match first {
        Some(entry) => {
            log::warn!(
                "Block {} missing from response; using returned block {}",
                block_id,
                entry.id
            );
            Ok(BlockView::new(block_id.as_str(), entry.object, notion_block_like))
        }
        None => Err(AppError::RecordNotFound {
            table: BLOCK_TABLE.to_string(),
            id: block_id.to_string(),
        }),
    }
}

/// Fetches the direct children of a block, in `content` order.
///
/// Children missing from the batch response are skipped.
pub async fn block_children(
    api: &dyn PrivateApi,
    parent_id: &NotionId,
    notion_block_like: bool,
) -> Result<BlockChildrenReport, AppError> {
    let response = api
        .sync_block_records(&[parent_id.as_str()])
        .await
        .map_err(|e| e.context(format!("fetch parent block {}", parent_id)))?;
    let flat = flatten_record_map(&response);
    let parent = flat
        .record(BLOCK_TABLE, parent_id.as_str())
        .ok_or_else(|| AppError::RecordNotFound {
            table: BLOCK_TABLE.to_string(),
            id: parent_id.to_string(),
        })?;

    let child_ids = child_ids(parent);
    if child_ids.is_empty() {
        return Ok(BlockChildrenReport {
            parent_id: parent_id.clone(),
            children: Vec::new(),
        });
    }

    let id_refs: Vec<&str> = child_ids.iter().map(String::as_str).collect();
    let child_response = api
        .sync_block_records(&id_refs)
        .await
        .map_err(|e| e.context(format!("fetch {} children of {}", id_refs.len(), parent_id)))?;
    let children_flat = flatten_record_map(&child_response);

    let children: Vec<BlockView> = child_ids
        .iter()
        .filter_map(|id| match children_flat.record(BLOCK_TABLE, id) {
            Some(record) => Some(BlockView::new(id, record, notion_block_like)),
            None => {
                log::warn!("Child block {} of {} not returned; skipping", id, parent_id);
                None
            }
        })
        .collect();

    log::info!(
        "Block {}: {} of {} children returned",
        parent_id,
        children.len(),
        child_ids.len()
    );

    Ok(BlockChildrenReport {
        parent_id: parent_id.clone(),
        children,
    })
}

/// Trimmed, non-empty string entries of a block's `content` list.
pub fn child_ids(block: &Record) -> Vec<String> {
    block
        .get("content")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn child_ids_skip_blank_and_non_string_entries() {
        let block = json!({"content": [" a ", "", 7, null, "b"]});
        assert_eq!(child_ids(block.as_object().unwrap()), vec!["a", "b"]);

        let no_content = json!({"content": "a"});
        assert!(child_ids(no_content.as_object().unwrap()).is_empty());
    }

    #[test]
    fn raw_view_serializes_id_and_object() {
        let record = json!({"id": "x", "type": "text"});
        let view = BlockView::new("x", record.as_object().unwrap(), false);
        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({"id": "x", "object": {"id": "x", "type": "text"}})
        );
    }
}
