// src/commands/collection.rs
use super::RecordObject;
use crate::api::PrivateApi;
use crate::error::AppError;
use crate::records::flatten_record_map;
use crate::types::NotionId;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Output of `collection query`: the raw response, or its flattened records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CollectionQueryOutput {
    Raw(Value),
    Flattened(CollectionObjectsReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionObjectsReport {
    pub collection_id: NotionId,
    pub view_id: NotionId,
    pub counts: BTreeMap<String, usize>,
    pub objects: Vec<RecordObject>,
}

/// Queries one collection view for up to `limit` rows.
pub async fn query_collection(
    api: &dyn PrivateApi,
    collection_id: &NotionId,
    view_id: &NotionId,
    limit: u32,
    flatten: bool,
) -> Result<CollectionQueryOutput, AppError> {
    let response = api
        .query_collection(collection_id, view_id, limit)
        .await
        .map_err(|e| {
            e.context(format!(
                "query collection {} view {}",
                collection_id, view_id
            ))
        })?;

    if !flatten {
        return Ok(CollectionQueryOutput::Raw(response));
    }

    let flat = flatten_record_map(&response);
    Ok(CollectionQueryOutput::Flattened(CollectionObjectsReport {
        collection_id: collection_id.clone(),
        view_id: view_id.clone(),
        counts: flat.counts(),
        objects: flat.entries().map(RecordObject::from).collect(),
    }))
}
