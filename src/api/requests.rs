// src/api/requests.rs
//! Fixed request payloads for the private API endpoints.
//!
//! Field names follow the web client's camelCase wire format exactly; the
//! service rejects payloads with missing loader or cursor fields.

use crate::constants::{
    COLLECTION_QUERY_FALLBACK_LIMIT, COLLECTION_USER_TIME_ZONE, LATEST_RECORD_VERSION,
    PAGE_CHUNK_LIMIT,
};
use crate::types::NotionId;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct RecordRef {
    pub id: String,
}

impl From<&NotionId> for RecordRef {
    fn from(id: &NotionId) -> Self {
        Self {
            id: id.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Cursor {
    pub stack: Vec<Value>,
}

/// `loadPageChunk` payload, keyed by raw page ID.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkRequest {
    pub page_id: String,
    pub limit: u32,
    pub chunk_number: u32,
    pub cursor: Cursor,
    pub vertical_columns: bool,
}

impl LoadPageChunkRequest {
    /// First chunk of a page.
    pub fn first_chunk(page_id: &NotionId) -> Self {
        Self {
            page_id: page_id.as_str().to_string(),
            limit: PAGE_CHUNK_LIMIT,
            chunk_number: 0,
            cursor: Cursor::default(),
            vertical_columns: false,
        }
    }
}

/// `loadCachedPageChunkV2` payload, keyed by a page reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadCachedPageChunkRequest {
    pub page: RecordRef,
    pub limit: u32,
    pub chunk_number: u32,
    pub cursor: Cursor,
    pub vertical_columns: bool,
}

impl LoadCachedPageChunkRequest {
    pub fn first_chunk(page_id: &NotionId) -> Self {
        Self {
            page: page_id.into(),
            limit: PAGE_CHUNK_LIMIT,
            chunk_number: 0,
            cursor: Cursor::default(),
            vertical_columns: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordRequest {
    pub table: String,
    pub id: String,
    pub version: i64,
}

/// Batch of latest-version record lookups, used by both
/// `syncRecordValuesMain` and `getRecordValues`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordValuesRequest {
    pub requests: Vec<RecordRequest>,
}

impl RecordValuesRequest {
    pub fn latest<'a>(table: &str, ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            requests: ids
                .into_iter()
                .map(|id| RecordRequest {
                    table: table.to_string(),
                    id: id.to_string(),
                    version: LATEST_RECORD_VERSION,
                })
                .collect(),
        }
    }
}

/// `queryCollection` payload.
///
/// The loader is the same reducer the web client sends for a plain table
/// view: no filters, no sorts, one results group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCollectionRequest {
    pub collection: RecordRef,
    pub collection_view: RecordRef,
    pub source: Value,
    pub loader: Value,
}

impl QueryCollectionRequest {
    /// Builds the query; a zero limit falls back to the service default.
    pub fn new(collection_id: &NotionId, view_id: &NotionId, limit: u32) -> Self {
        let limit = if limit == 0 {
            COLLECTION_QUERY_FALLBACK_LIMIT
        } else {
            limit
        };
        Self {
            collection: collection_id.into(),
            collection_view: view_id.into(),
            source: json!({
                "type": "collection",
                "id": collection_id.as_str(),
            }),
            loader: json!({
                "type": "reducer",
                "reducers": {
                    "collection_group_results": {
                        "type": "results",
                        "limit": limit,
                        "loadContentCover": true,
                    },
                },
                "sort": [],
                "filter": {"filters": [], "operator": "and"},
                "searchQuery": "",
                "userTimeZone": COLLECTION_USER_TIME_ZONE,
            }),
        }
    }
}
