// src/commands/page.rs
//! Page-level commands: raw fetch, flattened object listing, and the
//! block-type survey.

use super::{ListedObject, RecordObject};
use crate::api::{PageEndpoint, PrivateApi};
use crate::constants::{BLOCK_TABLE, PUBLIC_API_BLOCK_TYPES};
use crate::error::AppError;
use crate::records::fields::non_empty_str;
use crate::records::{flatten_record_map, normalize_block, RecordMap};
use crate::types::NotionId;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Fetches a page's first chunk and returns the raw response.
pub async fn fetch_page(
    api: &dyn PrivateApi,
    page_id: &NotionId,
    endpoint: PageEndpoint,
) -> Result<Value, AppError> {
    api.load_page(page_id, endpoint)
        .await
        .map_err(|e| e.context(format!("fetch page {} via {}", page_id, endpoint.as_str())))
}

/// Filters applied to a page object listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectFilters {
    /// Exact table name; empty keeps every table.
    pub table: String,
    /// Lowercased block type; empty keeps every block.
    pub block_type: String,
    pub notion_block_like: bool,
}

impl ObjectFilters {
    pub fn new(table: Option<String>, block_type: Option<String>, notion_block_like: bool) -> Self {
        Self {
            table: table.unwrap_or_default().trim().to_string(),
            block_type: block_type.unwrap_or_default().trim().to_lowercase(),
            notion_block_like,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectsMeta {
    pub filters: ObjectFilters,
}

/// Output of `page objects`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageObjectsReport {
    pub page_id: NotionId,
    pub counts: BTreeMap<String, usize>,
    pub objects: Vec<ListedObject>,
    pub meta: ObjectsMeta,
}

/// Output of `page types`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTypesReport {
    pub page_id: NotionId,
    pub seen_block_types: BTreeMap<String, usize>,
    pub public_api_documented_types: &'static [&'static str],
    pub not_in_public_api_type_list: Vec<String>,
}

pub async fn page_objects(
    api: &dyn PrivateApi,
    page_id: &NotionId,
    filters: ObjectFilters,
) -> Result<PageObjectsReport, AppError> {
    let response = api
        .load_page(page_id, PageEndpoint::Auto)
        .await
        .map_err(|e| e.context(format!("fetch page {} for objects", page_id)))?;

    let flat = flatten_record_map(&response);
    let objects = list_objects(&flat, &filters);
    log::info!(
        "Page {}: {} records across {} tables, {} listed",
        page_id,
        flat.entries().count(),
        flat.counts().len(),
        objects.len()
    );

    Ok(PageObjectsReport {
        page_id: page_id.clone(),
        counts: flat.counts(),
        objects,
        meta: ObjectsMeta { filters },
    })
}

/// Lists records in (table, id) order after applying `filters`.
///
/// Counts elsewhere are always unfiltered; only this listing narrows.
pub fn list_objects(flat: &RecordMap, filters: &ObjectFilters) -> Vec<ListedObject> {
    flat.entries()
        .filter(|entry| filters.table.is_empty() || entry.table == filters.table)
        .filter(|entry| {
            entry.table != BLOCK_TABLE
                || filters.block_type.is_empty()
                || non_empty_str(entry.object, "type")
                    .is_some_and(|t| t.to_lowercase() == filters.block_type)
        })
        .map(|entry| {
            if entry.table == BLOCK_TABLE && filters.notion_block_like {
                ListedObject::Block(Box::new(
                    normalize_block(entry.object).with_table(entry.table),
                ))
            } else {
                ListedObject::Record(RecordObject::from(entry))
            }
        })
        .collect()
}

pub async fn page_types(
    api: &dyn PrivateApi,
    page_id: &NotionId,
) -> Result<PageTypesReport, AppError> {
    let response = api
        .load_page(page_id, PageEndpoint::Auto)
        .await
        .map_err(|e| e.context(format!("fetch page {} for types", page_id)))?;

    let seen = survey_block_types(&flatten_record_map(&response));
    let not_in_public_api_type_list = types_missing_from_public_api(&seen);

    Ok(PageTypesReport {
        page_id: page_id.clone(),
        seen_block_types: seen,
        public_api_documented_types: PUBLIC_API_BLOCK_TYPES,
        not_in_public_api_type_list,
    })
}

/// Counts block records by trimmed, lowercased type.
pub fn survey_block_types(flat: &RecordMap) -> BTreeMap<String, usize> {
    let mut seen = BTreeMap::new();
    for entry in flat.table_entries(BLOCK_TABLE) {
        let block_type = non_empty_str(entry.object, "type")
            .map(|t| t.trim().to_lowercase())
            .unwrap_or_default();
        if !block_type.is_empty() {
            *seen.entry(block_type).or_insert(0) += 1;
        }
    }
    seen
}

/// Seen types the public API does not document, sorted.
pub fn types_missing_from_public_api(seen: &BTreeMap<String, usize>) -> Vec<String> {
    let documented: BTreeSet<&str> = PUBLIC_API_BLOCK_TYPES.iter().copied().collect();
    seen.keys()
        .filter(|t| !documented.contains(t.as_str()))
        .cloned()
        .collect()
}
