// src/api/mod.rs
//! Private API interaction — the ability to POST fixed request shapes to
//! the browser-facing endpoints and get raw JSON envelopes back.
//!
//! Commands depend on the [`PrivateApi`] trait, never on HTTP details, so
//! they can be exercised against canned envelopes.

pub mod client;
pub mod requests;

use crate::constants::{
    BLOCK_TABLE, GET_RECORD_VALUES_ENDPOINT, LOAD_CACHED_PAGE_CHUNK_V2_ENDPOINT,
    LOAD_PAGE_CHUNK_ENDPOINT, NOTION_USER_TABLE, QUERY_COLLECTION_ENDPOINT,
    SYNC_RECORD_VALUES_ENDPOINT,
};
use crate::error::AppError;
use crate::types::NotionId;
use requests::{
    LoadCachedPageChunkRequest, LoadPageChunkRequest, QueryCollectionRequest, RecordValuesRequest,
};
use serde_json::Value;

/// Which page-chunk endpoint to load a page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PageEndpoint {
    /// `loadPageChunk`, falling back to `loadCachedPageChunkV2` on any error
    #[default]
    Auto,
    LoadPageChunk,
    LoadCachedPageChunkV2,
}

impl PageEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::LoadPageChunk => "loadPageChunk",
            Self::LoadCachedPageChunkV2 => "loadCachedPageChunkV2",
        }
    }
}

/// The ability to call the private API.
///
/// Implementors supply `post_json`; every request shape the tool uses is a
/// provided method on top of it.
#[async_trait::async_trait]
pub trait PrivateApi: Send + Sync {
    /// POSTs `payload` to `endpoint` (a path relative to the base URL) and
    /// returns the decoded JSON object.
    async fn post_json(&self, endpoint: &str, payload: Value) -> Result<Value, AppError>;

    async fn load_page_chunk(&self, page_id: &NotionId) -> Result<Value, AppError> {
        let payload = serde_json::to_value(LoadPageChunkRequest::first_chunk(page_id))?;
        self.post_json(LOAD_PAGE_CHUNK_ENDPOINT, payload).await
    }

    async fn load_cached_page_chunk_v2(&self, page_id: &NotionId) -> Result<Value, AppError> {
        let payload = serde_json::to_value(LoadCachedPageChunkRequest::first_chunk(page_id))?;
        self.post_json(LOAD_CACHED_PAGE_CHUNK_V2_ENDPOINT, payload)
            .await
    }

    /// Loads a page's first chunk through the chosen endpoint.
    async fn load_page(
        &self,
        page_id: &NotionId,
        endpoint: PageEndpoint,
    ) -> Result<Value, AppError> {
        match endpoint {
            PageEndpoint::LoadPageChunk => self.load_page_chunk(page_id).await,
            PageEndpoint::LoadCachedPageChunkV2 => self.load_cached_page_chunk_v2(page_id).await,
            PageEndpoint::Auto => match self.load_page_chunk(page_id).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    log::warn!(
                        "loadPageChunk failed for {} ({}); retrying via loadCachedPageChunkV2",
                        page_id,
                        e
                    );
                    self.load_cached_page_chunk_v2(page_id).await
                }
            },
        }
    }

    /// Fetches the latest version of each block in one batch.
    async fn sync_block_records(&self, block_ids: &[&str]) -> Result<Value, AppError> {
        let payload = serde_json::to_value(RecordValuesRequest::latest(
            BLOCK_TABLE,
            block_ids.iter().copied(),
        ))?;
        self.post_json(SYNC_RECORD_VALUES_ENDPOINT, payload).await
    }

    /// Fetches `notion_user` records in one batch.
    async fn get_user_records(&self, user_ids: &[&str]) -> Result<Value, AppError> {
        let payload = serde_json::to_value(RecordValuesRequest::latest(
            NOTION_USER_TABLE,
            user_ids.iter().copied(),
        ))?;
        self.post_json(GET_RECORD_VALUES_ENDPOINT, payload).await
    }

    async fn query_collection(
        &self,
        collection_id: &NotionId,
        view_id: &NotionId,
        limit: u32,
    ) -> Result<Value, AppError> {
        let payload =
            serde_json::to_value(QueryCollectionRequest::new(collection_id, view_id, limit))?;
        self.post_json(QUERY_COLLECTION_ENDPOINT, payload).await
    }
}

pub use client::{Credentials, NotionHttpClient};
