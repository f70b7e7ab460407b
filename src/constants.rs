// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Reading these constants should tell you how the tool talks to Notion:
//! where it connects, how long it waits, how much it asks for.

// ---------------------------------------------------------------------------
// Private API boundaries
// ---------------------------------------------------------------------------

/// The browser-facing origin the private API lives under.
pub const DEFAULT_BASE_URL: &str = "https://www.notion.so";

/// Overall timeout for one private API call.
///
/// Each command makes at most two sequential calls, so this also bounds
/// the command's network time.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How many blocks a page chunk request asks for.
pub const PAGE_CHUNK_LIMIT: u32 = 100;

/// Result limit for a collection query when the caller passes a non-positive one.
pub const COLLECTION_QUERY_FALLBACK_LIMIT: u32 = 100;

/// Result limit the `collection query` command asks for by default.
pub const COLLECTION_QUERY_DEFAULT_LIMIT: u32 = 500;

/// Time zone the collection loader evaluates date filters in.
pub const COLLECTION_USER_TIME_ZONE: &str = "America/Los_Angeles";

/// `version` sent in record sync requests; -1 asks for the latest.
pub const LATEST_RECORD_VERSION: i64 = -1;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

pub const LOAD_PAGE_CHUNK_ENDPOINT: &str = "/api/v3/loadPageChunk";
pub const LOAD_CACHED_PAGE_CHUNK_V2_ENDPOINT: &str = "/api/v3/loadCachedPageChunkV2";
pub const SYNC_RECORD_VALUES_ENDPOINT: &str = "/api/v3/syncRecordValuesMain";
pub const GET_RECORD_VALUES_ENDPOINT: &str = "/api/v3/getRecordValues";
pub const QUERY_COLLECTION_ENDPOINT: &str = "/api/v3/queryCollection?src=initial_load";

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Header the web client uses to pick one of several signed-in users.
pub const ACTIVE_USER_HEADER: &str = "x-notion-active-user-header";

pub const USER_AGENT: &str = concat!("Mozilla/5.0 nocli/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Record tables
// ---------------------------------------------------------------------------

pub const BLOCK_TABLE: &str = "block";
pub const NOTION_USER_TABLE: &str = "notion_user";

/// Tables with this prefix are internal bookkeeping, not records.
pub const RESERVED_TABLE_PREFIX: &str = "__";

/// Block types documented by the public Notion API.
///
/// The private API uses its own vocabulary (`text`, `header`, `page`, ...),
/// so the `page types` command diffs against this list.
pub const PUBLIC_API_BLOCK_TYPES: &[&str] = &[
    "audio",
    "bookmark",
    "breadcrumb",
    "bulleted_list_item",
    "callout",
    "child_database",
    "child_page",
    "code",
    "column",
    "column_list",
    "divider",
    "embed",
    "equation",
    "file",
    "heading_1",
    "heading_2",
    "heading_3",
    "image",
    "link_preview",
    "link_to_page",
    "numbered_list_item",
    "paragraph",
    "pdf",
    "quote",
    "synced_block",
    "table",
    "table_of_contents",
    "table_row",
    "template",
    "to_do",
    "toggle",
    "unsupported",
    "video",
];

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
