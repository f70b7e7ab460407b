// src/lib.rs
//! nocli library — inspects Notion pages, blocks and collections through
//! the browser-facing private API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`
//! - **Configuration** — `CommandLineInput`, `ConfigFile`, `SessionConfig`
//! - **Record maps** — `flatten_record_map`, `RecordMap`, `normalize_block`, `BlockObject`
//! - **Domain types** — `NotionId`
//! - **API client** — `PrivateApi`, `NotionHttpClient`, `Credentials`
//! - **Commands** — one module per command group under `commands`

pub mod api;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod records;
pub mod types;

// --- Error Handling ---
pub use crate::error::AppError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ConfigFile, SessionConfig};

// --- Record Maps ---
pub use crate::records::{
    flatten_record_map, normalize_block, unwrap_record, BlockObject, BlockParent, PartialUser,
    RecordEntry, RecordMap, TypePayload,
};

// --- Domain Types ---
pub use crate::types::NotionId;

// --- API Client ---
pub use crate::api::{Credentials, NotionHttpClient, PageEndpoint, PrivateApi};
