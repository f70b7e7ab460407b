// src/commands/mod.rs
//! Command orchestration: normalize IDs, call the private API, flatten or
//! normalize, then emit JSON.
//!
//! Each operation takes an already-built [`PrivateApi`] handle and plain
//! option values. Nothing is read from ambient state.

pub mod auth;
pub mod block;
pub mod collection;
pub mod page;
pub mod user;

use crate::api::{NotionHttpClient, PrivateApi};
use crate::config::{
    AuthCommand, BlockCommand, CollectionCommand, Command, PageCommand, SessionConfig,
    UserCommand,
};
use crate::error::AppError;
use crate::output::emit_json;
use crate::records::fields::Record;
use crate::records::{BlockObject, RecordEntry};
use crate::types::NotionId;
use serde::Serialize;

/// The object entry points, as printed by `nocli objects`.
pub const ENTRY_POINTS: &str = "\
Available object entry points:
  nocli page objects <page-url-or-id>      # Flatten page recordMap tables
  nocli page objects <page> --table block --notion-block-like
                                            # Notion-like block objects
  nocli page types <page-url-or-id>         # Seen block types vs public API types
  nocli block get <block-id> --notion-block-like
                                            # Single block as normalized object
  nocli block children <block-id>           # Direct child block objects
  nocli collection query <collection-id> <view-id> --flatten
                                            # Collection/view object rows
  nocli user get <user-id>...               # notion_user records
";

/// An owned flattened record with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordObject {
    pub table: String,
    pub id: String,
    pub object: Record,
}

impl From<RecordEntry<'_>> for RecordObject {
    fn from(entry: RecordEntry<'_>) -> Self {
        Self {
            table: entry.table.to_string(),
            id: entry.id.to_string(),
            object: entry.object.clone(),
        }
    }
}

/// One item of an object listing: a raw record or a normalized block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListedObject {
    Record(RecordObject),
    Block(Box<BlockObject>),
}

/// Parses an operator-supplied ID, naming what it was meant to be on failure.
pub fn parse_id(input: &str, what: &str) -> Result<NotionId, AppError> {
    NotionId::parse(input).map_err(|e| AppError::from(e).context(format!("parse {} id", what)))
}

/// Runs one command end to end.
///
/// `auth` and `objects` never touch the network; every other command gets
/// a client built from the resolved credentials.
pub async fn execute(command: Command, session: &SessionConfig) -> Result<(), AppError> {
    match command {
        Command::Objects => {
            print!("{}", ENTRY_POINTS);
            Ok(())
        }
        Command::Auth(AuthCommand::ImportCurl {
            input,
            store_cookie,
        }) => {
            let raw = auth::read_input(input.as_deref())?;
            let summary = auth::import_curl(&raw, &session.config_path, store_cookie)?;
            print!("{}", summary);
            Ok(())
        }
        other => {
            if !session.credentials.has_auth_material() {
                log::warn!(
                    "No complete session found (need cookie, or token_v2 and notion_user_id); requests will likely be rejected"
                );
            }
            let client = NotionHttpClient::new(&session.credentials)?;
            execute_with(&client, other).await
        }
    }
}

/// Runs a network command against the given API handle.
pub async fn execute_with(api: &dyn PrivateApi, command: Command) -> Result<(), AppError> {
    match command {
        Command::Page(PageCommand::Fetch {
            url_or_id,
            endpoint,
            output,
        }) => {
            let page_id = parse_id(&url_or_id, "page")?;
            let response = page::fetch_page(api, &page_id, endpoint).await?;
            emit_json(&response, output.output.as_deref())?;
        }
        Command::Page(PageCommand::Objects {
            url_or_id,
            table,
            block_type,
            notion_block_like,
            output,
        }) => {
            let page_id = parse_id(&url_or_id, "page")?;
            let filters = page::ObjectFilters::new(table, block_type, notion_block_like);
            let report = page::page_objects(api, &page_id, filters).await?;
            emit_json(&report, output.output.as_deref())?;
        }
        Command::Page(PageCommand::Types { url_or_id, output }) => {
            let page_id = parse_id(&url_or_id, "page")?;
            let report = page::page_types(api, &page_id).await?;
            emit_json(&report, output.output.as_deref())?;
        }
        Command::Block(BlockCommand::Get {
            id,
            notion_block_like,
            output,
        }) => {
            let block_id = parse_id(&id, "block")?;
            let view = block::get_block(api, &block_id, notion_block_like).await?;
            emit_json(&view, output.output.as_deref())?;
        }
        Command::Block(BlockCommand::Children {
            id,
            notion_block_like,
            output,
        }) => {
            let block_id = parse_id(&id, "block")?;
            let report = block::block_children(api, &block_id, notion_block_like).await?;
            emit_json(&report, output.output.as_deref())?;
        }
        Command::Collection(CollectionCommand::Query {
            collection_id,
            view_id,
            limit,
            flatten,
            output,
        }) => {
            let collection_id = parse_id(&collection_id, "collection")?;
            let view_id = parse_id(&view_id, "view")?;
            let result =
                collection::query_collection(api, &collection_id, &view_id, limit, flatten)
                    .await?;
            emit_json(&result, output.output.as_deref())?;
        }
        Command::User(UserCommand::Get { ids, output }) => {
            let user_ids = ids
                .iter()
                .map(|id| parse_id(id, "user"))
                .collect::<Result<Vec<_>, _>>()?;
            let report = user::get_users(api, &user_ids).await?;
            emit_json(&report, output.output.as_deref())?;
        }
        Command::Auth(_) | Command::Objects => {
            return Err(AppError::MissingConfiguration(
                "command does not use the private API".to_string(),
            ));
        }
    }
    Ok(())
}
