// src/commands/user.rs
use super::RecordObject;
use crate::api::PrivateApi;
use crate::constants::NOTION_USER_TABLE;
use crate::error::AppError;
use crate::records::flatten_record_map;
use crate::types::NotionId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output of `user get`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsersReport {
    pub counts: BTreeMap<String, usize>,
    pub users: Vec<RecordObject>,
}

/// Fetches `notion_user` records; users the service does not return are
/// simply absent from the listing.
pub async fn get_users(
    api: &dyn PrivateApi,
    user_ids: &[NotionId],
) -> Result<UsersReport, AppError> {
    let ids: Vec<&str> = user_ids.iter().map(NotionId::as_str).collect();
    let response = api
        .get_user_records(&ids)
        .await
        .map_err(|e| e.context(format!("fetch {} user records", ids.len())))?;

    let flat = flatten_record_map(&response);
    Ok(UsersReport {
        counts: flat.counts(),
        users: flat
            .table_entries(NOTION_USER_TABLE)
            .map(RecordObject::from)
            .collect(),
    })
}
