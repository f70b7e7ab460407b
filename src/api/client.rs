// src/api/client.rs
//! Thin HTTP client for the private API.
//!
//! Handles session-cookie authentication and the browser-like headers the
//! endpoints expect, then hands back decoded JSON without interpreting it.

use crate::constants::{
    ACTIVE_USER_HEADER, DEFAULT_BASE_URL, ERROR_BODY_PREVIEW_LENGTH, REQUEST_TIMEOUT_SECS,
    USER_AGENT,
};
use crate::error::AppError;
use crate::types::ValidationError;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Session credentials harvested from a signed-in browser.
///
/// Blank fields count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: Option<String>,
    pub token_v2: Option<String>,
    pub notion_user_id: Option<String>,
    pub active_user_id: Option<String>,
    /// Raw `Cookie` header; wins over `token_v2` / `notion_user_id`.
    pub cookie: Option<String>,
}

impl Credentials {
    /// Builds the `Cookie` header value, or `None` when there is nothing to send.
    pub fn cookie_header(&self) -> Option<String> {
        if let Some(cookie) = present(&self.cookie) {
            return Some(cookie.to_string());
        }

        let parts: Vec<String> = [
            ("token_v2", present(&self.token_v2)),
            ("notion_user_id", present(&self.notion_user_id)),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{}={}", name, v)))
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }

    /// Whether enough is present to authenticate a request.
    pub fn has_auth_material(&self) -> bool {
        present(&self.cookie).is_some()
            || (present(&self.token_v2).is_some() && present(&self.notion_user_id).is_some())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A reqwest client bound to one base URL and one set of credentials.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: Url,
}

impl NotionHttpClient {
    /// Creates a client carrying the session headers on every request.
    pub fn new(credentials: &Credentials) -> Result<Self, AppError> {
        let raw_base = present(&credentials.base_url).unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_base).map_err(|e| ValidationError::InvalidUrl {
            url: raw_base.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .default_headers(Self::create_headers(&base_url, credentials)?)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::MissingConfiguration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Creates the default headers for private API requests.
    fn create_headers(
        base_url: &Url,
        credentials: &Credentials,
    ) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();
        let origin = base_url.origin().ascii_serialization();

        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ORIGIN, header_value("Origin", &origin)?);
        headers.insert(
            header::REFERER,
            header_value("Referer", &format!("{}/", origin))?,
        );
        headers.insert(
            "X-Requested-With",
            header::HeaderValue::from_static("XMLHttpRequest"),
        );

        if let Some(cookie) = credentials.cookie_header() {
            let mut value = header_value("Cookie", &cookie)?;
            value.set_sensitive(true);
            headers.insert(header::COOKIE, value);
        }
        if let Some(active_user) = present(&credentials.active_user_id) {
            headers.insert(
                ACTIVE_USER_HEADER,
                header_value(ACTIVE_USER_HEADER, active_user)?,
            );
        }

        Ok(headers)
    }

    /// Resolves an endpoint path against the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, AppError> {
        self.base_url.join(endpoint).map_err(|e| {
            ValidationError::InvalidUrl {
                url: endpoint.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<header::HeaderValue, AppError> {
    header::HeaderValue::from_str(value).map_err(|e| {
        AppError::MissingConfiguration(format!("Invalid {} header value: {}", name, e))
    })
}

#[async_trait::async_trait]
impl super::PrivateApi for NotionHttpClient {
    async fn post_json(&self, endpoint: &str, payload: Value) -> Result<Value, AppError> {
        let url = self.endpoint_url(endpoint)?;
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| AppError::NetworkFailure {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AppError::NetworkFailure {
                endpoint: endpoint.to_string(),
                source,
            })?;
        log::debug!("{} -> {} ({} bytes)", endpoint, status, body.len());

        decode_response(endpoint, status.as_u16(), &body)
    }
}

/// Maps a status code and body to the decoded JSON object or an error.
pub fn decode_response(endpoint: &str, status: u16, body: &str) -> Result<Value, AppError> {
    if !(200..300).contains(&status) {
        return Err(AppError::NotionService {
            endpoint: endpoint.to_string(),
            status,
            body: preview(body.trim()),
        });
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| AppError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: format!("decode response json: {}", e),
        })?;

    if !value.is_object() {
        return Err(AppError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: "response body is not a JSON object".to_string(),
        });
    }
    Ok(value)
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}
