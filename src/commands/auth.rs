// src/commands/auth.rs
//! Credential import from a DevTools "Copy as cURL" paste.
//!
//! The paste is searched, not parsed: the `cookie:` header is preferred,
//! with loose matches anywhere in the text as a fallback, so output from
//! different browsers and shells all works.

use crate::config::ConfigFile;
use crate::constants::{ACTIVE_USER_HEADER, DEFAULT_BASE_URL};
use crate::error::AppError;
use regex::Regex;
use std::fmt;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

lazy_static::lazy_static! {
    static ref COOKIE_HEADER: Regex = Regex::new(r#"(?im)cookie\s*:\s*([^\r\n"']+)"#)
        .expect("Failed to compile cookie header regex - this is a bug in the code");
    static ref TOKEN_V2: Regex = Regex::new(r#"(?i)token_v2=([^;\s"']+)"#)
        .expect("Failed to compile token_v2 regex - this is a bug in the code");
    static ref USER_ID: Regex = Regex::new(r"(?i)notion_user_id=([0-9a-f\-]{32,36})")
        .expect("Failed to compile notion_user_id regex - this is a bug in the code");
    static ref ACTIVE_USER: Regex = Regex::new(&format!(
        r"(?im){}\s*:\s*([0-9a-f\-]{{32,36}})",
        ACTIVE_USER_HEADER
    ))
    .expect("Failed to compile active user regex - this is a bug in the code");
    static ref NOTION_ORIGIN: Regex = Regex::new(r"https://www\.notion\.so")
        .expect("Failed to compile origin regex - this is a bug in the code");
}

/// Auth values found in a pasted request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurlAuth {
    pub token_v2: Option<String>,
    pub notion_user_id: Option<String>,
    pub active_user_id: Option<String>,
    pub cookie: Option<String>,
}

impl CurlAuth {
    pub fn is_empty(&self) -> bool {
        self.token_v2.is_none()
            && self.notion_user_id.is_none()
            && self.active_user_id.is_none()
            && self.cookie.is_none()
    }
}

/// Extracts auth values from a raw request paste.
pub fn parse_curl_auth(raw: &str) -> CurlAuth {
    let cookie = first_capture(&COOKIE_HEADER, raw);

    let from_cookie = |key: &str| cookie.as_deref().and_then(|c| cookie_value(c, key));
    let token_v2 = from_cookie("token_v2").or_else(|| first_capture(&TOKEN_V2, raw));
    let notion_user_id = from_cookie("notion_user_id").or_else(|| first_capture(&USER_ID, raw));

    CurlAuth {
        token_v2,
        notion_user_id,
        active_user_id: first_capture(&ACTIVE_USER, raw),
        cookie,
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Looks up one `key=value` pair in a `Cookie` header.
pub fn cookie_value(cookie_header: &str, key: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .find(|(k, _)| !k.is_empty() && *k == key)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// Shortens a secret to its first and last four characters.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => String::new(),
        n if n <= 8 => "********".to_string(),
        n => format!(
            "{}...{}",
            chars[..4].iter().collect::<String>(),
            chars[n - 4..].iter().collect::<String>()
        ),
    }
}

/// What an import changed, for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub config_path: PathBuf,
    pub auth: CurlAuth,
    pub cookie_stored: bool,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "updated config: {}", self.config_path.display())?;
        if let Some(token) = &self.auth.token_v2 {
            writeln!(f, "- token_v2: {}", redact(token))?;
        }
        if let Some(user) = &self.auth.notion_user_id {
            writeln!(f, "- notion_user_id: {}", user)?;
        }
        if let Some(active) = &self.auth.active_user_id {
            writeln!(f, "- active_user_id: {}", active)?;
        }
        if self.cookie_stored {
            writeln!(f, "- cookie: stored")?;
        }
        if self.auth.token_v2.is_none() || self.auth.notion_user_id.is_none() {
            writeln!(f, "warning: token_v2 or notion_user_id missing from pasted data")?;
        }
        Ok(())
    }
}

/// Merges values from `raw` into the config at `config_path`.
///
/// Only fields found in the paste are overwritten; the cookie is stored
/// only when asked, since it carries every session cookie.
pub fn import_curl(
    raw: &str,
    config_path: &Path,
    store_cookie: bool,
) -> Result<ImportSummary, AppError> {
    let auth = parse_curl_auth(raw);
    if auth.is_empty() {
        return Err(AppError::NoCredentialsFound);
    }

    let mut config = ConfigFile::read(config_path)?;
    if let Some(token) = &auth.token_v2 {
        config.token_v2 = token.clone();
    }
    if let Some(user) = &auth.notion_user_id {
        config.notion_user_id = user.clone();
    }
    if let Some(active) = &auth.active_user_id {
        config.active_user_id = active.clone();
    }
    let cookie_stored = match (&auth.cookie, store_cookie) {
        (Some(cookie), true) => {
            config.cookie = cookie.clone();
            true
        }
        _ => false,
    };
    if config.base_url.is_empty() && NOTION_ORIGIN.is_match(raw) {
        config.base_url = DEFAULT_BASE_URL.to_string();
    }

    config.write(config_path)?;
    log::info!("Imported session into {}", config_path.display());

    Ok(ImportSummary {
        config_path: config_path.to_path_buf(),
        auth,
        cookie_stored,
    })
}

/// Reads the paste from a file, or from stdin.
pub fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .map_err(|e| AppError::from(e).context(format!("read input file {}", path.display())));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste Notion 'Copy as cURL' output, then press Ctrl-D:");
    }
    let mut raw = String::new();
    stdin.read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Err(AppError::EmptyInput("no request text on stdin".to_string()));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CURL: &str = r#"curl 'https://www.notion.so/api/v3/loadPageChunk' \
  -H 'accept: */*' \
  -H 'cookie: notion_browser_id=abc; token_v2=v02%3Auser_token_or_cookies%3Aabcdef; notion_user_id=0123456789abcdef0123456789abcdef; other=1' \
  -H 'x-notion-active-user-header: 01234567-89ab-cdef-0123-456789abcdef' \
  --data-raw '{"pageId":"x"}'"#;

    #[test]
    fn parses_values_from_cookie_header() {
        let auth = parse_curl_auth(CURL);
        assert_eq!(
            auth.token_v2.as_deref(),
            Some("v02%3Auser_token_or_cookies%3Aabcdef")
        );
        assert_eq!(
            auth.notion_user_id.as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
        assert_eq!(
            auth.active_user_id.as_deref(),
            Some("01234567-89ab-cdef-0123-456789abcdef")
        );
        assert!(auth.cookie.unwrap().starts_with("notion_browser_id=abc;"));
    }

    #[test]
    fn falls_back_to_loose_matches_without_cookie_header() {
        let auth = parse_curl_auth("-b 'token_v2=tok123; notion_user_id=0123456789abcdef0123456789abcdef'");
        assert_eq!(auth.token_v2.as_deref(), Some("tok123"));
        assert_eq!(
            auth.notion_user_id.as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
        assert_eq!(auth.cookie, None);
    }

    #[test]
    fn nothing_found_in_unrelated_text() {
        assert!(parse_curl_auth("curl https://example.com").is_empty());
    }

    #[test]
    fn redaction_keeps_only_edges() {
        assert_eq!(redact(""), "");
        assert_eq!(redact("short"), "********");
        assert_eq!(redact("abcdefghijkl"), "abcd...ijkl");
    }

    #[test]
    fn import_merges_into_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        ConfigFile {
            active_user_id: "kept".to_string(),
            cookie: "old".to_string(),
            ..ConfigFile::default()
        }
        .write(&path)
        .unwrap();

        let summary = import_curl(
            "-H 'cookie: token_v2=tok123456789; notion_user_id=0123456789abcdef0123456789abcdef'",
            &path,
            false,
        )
        .unwrap();
        assert!(!summary.cookie_stored);

        let stored = ConfigFile::read_with_fallback(&path, None).unwrap();
        assert_eq!(stored.token_v2, "tok123456789");
        assert_eq!(stored.notion_user_id, "0123456789abcdef0123456789abcdef");
        assert_eq!(stored.active_user_id, "kept");
        assert_eq!(stored.cookie, "old");
        assert_eq!(stored.base_url, "");

        let text = summary.to_string();
        assert!(text.contains("- token_v2: tok1...6789"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn import_stores_cookie_and_base_url_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let summary = import_curl(CURL, &path, true).unwrap();
        assert!(summary.cookie_stored);

        let stored = ConfigFile::read_with_fallback(&path, None).unwrap();
        assert_eq!(stored.base_url, "https://www.notion.so");
        assert!(stored.cookie.contains("token_v2="));
    }

    #[test]
    fn import_without_values_fails_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(matches!(
            import_curl("nothing here", &path, false),
            Err(AppError::NoCredentialsFound)
        ));
        assert!(!path.exists());
    }
}
