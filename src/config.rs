// src/config.rs
use crate::api::{Credentials, PageEndpoint};
use crate::constants::COLLECTION_QUERY_DEFAULT_LIMIT;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".nocli.json";
const LEGACY_CONFIG_FILE_NAME: &str = ".notion.json";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(
    name = "nocli",
    author,
    version,
    about = "CLI for Notion browser/private endpoints",
    long_about = None
)]
pub struct CommandLineInput {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Session flags shared by every command; each falls back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Path to config file (defaults to ~/.nocli.json, then ~/.notion.json)
    #[arg(long = "config", env = "NOTION_CONFIG", global = true)]
    pub config_path: Option<String>,

    /// Notion base URL
    #[arg(long, env = "NOTION_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Notion token_v2 cookie value
    #[arg(long, env = "NOTION_TOKEN_V2", global = true, hide_env_values = true)]
    pub token_v2: Option<String>,

    /// notion_user_id cookie value
    #[arg(long, env = "NOTION_USER_ID", global = true)]
    pub notion_user_id: Option<String>,

    /// x-notion-active-user-header value
    #[arg(long, env = "NOTION_ACTIVE_USER_ID", global = true)]
    pub active_user_id: Option<String>,

    /// Raw Cookie header (overrides token_v2/notion_user_id)
    #[arg(long, env = "NOTION_COOKIE", global = true, hide_env_values = true)]
    pub cookie: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Page operations
    #[command(subcommand)]
    Page(PageCommand),
    /// Block operations
    #[command(subcommand)]
    Block(BlockCommand),
    /// Collection operations
    #[command(subcommand)]
    Collection(CollectionCommand),
    /// User record operations
    #[command(subcommand)]
    User(UserCommand),
    /// Authentication helpers
    #[command(subcommand)]
    Auth(AuthCommand),
    /// List the object entry points
    Objects,
}

#[derive(Subcommand, Debug)]
pub enum PageCommand {
    /// Fetch a page via Notion private endpoints
    Fetch {
        /// Notion page URL or page ID
        url_or_id: String,
        /// Endpoint strategy to use
        #[arg(long, value_enum, default_value_t = PageEndpoint::Auto)]
        endpoint: PageEndpoint,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Expose flattened objects from a page recordMap
    Objects {
        /// Notion page URL or page ID
        url_or_id: String,
        /// Filter by table name (block, collection, collection_view, notion_user, ...)
        #[arg(long)]
        table: Option<String>,
        /// Filter blocks by block type
        #[arg(long)]
        block_type: Option<String>,
        /// For block table, emit Notion-like block objects with private value attached
        #[arg(long, default_value_t = false)]
        notion_block_like: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List block types seen in page vs official Notion API block types
    Types {
        /// Notion page URL or page ID
        url_or_id: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// Fetch a block record by ID
    Get {
        /// Block ID (UUID or 32-char)
        id: String,
        /// Emit Notion-like block object shape
        #[arg(long, default_value_t = false)]
        notion_block_like: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fetch one-level child blocks
    Children {
        /// Parent block ID (UUID or 32-char)
        id: String,
        /// Emit Notion-like block object shape
        #[arg(long, default_value_t = false)]
        notion_block_like: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum CollectionCommand {
    /// Query a collection view
    Query {
        /// Collection/database ID
        collection_id: String,
        /// Collection view ID
        view_id: String,
        /// Result limit
        #[arg(long, default_value_t = COLLECTION_QUERY_DEFAULT_LIMIT)]
        limit: u32,
        /// Emit flattened objects instead of raw response
        #[arg(long, default_value_t = false)]
        flatten: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Fetch notion_user records by ID
    Get {
        /// User IDs (UUID or 32-char)
        #[arg(required = true)]
        ids: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Import auth from a pasted Notion DevTools 'Copy as cURL' request
    ImportCurl {
        /// Path to a text file containing copied cURL
        #[arg(short, long = "input")]
        input: Option<PathBuf>,
        /// Also store full Cookie header in config
        #[arg(long, default_value_t = false)]
        store_cookie: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write JSON output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// On-disk credential file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_v2: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notion_user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub active_user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cookie: String,
}

impl ConfigFile {
    /// Reads a config file; a missing file is an empty config.
    ///
    /// When `path` is the default location and does not exist, the legacy
    /// location is tried instead. A broken legacy file is ignored.
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let fallback = (default_config_path().as_deref() == Some(path))
            .then(legacy_config_path)
            .flatten();
        Self::read_with_fallback(path, fallback.as_deref())
    }

    /// Reads `path`, trying `legacy` only when `path` does not exist.
    pub fn read_with_fallback(path: &Path, legacy: Option<&Path>) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(legacy) = legacy {
                    if let Some(cfg) = fs::read_to_string(legacy)
                        .ok()
                        .and_then(|text| serde_json::from_str::<Self>(&text).ok())
                    {
                        log::info!("Using legacy config {}", legacy.display());
                        return Ok(cfg);
                    }
                }
                log::debug!("No config at {}", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(AppError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes the config atomically: temp file (mode 0600), then rename.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_private_dir(parent)?;
        }

        let mut body = serde_json::to_vec_pretty(self)?;
        body.push(b'\n');

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = private_file_options().open(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, path)?;
        set_private_permissions(path)?;
        log::debug!("Wrote config {}", path.display());
        Ok(())
    }

    /// Whether a usable session is stored.
    pub fn has_auth_material(&self) -> bool {
        !self.cookie.trim().is_empty()
            || (!self.token_v2.trim().is_empty() && !self.notion_user_id.trim().is_empty())
    }
}

/// Opens a file for writing, truncating it, readable only by the owner.
pub(crate) fn private_file_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

fn create_private_dir(dir: &Path) -> Result<(), AppError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)?;
    Ok(())
}

fn set_private_permissions(path: &Path) -> Result<(), AppError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .map(PathBuf::from)
}

/// `~/.nocli.json`, or `None` without a home directory.
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

pub fn legacy_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(LEGACY_CONFIG_FILE_NAME))
}

/// Resolves the config path: an explicit path (with `~` expanded) or the default.
pub fn resolve_config_path(input: Option<&str>) -> PathBuf {
    match input.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => expand_home(path),
        None => default_config_path().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path, home_dir()) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Fully-resolved settings every network command runs with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub config_path: PathBuf,
    pub credentials: Credentials,
}

impl SessionConfig {
    /// Merges flags and environment over the config file, field by field.
    pub fn resolve(args: &SessionArgs) -> Result<Self, AppError> {
        let config_path = resolve_config_path(args.config_path.as_deref());
        let file = ConfigFile::read(&config_path)?;
        Ok(Self {
            credentials: merge_credentials(args, &file),
            config_path,
        })
    }
}

/// First non-blank of flag/env value and file value, trimmed.
pub fn merge_credentials(args: &SessionArgs, file: &ConfigFile) -> Credentials {
    fn pick(flag: &Option<String>, stored: &str) -> Option<String> {
        flag.as_deref()
            .into_iter()
            .chain(std::iter::once(stored))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    Credentials {
        base_url: pick(&args.base_url, &file.base_url),
        token_v2: pick(&args.token_v2, &file.token_v2),
        notion_user_id: pick(&args.notion_user_id, &file.notion_user_id),
        active_user_id: pick(&args.active_user_id, &file.active_user_id),
        cookie: pick(&args.cookie, &file.cookie),
    }
}
