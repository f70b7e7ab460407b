// src/main.rs
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use nocli::config::{resolve_config_path, CommandLineInput, SessionConfig};
use nocli::ConfigFile;
use std::fs;

/// Sets up logging configuration.
///
/// Console output goes to stderr; stdout carries nothing but command JSON.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("nocli.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

const TOP_LEVEL_HELP: &str = "\
Usage: nocli <command> [flags]

CLI for Notion browser/private endpoints

Common commands:
  nocli page fetch <url-or-id>
  nocli page objects <url-or-id>
  nocli block get <block-id>
  nocli collection query <collection-id> <view-id>
  nocli auth import-curl

Run 'nocli --help' for full help.
";

const AUTH_BOOTSTRAP_HINT: &str = "
No auth config found.
Quick setup:
  1) Open Notion in browser and sign in.
  2) DevTools -> Network -> pick a /api/v3/... request.
  3) Right click -> Copy -> Copy as cURL.
  4) Run: pbpaste | nocli auth import-curl
";

/// Whether env vars or a config file already provide a session.
fn has_any_auth_material() -> bool {
    let env = |key: &str| {
        std::env::var(key)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    };
    if env("NOTION_COOKIE") || (env("NOTION_TOKEN_V2") && env("NOTION_USER_ID")) {
        return true;
    }

    let configured = std::env::var("NOTION_CONFIG").ok();
    ConfigFile::read(&resolve_config_path(configured.as_deref()))
        .map(|cfg| cfg.has_auth_material())
        .unwrap_or(false)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let Some(command) = cli.command else {
        print!("{}", TOP_LEVEL_HELP);
        if !has_any_auth_material() {
            print!("{}", AUTH_BOOTSTRAP_HINT);
        }
        return Ok(());
    };

    let result = match SessionConfig::resolve(&cli.session) {
        Ok(session) => nocli::commands::execute(command, &session).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if e.is_auth_rejection() {
            log::warn!("The session looks expired; re-import it with 'nocli auth import-curl'");
        }
        eprintln!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}
