use std::path::Path;
use std::time::Duration;

use clap::Parser;
use secrecy::Secret;
use thiserror::Error;
use tracing::debug;

use crate::parser::keywords::Keyword;
use crate::telegram::{TelegramTarget, DEFAULT_API_BASE};

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";

const DEFAULT_URL: &str =
    "https://service.taipower.com.tw/branch/d117/xcnotice?xsmsid=0M242581310300276906";

#[derive(Parser, Debug)]
#[command(
    name = "outage_notifier",
    about = "Notify a Telegram chat about upcoming power outages near given locations"
)]
pub struct Cli {
    /// Announcement page to crawl
    #[arg(long, env = "OUTAGE_URL", default_value = DEFAULT_URL)]
    pub url: String,
    /// Location keywords, comma separated
    #[arg(long, env = "ADDRESS", default_value = "")]
    pub keywords: String,
    /// Telegram chat to notify
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub chat_id: Option<String>,
    /// Bot API base URL
    #[arg(long, env = "TELEGRAM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    /// HTTP timeout in seconds for the page fetch and each delivery
    #[arg(long, env = "OUTAGE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Settings for one run, built once at startup.
#[derive(Debug)]
pub struct Config {
    pub url: String,
    pub keywords: Vec<Keyword>,
    pub telegram: TelegramTarget,
    pub timeout: Duration,
}

impl Config {
    /// The bot token is read from the environment only, so it never shows
    /// up in the process list.
    pub fn from_cli(cli: Cli, token: Option<String>) -> Result<Self, ConfigError> {
        let token = required(token, TOKEN_VAR)?;
        let chat_id = required(cli.chat_id, "TELEGRAM_CHAT_ID")?;

        Ok(Self {
            url: cli.url,
            keywords: Keyword::parse_list(&cli.keywords),
            telegram: TelegramTarget {
                api_base: cli.api_base,
                token: Secret::new(token),
                chat_id,
            },
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }
}

/// Load `KEY=value` pairs from an env file into the process environment.
/// Variables already set win. A missing file is not an error.
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            true
        }
        Err(e) => {
            debug!("No environment loaded from {}: {}", path.display(), e);
            false
        }
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}
