use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::UserId, errors::Error, Result};

/// Typed configuration, loaded once at startup and shared as `Arc<Config>`.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub owner_id: UserId,
    pub polling_timeout: Duration,
    pub max_concurrent_updates: usize,

    // LinkedIn
    pub linkedin_token: String,
    pub author_id: String,

    // Gemini
    pub gemini_api_key: String,

    // Transient image copies
    pub downloads_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key).and_then(non_empty).ok_or_else(|| {
                Error::Config(format!("{key} environment variable is required"))
            })
        };

        let bot_token = required("BOT_TOKEN")?;
        let owner_id = parse_owner_id(&required("OWNER_ID")?)?;
        let linkedin_token = required("LINKEDIN_TOKEN")?;
        let author_id = required("AUTHOR_ID")?;
        let gemini_api_key = required("GEMINI_API_KEY")?;

        let downloads_dir = lookup("DOWNLOADS_DIR")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("downloads"));

        let polling_timeout =
            Duration::from_secs(optional_number(&lookup, "POLLING_TIMEOUT_SECS")?.unwrap_or(9));
        let max_concurrent_updates =
            optional_number(&lookup, "MAX_CONCURRENT_UPDATES")?.unwrap_or(50);
        if max_concurrent_updates == 0 {
            return Err(Error::Config(
                "MAX_CONCURRENT_UPDATES must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bot_token,
            owner_id,
            polling_timeout,
            max_concurrent_updates,
            linkedin_token,
            author_id,
            gemini_api_key,
            downloads_dir,
        })
    }

    /// Author URN used for posts and upload ownership.
    pub fn author_urn(&self) -> String {
        format!("urn:li:person:{}", self.author_id)
    }
}

fn parse_owner_id(raw: &str) -> Result<UserId> {
    raw.trim()
        .parse::<i64>()
        .map(UserId)
        .map_err(|e| Error::Config(format!("OWNER_ID must be a numeric Telegram id: {e}")))
}

/// Blank or unset means "use the default"; anything else must parse.
fn optional_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| Error::Config(format!("{key} must be a non-negative integer: {e}")))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let Some((key, val)) = parse_dotenv_line(raw) else {
            continue;
        };
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv_line(raw: &str) -> Option<(String, String)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (k, v) = line.split_once('=')?;
    let key = k.trim().trim_start_matches("export ").trim();
    if key.is_empty() {
        return None;
    }

    let mut val = v.trim().to_string();
    // Strip optional surrounding quotes.
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        val = val[1..val.len() - 1].to_string();
    }

    Some((key.to_string(), val))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
