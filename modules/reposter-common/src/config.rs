use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveTime;
use tracing::info;

use crate::error::ReposterError;

const DEFAULT_SUBREDDITS: &[&str] = &[
    "interestingasfuck",
    "Damnthatsinteresting",
    "nextfuckinglevel",
    "MadeMeSmile",
    "Aww",
];

/// What a harvest cycle does with records already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarvestMode {
    /// Replace the store with this cycle's records. Unpublished leftovers are dropped.
    #[default]
    Overwrite,
    /// Keep stored records and append only ids not already present.
    Merge,
}

impl FromStr for HarvestMode {
    type Err = ReposterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(HarvestMode::Overwrite),
            "merge" => Ok(HarvestMode::Merge),
            other => Err(ReposterError::Config(format!(
                "HARVEST_MODE must be 'overwrite' or 'merge', got '{other}'"
            ))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Rewriting service
    pub openai_api_key: String,
    pub openai_model: String,

    // Publishing service
    pub x_access_token: String,

    // Content source
    pub reddit_user_agent: String,
    pub subreddits: Vec<String>,
    pub posts_per_source: u32,

    // Scheduling
    pub publish_interval_minutes: u32,
    /// Time of day (UTC) for the daily harvest.
    pub harvest_time: NaiveTime,
    pub harvest_mode: HarvestMode,

    // Storage
    pub posts_file: PathBuf,
    pub media_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ReposterError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` is this over `std::env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ReposterError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ReposterError::MissingEnv(key))
        };

        let subreddits: Vec<String> = match lookup("SUBREDDITS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
        };
        if subreddits.is_empty() {
            return Err(ReposterError::Config("SUBREDDITS is empty".into()));
        }

        let posts_per_source = parse_positive("POSTS_PER_SOURCE", &var("POSTS_PER_SOURCE", "10"))?;
        let publish_interval_minutes = parse_positive(
            "PUBLISH_INTERVAL_MINUTES",
            &var("PUBLISH_INTERVAL_MINUTES", "60"),
        )?;

        let raw_time = var("HARVEST_TIME", "00:00");
        let harvest_time = NaiveTime::parse_from_str(raw_time.trim(), "%H:%M").map_err(|_| {
            ReposterError::Config(format!("HARVEST_TIME must be HH:MM, got '{raw_time}'"))
        })?;

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: var("OPENAI_MODEL", "gpt-3.5-turbo"),
            x_access_token: required("X_ACCESS_TOKEN")?,
            reddit_user_agent: var("REDDIT_USER_AGENT", "RedditTwitterBot/1.0"),
            subreddits,
            posts_per_source,
            publish_interval_minutes,
            harvest_time,
            harvest_mode: var("HARVEST_MODE", "overwrite").parse()?,
            posts_file: PathBuf::from(var("POSTS_FILE", "posts_data.json")),
            media_dir: PathBuf::from(var("MEDIA_DIR", "media")),
        })
    }

    /// Log the effective configuration with secrets reduced to a short prefix.
    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().count().min(4);
            let head: String = val.chars().take(n).collect();
            format!("{head}…")
        }

        info!(
            openai_api_key = %preview(&self.openai_api_key),
            openai_model = %self.openai_model,
            x_access_token = %preview(&self.x_access_token),
            subreddits = ?self.subreddits,
            posts_per_source = self.posts_per_source,
            publish_interval_minutes = self.publish_interval_minutes,
            harvest_time = %self.harvest_time,
            harvest_mode = ?self.harvest_mode,
            posts_file = %self.posts_file.display(),
            media_dir = %self.media_dir.display(),
            "Configuration loaded"
        );
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u32, ReposterError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ReposterError::Config(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}
