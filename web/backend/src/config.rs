use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CACHE_DIR: &str = "../../data/graphs";
const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub api_base: String,
    pub access_token: String,
    pub max_retries: u32,
    pub category_playlist_limit: u32,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub cache_dir: PathBuf,
    /// `None` keeps graph records forever.
    pub cache_ttl: Option<Duration>,
    pub spotify: SpotifyConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_token = lookup("SPOTIFY_ACCESS_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("SPOTIFY_ACCESS_TOKEN"))?;

        let cache_ttl = parse_var::<u64>(&lookup, "ARTISTGRAPH_CACHE_TTL_DAYS")?
            .map(|days| {
                days.checked_mul(SECONDS_PER_DAY)
                    .map(Duration::from_secs)
                    .ok_or_else(|| ConfigError::Invalid {
                        key: "ARTISTGRAPH_CACHE_TTL_DAYS",
                        value: days.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            bind_addr: lookup("ARTISTGRAPH_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cache_dir: lookup("ARTISTGRAPH_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            cache_ttl,
            spotify: SpotifyConfig {
                api_base: lookup("SPOTIFY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_SPOTIFY_API_BASE.to_string()),
                access_token,
                max_retries: parse_var(&lookup, "SPOTIFY_MAX_RETRIES")?.unwrap_or(5),
                category_playlist_limit: parse_var(&lookup, "SPOTIFY_CATEGORY_PLAYLIST_LIMIT")?
                    .unwrap_or(5),
                request_timeout: Duration::from_secs(10),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(None),
    }
}
