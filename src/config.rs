// src/config.rs
use std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing OPENAI_API_KEY in environment")]
    MissingApiKey,

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration, built once at startup and shared read-only.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub public_dir: PathBuf,
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("public_dir", &self.public_dir)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("rate_limit_max", &self.rate_limit_max)
            .finish()
    }
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// | Variable                 | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `PORT`                   | `5173`                      |
    /// | `OPENAI_API_KEY`         | required                    |
    /// | `MODEL`                  | `gpt-4o-mini`               |
    /// | `OPENAI_BASE_URL`        | `https://api.openai.com/v1` |
    /// | `PUBLIC_DIR`             | `public`                    |
    /// | `RATE_LIMIT_WINDOW_SECS` | `60`                        |
    /// | `RATE_LIMIT_MAX`         | `30`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let api_base = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let window_secs: u64 =
            parse_or(get("RATE_LIMIT_WINDOW_SECS"), "RATE_LIMIT_WINDOW_SECS", 60)?;
        if window_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_WINDOW_SECS",
                value: "0".to_string(),
            });
        }
        let rate_limit_window = Duration::from_secs(window_secs);

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            api_key,
            model: get("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base,
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            rate_limit_window,
            rate_limit_max: parse_or(get("RATE_LIMIT_MAX"), "RATE_LIMIT_MAX", 30)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
