use std::{env, fmt::Display, num::NonZeroU32, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::CliError;

pub const DEFAULT_API_URL: &str = "http://localhost:8089";

pub struct Config {
    pub api_url: String,
    pub quotas_per_ebook: NonZeroU32,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, CliError> {
        let api_url: String = try_load("RIFA_API_URL", DEFAULT_API_URL)?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            quotas_per_ebook: try_load("RIFA_QUOTAS_PER_EBOOK", "5")?,
            http_timeout: Duration::from_secs(try_load("RIFA_HTTP_TIMEOUT_SECS", "10")?),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, CliError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, CliError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");

        CliError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}
