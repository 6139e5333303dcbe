use crate::translation::Dialect;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Catalogs
    pub po_dir: PathBuf,

    // Translation service
    pub api_url: String,
    pub dialect: Dialect,
    pub request_timeout: Duration,
    pub max_retries: u32,

    // Pacing
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub request_delay: Duration,

    pub dry_run: bool,
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn secs_env(name: &str) -> Option<Duration> {
    parse_env::<f64>(name).and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Catalogs
            po_dir: std::env::var("PO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("po")),

            // Translation service (DeepLX listens on 1188 by default)
            api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| "http://localhost:1188".to_string()),
            dialect: match std::env::var("TRANSLATE_ENDPOINT") {
                Ok(value) => value.parse::<Dialect>().context("Invalid TRANSLATE_ENDPOINT")?,
                Err(_) => Dialect::default(),
            },
            request_timeout: secs_env("REQUEST_TIMEOUT_SECS")
                .filter(|d| !d.is_zero())
                .unwrap_or(Duration::from_secs(30)),
            max_retries: parse_env::<u32>("MAX_RETRIES")
                .filter(|&n| n >= 1)
                .unwrap_or(3),

            // Pacing
            batch_size: parse_env::<usize>("BATCH_SIZE").filter(|&n| n >= 1).unwrap_or(10),
            batch_delay: secs_env("BATCH_DELAY_SECS").unwrap_or(Duration::from_millis(500)),
            request_delay: secs_env("REQUEST_DELAY_SECS").unwrap_or(Duration::from_millis(500)),

            dry_run: false,
        })
    }
}
