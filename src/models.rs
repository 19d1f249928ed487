//! Configuration and shared data
//!
//! Runtime settings come from the environment (optionally a `.env` file).

use crate::{Error, Result};
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE: &str = "default-stone.webp";
pub const DEFAULT_ASSET_ROOT: &str = "public";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the bundled default image is served from.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetRoot {
    Directory(String),
    Url(String),
}

impl AssetRoot {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            AssetRoot::Url(raw.trim_end_matches('/').to_string())
        } else {
            AssetRoot::Directory(raw.to_string())
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub inference_timeout: Duration,
    pub default_image: String,
    pub asset_root: AssetRoot,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` uses the
    /// process environment; tests pass a closure over a fixed table.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let inference_timeout = match lookup("INFERENCE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "INFERENCE_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            inference_timeout,
            default_image: lookup("DEFAULT_IMAGE").unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            asset_root: AssetRoot::parse(
                &lookup("ASSET_ROOT").unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string()),
            ),
        })
    }
}
