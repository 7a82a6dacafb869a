//! Remote API configuration.
//!
//! The saved.io API authenticates every request with two keys: a developer
//! key identifying the application and a user key identifying the account.
//! Only the developer key and endpoint live here; the user key belongs to
//! the settings store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Public saved.io developer API endpoint
pub const DEFAULT_API_URL: &str = "https://devapi.saved.io/";

/// Environment variable overriding the API endpoint
pub const API_URL_ENV: &str = "SAVEDIO_API_URL";

/// Environment variable providing the developer key
pub const DEV_KEY_ENV: &str = "SAVEDIO_DEV_KEY";

/// Developer key baked in at build time, if any
const BUILD_DEV_KEY: Option<&str> = option_env!("SAVEDIO_DEV_KEY");

/// Endpoint and application credentials for the saved.io API
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, always ending with `/`
    pub base_url: String,
    /// Developer key sent as `devkey` with every request
    #[serde(default)]
    pub dev_key: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("dev_key", &self.dev_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            dev_key: normalize_text_option(BUILD_DEV_KEY.map(str::to_string)),
        }
    }
}

impl ApiConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = normalize_text_option(lookup(API_URL_ENV)) {
            config.base_url = normalize_base_url(&url)?;
        }
        if let Some(dev_key) = normalize_text_option(lookup(DEV_KEY_ENV)) {
            config.dev_key = Some(dev_key);
        }

        Ok(config)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let url = raw.trim();
    if !is_http_url(url) {
        return Err(Error::InvalidInput(format!(
            "API URL must include http:// or https://: {url}"
        )));
    }
    Ok(format!("{}/", url.trim_end_matches('/')))
}
