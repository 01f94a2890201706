//! Client configuration
//!
//! Handles loading and storing client settings from environment
//! variables and the local settings store.

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::api::DEFAULT_TIMEOUT;
use crate::store::KeyValueStore;
use crate::views::ResetPolicy;

// Settings keys for local storage
pub const SETTING_API_URL: &str = "api_url";
pub const SETTING_TIMEOUT: &str = "request_timeout_secs";
pub const SETTING_FORM_RESET: &str = "form_reset";

// Environment variable names
const ENV_API_URL: &str = "NOTECMD_API_URL";
const ENV_TIMEOUT: &str = "NOTECMD_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Every setting key `config set` accepts.
pub const SETTING_KEYS: &[&str] = &[SETTING_API_URL, SETTING_TIMEOUT, SETTING_FORM_RESET];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub form_reset: ResetPolicy,
}

impl ClientConfig {
    /// Load configuration from environment variables and stored settings.
    /// Environment variables take precedence over stored settings.
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        Self::read(store, false)
    }

    /// Like [`ClientConfig::load`], but an invalid timeout or reset policy
    /// falls back to its default with a warning instead of failing.
    pub fn load_lenient<S: KeyValueStore>(store: &S) -> Result<Self> {
        Self::read(store, true)
    }

    fn read<S: KeyValueStore>(store: &S, lenient: bool) -> Result<Self> {
        // API URL: env var takes precedence
        let api_url = match env::var(ENV_API_URL).ok().filter(|v| !v.is_empty()) {
            Some(url) => Some(url),
            None => store.get(SETTING_API_URL)?,
        };

        // Timeout: env var takes precedence
        let timeout_raw = match env::var(ENV_TIMEOUT).ok().filter(|v| !v.is_empty()) {
            Some(secs) => Some(secs),
            None => store.get(SETTING_TIMEOUT)?,
        };
        let timeout_secs = or_default(
            timeout_raw.as_deref().map(parse_timeout).transpose(),
            lenient,
            SETTING_TIMEOUT,
        )?;

        let form_reset = or_default(
            store
                .get(SETTING_FORM_RESET)?
                .map(|s| s.parse::<ResetPolicy>())
                .transpose(),
            lenient,
            SETTING_FORM_RESET,
        )?
        .unwrap_or_default();

        Ok(Self {
            api_url,
            timeout_secs,
            form_reset,
        })
    }

    /// Override the API URL, e.g. from a command-line flag.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if api_url.is_some() {
            self.api_url = api_url;
        }
        self
    }

    /// Get the effective API URL (with default)
    pub fn effective_api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Get the effective request timeout (with default)
    pub fn effective_timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Save the current configuration to the store
    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<()> {
        if let Some(ref url) = self.api_url {
            store.set(SETTING_API_URL, url)?;
        }

        if let Some(secs) = self.timeout_secs {
            store.set(SETTING_TIMEOUT, &secs.to_string())?;
        }

        store.set(SETTING_FORM_RESET, self.form_reset.as_str())?;

        Ok(())
    }

    /// Clear all client configuration from the store
    pub fn clear<S: KeyValueStore>(store: &S) -> Result<()> {
        for key in SETTING_KEYS {
            store.remove(key)?;
        }
        Ok(())
    }
}

/// Validate and store one setting.
pub fn set_setting<S: KeyValueStore>(store: &S, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        SETTING_API_URL => {
            let url = Url::parse(value).map_err(|e| anyhow!("Invalid URL '{}': {}", value, e))?;
            if url.cannot_be_a_base() {
                return Err(anyhow!("Invalid URL '{}'", value));
            }
        }
        SETTING_TIMEOUT => {
            parse_timeout(value)?;
        }
        SETTING_FORM_RESET => {
            value.parse::<ResetPolicy>()?;
        }
        other => {
            return Err(anyhow!(
                "Unknown setting '{}'. Known settings: {}",
                other,
                SETTING_KEYS.join(", ")
            ))
        }
    }
    store.set(key, value)
}

fn or_default<T: Default>(value: Result<T>, lenient: bool, key: &str) -> Result<T> {
    match value {
        Err(e) if lenient => {
            warn!(setting = key, error = %e, "ignoring invalid setting");
            Ok(T::default())
        }
        other => other,
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(anyhow!("Invalid timeout '{}': expected a positive number of seconds", raw)),
    }
}
