use anyhow::Result;

use super::auth::print_session;
use super::ui::status;
use crate::config::{self, ClientConfig, DEFAULT_API_URL};
use crate::store::{KeyValueStore, DARK_MODE_KEY};

/// Print the effective configuration and where the session stands.
pub fn run_config_show<S: KeyValueStore>(store: S, config: &ClientConfig) -> Result<()> {
    let source = if config.api_url.is_some() {
        ""
    } else {
        " (default)"
    };
    status(&format!("api_url: {}{}", config.effective_api_url(), source));
    status(&format!(
        "request_timeout_secs: {}",
        config.effective_timeout().as_secs()
    ));
    status(&format!("form_reset: {}", config.form_reset));

    let dark = store.get(DARK_MODE_KEY)?.as_deref() == Some("true");
    status(&format!("dark_mode: {}", if dark { "on" } else { "off" }));

    print_session(&store)
}

pub fn run_config_set<S: KeyValueStore>(store: S, key: &str, value: &str) -> Result<()> {
    config::set_setting(&store, key, value)?;
    status("Saved.");
    Ok(())
}

pub fn run_config_clear<S: KeyValueStore>(store: S) -> Result<()> {
    ClientConfig::clear(&store)?;
    status(&format!("Cleared. API URL is back to {}.", DEFAULT_API_URL));
    Ok(())
}
