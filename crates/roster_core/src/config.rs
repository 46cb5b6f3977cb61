use std::{collections::HashMap, fs, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

use crate::notification::DEFAULT_HIDE_DELAY;

pub const SETTINGS_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub notification_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".into(),
            notification_delay_ms: DEFAULT_HIDE_DELAY.as_millis() as u64,
            request_timeout_secs: 10,
        }
    }
}

impl ClientSettings {
    pub fn notification_delay(&self) -> Duration {
        Duration::from_millis(self.notification_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn server_url(&self) -> anyhow::Result<Url> {
        parse_server_url(&self.server_url)
    }
}

pub fn load_settings() -> ClientSettings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Layers `raw_file` (flat string keys) and then the environment over the
/// defaults. Unparseable values are ignored.
pub fn load_settings_from(
    raw_file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = raw_file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("notification_delay_ms") {
                if let Ok(parsed) = v.parse() {
                    settings.notification_delay_ms = parsed;
                }
            }
            if let Some(v) = file_cfg.get("request_timeout_secs") {
                if let Ok(parsed) = v.parse() {
                    settings.request_timeout_secs = parsed;
                }
            }
        }
    }

    if let Some(v) = env("ROSTER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__NOTIFICATION_DELAY_MS") {
        if let Ok(parsed) = v.parse() {
            settings.notification_delay_ms = parsed;
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

pub fn parse_server_url(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid server url '{raw}'"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("server url must start with http:// or https://, got '{raw}'");
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
