use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::Endpoints;
use crate::models::UserId;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// General content service (feed, comments, likes)
    #[serde(default = "default_content_url")]
    pub content_url: String,

    /// User/auth service (login, registration)
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// OTP service; falls back to `auth_url` when unset
    #[serde(default)]
    pub otp_url: Option<String>,

    /// Acting user for likes and replies until a login supplies one
    #[serde(default = "default_user_id")]
    pub user_id: UserId,

    #[serde(default = "default_feed_page")]
    pub feed_page: u32,

    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,

    /// How long a success message stays up before the reset flow advances
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where the session store and config file live
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_url: default_content_url(),
            auth_url: default_auth_url(),
            otp_url: None,
            user_id: default_user_id(),
            feed_page: default_feed_page(),
            feed_limit: default_feed_limit(),
            transition_delay_ms: default_transition_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, then `config.toml` in the data dir, then `CHARCHA_*` environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_with(|key| std::env::var(key).ok());
        let path = config.data_dir().join(CONFIG_FILE_NAME);
        if path.exists() {
            config = Self::from_file(&path)?;
            config.apply_env_with(|key| std::env::var(key).ok());
            info!("loaded config from {}", path.display());
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHARCHA_CONTENT_URL") {
            self.content_url = url;
        }
        if let Some(url) = lookup("CHARCHA_AUTH_URL") {
            self.auth_url = url;
        }
        if let Some(url) = lookup("CHARCHA_OTP_URL") {
            self.otp_url = Some(url);
        }
        if let Some(raw) = lookup("CHARCHA_USER_ID") {
            match raw.trim().parse() {
                Ok(id) => self.user_id = id,
                Err(_) => warn!("ignoring CHARCHA_USER_ID={raw:?}: not an integer"),
            }
        }
        if let Some(dir) = lookup("CHARCHA_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        let otp = self.otp_url.clone().unwrap_or_else(|| self.auth_url.clone());
        Endpoints::new(self.content_url.clone(), self.auth_url.clone(), otp)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_content_url() -> String {
    "http://localhost:8000/api/v1/graphql".to_string()
}

fn default_auth_url() -> String {
    "http://localhost:8000/api/v1/auth/graphql".to_string()
}

fn default_user_id() -> UserId {
    3
}

fn default_feed_page() -> u32 {
    1
}

fn default_feed_limit() -> u32 {
    10
}

fn default_transition_delay_ms() -> u64 {
    1200
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("charcha"))
        .unwrap_or_else(|| PathBuf::from(".charcha"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn otp_endpoint_defaults_to_auth() {
        let endpoints = ClientConfig::default().endpoints().unwrap();
        assert_eq!(endpoints.content, "http://localhost:8000/api/v1/graphql");
        assert_eq!(endpoints.auth, "http://localhost:8000/api/v1/auth/graphql");
        assert_eq!(endpoints.otp, endpoints.auth);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            content_url = "https://charcha.example/graphql"
            feed_limit = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.content_url, "https://charcha.example/graphql");
        assert_eq!(config.feed_limit, 25);
        assert_eq!(config.feed_page, 1);
        assert_eq!(config.transition_delay(), Duration::from_millis(1200));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("CHARCHA_OTP_URL", "http://otp.local/graphql"),
            ("CHARCHA_USER_ID", "17"),
            ("CHARCHA_DATA_DIR", "/tmp/charcha-test"),
        ]
        .into_iter()
        .collect();
        let mut config = ClientConfig::default();
        config.apply_env_with(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.user_id, 17);
        assert_eq!(config.otp_url.as_deref(), Some("http://otp.local/graphql"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/charcha-test"));
    }

    #[test]
    fn bad_user_id_is_ignored() {
        let mut config = ClientConfig::default();
        config.apply_env_with(|key| (key == "CHARCHA_USER_ID").then(|| "abc".to_string()));
        assert_eq!(config.user_id, 3);
    }
}
