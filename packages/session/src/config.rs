//! # Portal configuration: `portal.toml`
//!
//! Everything the session layer needs to know about its environment: where the
//! backend lives, where avatar assets come from, how often to poll for
//! notifications, and which key the credential is persisted under.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//!
//! [assets]
//! base_url = "http://localhost:8000"
//! placeholder_avatar = "/assets/avatar-placeholder.svg"   # generic silhouette
//! fallback_avatar = "/assets/avatar-default.png"          # used when an image fails to load
//!
//! [notifications]
//! poll_interval_secs = 60   # 0 disables the recurring poll
//!
//! [storage]
//! key = "campus_portal_session"
//! ```
//!
//! Every field has a default, so a missing or empty file is equivalent to
//! [`PortalConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Top-level configuration stored in `portal.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

/// Avatar asset locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Prefix joined onto a profile's `avatar_path`.
    #[serde(default = "default_assets_base_url")]
    pub base_url: String,
    /// Shown when a profile has no avatar.
    #[serde(default = "default_placeholder_avatar")]
    pub placeholder_avatar: String,
    /// Shown when the chosen avatar fails to load.
    #[serde(default = "default_fallback_avatar")]
    pub fallback_avatar: String,
}

/// Notification polling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Seconds between polls. 0 disables the recurring poll.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,
}

/// Durable credential storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// localStorage key on the web, file stem on native.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_assets_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_placeholder_avatar() -> String {
    "/assets/avatar-placeholder.svg".to_string()
}

fn default_fallback_avatar() -> String {
    "/assets/avatar-default.png".to_string()
}

fn default_poll_interval() -> u32 {
    60
}

fn default_storage_key() -> String {
    "campus_portal_session".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_assets_base_url(),
            placeholder_avatar: default_placeholder_avatar(),
            fallback_avatar: default_fallback_avatar(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

impl NotificationsConfig {
    /// The recurring poll interval, or `None` when polling is disabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        match self.poll_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(u64::from(secs))),
        }
    }
}

impl PortalConfig {
    /// Builder method to point the client at a different backend.
    pub fn with_api_base(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Builder method to set the poll interval.
    pub fn with_poll_interval(mut self, secs: u32) -> Self {
        self.notifications.poll_interval_secs = secs;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "portal.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
