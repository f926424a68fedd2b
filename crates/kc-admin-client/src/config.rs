//! Admin client configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult};

/// Environment variable overriding [`ClientConfig::server_url`].
pub const ENV_SERVER_URL: &str = "KC_SERVER_URL";
/// Environment variable overriding [`ClientConfig::realm`].
pub const ENV_REALM: &str = "KC_REALM";
/// Environment variable providing [`ClientConfig::access_token`].
pub const ENV_ACCESS_TOKEN: &str = "KC_ACCESS_TOKEN";

/// Connection settings for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server URL (e.g., http://localhost:8080).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Realm the console operates on.
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Default server URL.
fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

/// Default realm.
fn default_realm() -> String {
    "master".to_string()
}

/// Default request timeout.
const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            realm: default_realm(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for a server and realm.
    #[must_use]
    pub fn new(server_url: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            realm: realm.into(),
            ..Self::default()
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Gets the configuration file path.
    pub fn config_path() -> ClientResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            ClientError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".keycloak").join("kc.toml"))
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(realm) = lookup(ENV_REALM) {
            self.realm = realm;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
    }

    /// Checks that the settings can address a realm.
    pub fn validate(&self) -> ClientResult<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "server URL must use http or https: {}",
                self.server_url
            )));
        }
        if self.realm.trim().is_empty() {
            return Err(ClientError::Config("realm is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL of the realm's admin resources.
    #[must_use]
    pub fn realm_base_url(&self) -> String {
        format!(
            "{}/admin/realms/{}",
            self.server_url.trim_end_matches('/'),
            urlencoding::encode(&self.realm)
        )
    }
}
