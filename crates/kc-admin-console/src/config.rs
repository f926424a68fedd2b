//! Console configuration.
//!
//! Read from `~/.keycloak/kc.toml`:
//!
//! ```toml
//! [client]
//! server_url = "https://sso.example.com"
//! realm = "acme"
//!
//! [paging]
//! group_page_size = 20
//! user_page_size = 20
//! member_page_size = 5
//! ```

use std::path::Path;

use kc_admin_client::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, ConsoleResult};

/// Complete console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Connection settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Page sizes of the paginated views.
    #[serde(default)]
    pub paging: PagingConfig,
}

/// Page sizes of the paginated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Top-level groups per page, also the child fetch limit.
    pub group_page_size: u32,
    /// Candidate users per page in the membership view.
    pub user_page_size: u32,
    /// Members per page in the membership view.
    pub member_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            group_page_size: 20,
            user_page_size: 20,
            member_page_size: 5,
        }
    }
}

impl ConsoleConfig {
    /// Loads the configuration file, falling back to defaults when it is
    /// absent, then applies environment overrides.
    pub fn load() -> ConsoleResult<Self> {
        let path = ClientConfig::config_path().map_err(|e| ConsoleError::Config(e.to_string()))?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.client.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load_from(path: &Path) -> ConsoleResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses a configuration document.
    pub fn from_toml(content: &str) -> ConsoleResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConsoleError::Config(format!("failed to parse config: {e}")))
    }

    /// Checks every setting.
    pub fn validate(&self) -> ConsoleResult<()> {
        self.client
            .validate()
            .map_err(|e| ConsoleError::Config(e.to_string()))?;

        let sizes = [
            ("group_page_size", self.paging.group_page_size),
            ("user_page_size", self.paging.user_page_size),
            ("member_page_size", self.paging.member_page_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(ConsoleError::Config(format!("{name} must be at least 1")));
        }
        Ok(())
    }
}
