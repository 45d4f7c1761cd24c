//! # ESI Configuration
//!
//! Endpoint and application configuration for the SSO and ESI clients.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARGOHOLD_CLIENT_ID=0123abcd...                                    │
//! │     CARGOHOLD_CALLBACK_URL=http://localhost:8635/callback              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cargohold/esi.toml (Linux)                               │
//! │     ~/Library/Application Support/com.cargohold.cargohold (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Tranquility endpoints, fittings write scope                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # esi.toml
//! client_id = "0123abcd..."
//! callback_url = "http://localhost:8635/callback"
//! datasource = "tranquility"
//! ```
//!
//! The client id comes from a registered EVE developer application with
//! the `esi-fittings.write_fittings.v1` scope. There is no usable default:
//! each install registers its own.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{EsiError, EsiResult};

// =============================================================================
// Defaults
// =============================================================================

fn default_callback_url() -> String {
    "http://localhost:8635/callback".to_string()
}

fn default_auth_endpoint() -> String {
    "https://login.eveonline.com/v2/oauth/authorize".to_string()
}

fn default_token_endpoint() -> String {
    "https://login.eveonline.com/v2/oauth/token".to_string()
}

fn default_verify_endpoint() -> String {
    "https://esi.evetech.net/verify/".to_string()
}

fn default_esi_base_url() -> String {
    "https://esi.evetech.net/latest".to_string()
}

fn default_datasource() -> String {
    "tranquility".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["esi-fittings.write_fittings.v1".to_string()]
}

// =============================================================================
// ESI Configuration
// =============================================================================

/// Complete SSO + ESI client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsiConfig {
    /// OAuth client id of the registered EVE developer application.
    #[serde(default)]
    pub client_id: String,

    /// Redirect URL registered with the application.
    #[serde(default = "default_callback_url")]
    pub callback_url: String,

    /// SSO authorization endpoint.
    #[serde(default = "default_auth_endpoint")]
    pub auth_endpoint: String,

    /// SSO token endpoint.
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,

    /// Token verification endpoint (returns character info).
    #[serde(default = "default_verify_endpoint")]
    pub verify_endpoint: String,

    /// Base URL for ESI routes.
    #[serde(default = "default_esi_base_url")]
    pub esi_base_url: String,

    /// ESI datasource (cluster) to query.
    #[serde(default = "default_datasource")]
    pub datasource: String,

    /// OAuth scopes to request on login.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl Default for EsiConfig {
    fn default() -> Self {
        EsiConfig {
            client_id: String::new(),
            callback_url: default_callback_url(),
            auth_endpoint: default_auth_endpoint(),
            token_endpoint: default_token_endpoint(),
            verify_endpoint: default_verify_endpoint(),
            esi_base_url: default_esi_base_url(),
            datasource: default_datasource(),
            scopes: default_scopes(),
        }
    }
}

impl EsiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (esi.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EsiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading ESI config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads config or returns defaults if the load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load ESI config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EsiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EsiError::StoreSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EsiError::StoreSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| EsiError::StoreSaveFailed(e.to_string()))?;

        info!(?path, "ESI config saved");
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("CARGOHOLD_CLIENT_ID") {
            debug!("Overriding client id from environment");
            self.client_id = id;
        }

        if let Ok(url) = std::env::var("CARGOHOLD_CALLBACK_URL") {
            self.callback_url = url;
        }

        if let Ok(url) = std::env::var("CARGOHOLD_ESI_BASE_URL") {
            debug!(url = %url, "Overriding ESI base URL from environment");
            self.esi_base_url = url;
        }

        if let Ok(ds) = std::env::var("CARGOHOLD_DATASOURCE") {
            self.datasource = ds;
        }
    }

    /// Returns the configured client id, or an error if none is set.
    ///
    /// Catalog lookups work anonymously; only the login and fitting
    /// flows need this.
    pub fn require_client_id(&self) -> EsiResult<&str> {
        if self.client_id.trim().is_empty() {
            Err(EsiError::AuthFailed(
                "No client id configured. Set CARGOHOLD_CLIENT_ID or add it to esi.toml.".into(),
            ))
        } else {
            Ok(self.client_id.as_str())
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cargohold", "cargohold")
            .map(|dirs| dirs.config_dir().join("esi.toml"))
    }

    /// Returns the directory used for persisted state (tokens, prefs).
    pub fn data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cargohold", "cargohold")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_tranquility() {
        let config = EsiConfig::default();
        assert_eq!(config.datasource, "tranquility");
        assert!(config.esi_base_url.starts_with("https://esi.evetech.net"));
        assert!(config.auth_endpoint.starts_with("https://login.eveonline.com"));
        assert_eq!(config.scopes, vec!["esi-fittings.write_fittings.v1"]);
    }

    #[test]
    fn test_missing_client_id_is_an_error() {
        let config = EsiConfig::default();
        assert!(config.require_client_id().is_err());

        let mut config = EsiConfig::default();
        config.client_id = "0123abcd".to_string();
        assert_eq!(config.require_client_id().unwrap(), "0123abcd");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EsiConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: EsiConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.datasource, config.datasource);
        assert_eq!(parsed.token_endpoint, config.token_endpoint);
    }
}
