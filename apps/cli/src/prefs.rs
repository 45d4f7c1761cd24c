//! # User Preferences
//!
//! Persists the values a user keeps re-entering: split limits, the hull
//! to save fittings against, and the ids of the last saved fittings.
//!
//! ## Storage
//! One TOML file in the platform config directory:
//! ```toml
//! # prefs.toml
//! max_value = 1000000000.0
//! max_volume = 60000.0
//! ship_type_id = 657
//! saved_fits = [81234567, 81234568]
//! ```
//!
//! Limits given on the command line override these and are written back,
//! so the next run repeats the last explicit choice.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cargohold_esi::EsiConfig;

use crate::error::{AppError, AppResult};

/// Persisted user preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Preferred maximum ISK value per split.
    pub max_value: Option<f64>,

    /// Preferred maximum volume per split in m³.
    pub max_volume: Option<f64>,

    /// Hull to save fittings against.
    pub ship_type_id: Option<i64>,

    /// Fitting ids from the most recent save-fits run.
    #[serde(default)]
    pub saved_fits: Vec<i64>,
}

impl Preferences {
    /// Loads preferences from the default path, falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        Self::load(Self::default_path()).unwrap_or_else(|e| {
            debug!("Using default preferences: {e}");
            Self::default()
        })
    }

    /// Loads preferences from an explicit path.
    pub fn load(path: Option<PathBuf>) -> AppResult<Self> {
        let path = path.ok_or_else(|| {
            AppError::PrefsLoadFailed("No config directory available".into())
        })?;

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| AppError::PrefsLoadFailed(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| AppError::PrefsLoadFailed(e.to_string()))
    }

    /// Saves preferences to the default path.
    pub fn save(&self) -> AppResult<()> {
        self.save_to(Self::default_path())
    }

    /// Saves preferences to an explicit path.
    pub fn save_to(&self, path: Option<PathBuf>) -> AppResult<()> {
        let path = path.ok_or_else(|| {
            AppError::PrefsSaveFailed("No config directory available".into())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::PrefsSaveFailed(e.to_string()))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| AppError::PrefsSaveFailed(e.to_string()))?;
        std::fs::write(&path, contents).map_err(|e| AppError::PrefsSaveFailed(e.to_string()))?;

        debug!(?path, "Preferences saved");
        Ok(())
    }

    /// Default preference file path, next to the ESI config and tokens.
    fn default_path() -> Option<PathBuf> {
        EsiConfig::data_dir().map(|dir| dir.join("prefs.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let prefs = Preferences {
            max_value: Some(1_000_000_000.0),
            max_volume: Some(60_000.0),
            ship_type_id: Some(657),
            saved_fits: vec![81234567, 81234568],
        };
        prefs.save_to(Some(path.clone())).unwrap();

        let loaded = Preferences::load(Some(path)).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Preferences::load(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(AppError::PrefsLoadFailed(_))));
    }

    #[test]
    fn test_empty_file_reads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "").unwrap();

        let loaded = Preferences::load(Some(path)).unwrap();
        assert_eq!(loaded, Preferences::default());
    }
}
