//! # Application Error Type
//!
//! Unified error type for CLI commands. Everything the core and ESI
//! layers can fail with converges here so `main` has exactly one error
//! to print.

use thiserror::Error;

use cargohold_core::CoreError;
use cargohold_esi::EsiError;

/// Result type alias for CLI operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application error covering all command failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// Splitting or resolution failure from the core.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// SSO or ESI failure.
    #[error("{0}")]
    Esi(#[from] EsiError),

    /// Reading the inventory input failed.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The pasted inventory contained no usable rows.
    #[error("No items found in the input. Expected tab-separated rows of name and quantity.")]
    NoItems,

    /// Preference file could not be read.
    #[error("Failed to load preferences: {0}")]
    PrefsLoadFailed(String),

    /// Preference file could not be written.
    #[error("Failed to save preferences: {0}")]
    PrefsSaveFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display_passes_through() {
        let err: AppError = CoreError::UnknownItem("Tritanum".to_string()).into();
        assert_eq!(err.to_string(), "Could not find item: Tritanum");
    }

    #[test]
    fn test_no_items_message_mentions_format() {
        assert!(AppError::NoItems.to_string().contains("tab-separated"));
    }
}
