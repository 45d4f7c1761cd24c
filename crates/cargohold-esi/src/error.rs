//! # ESI Error Types
//!
//! Error types for SSO and ESI operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ESI Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Authentication │  │    Transport    │  │     Catalog             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  AuthRequired   │  │  Http           │  │  ResolutionFailed      │ │
//! │  │  AuthFailed     │  │  ServerBusy     │  │                         │ │
//! │  │  TokenExpired   │  │  Api            │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │  Fittings       │  │  Storage                                    │  │
//! │  │                 │  │                                             │  │
//! │  │  TooManyItems   │  │  StoreLoadFailed / StoreSaveFailed          │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for ESI operations.
pub type EsiResult<T> = Result<T, EsiError>;

/// ESI error type covering SSO, catalog, and fitting failures.
#[derive(Debug, Error)]
pub enum EsiError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    /// No stored token and no way to mint one without the user.
    #[error("Not authenticated. Run `cargohold login` first.")]
    AuthRequired,

    /// The SSO rejected a token exchange or refresh.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Stored token is expired and could not be refreshed.
    #[error("Access token expired and refresh failed: {0}")]
    TokenExpired(String),

    /// The authorization redirect did not contain a code parameter.
    #[error("No authorization code found in redirect URL")]
    MissingAuthCode,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// HTTP-level failure (connection, TLS, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 520; the request may succeed on retry.
    #[error("Server returned 520, busy or overloaded")]
    ServerBusy,

    /// ESI answered with a non-success status and an error body.
    #[error("ESI error ({status}): {message}")]
    Api { status: u16, message: String },

    // =========================================================================
    // Catalog Errors
    // =========================================================================
    /// The ids endpoint could not resolve the requested names.
    #[error("Failed to fetch item IDs")]
    ResolutionFailed,

    // =========================================================================
    // Fitting Errors
    // =========================================================================
    /// ESI refused the fitting because it holds too many items.
    #[error("Fitting '{name}' has too many items, maximum is 250 per fitting")]
    FittingTooManyItems { name: String },

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Failed to read the persisted token file.
    #[error("Failed to load token store: {0}")]
    StoreLoadFailed(String),

    /// Failed to write the persisted token file.
    #[error("Failed to save token store: {0}")]
    StoreSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for EsiError {
    fn from(err: serde_json::Error) -> Self {
        EsiError::Api {
            status: 0,
            message: format!("Response decode failed: {err}"),
        }
    }
}

impl From<std::io::Error> for EsiError {
    fn from(err: std::io::Error) -> Self {
        EsiError::StoreLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EsiError {
    fn from(err: toml::de::Error) -> Self {
        EsiError::StoreLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EsiError {
    fn from(err: toml::ser::Error) -> Self {
        EsiError::StoreSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl EsiError {
    /// Returns true if the operation can be retried as-is.
    ///
    /// ## Retryable
    /// - 520 responses (the fitting endpoint sheds load this way)
    /// - Transport failures
    ///
    /// ## Non-Retryable
    /// - Authentication problems (need a new login, not a retry)
    /// - Payload rejections like `FittingTooManyItems`
    pub fn is_retryable(&self) -> bool {
        matches!(self, EsiError::ServerBusy | EsiError::Http(_))
    }

    /// Returns true if this error means the user has to log in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            EsiError::AuthRequired
                | EsiError::AuthFailed(_)
                | EsiError::TokenExpired(_)
                | EsiError::MissingAuthCode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(EsiError::ServerBusy.is_retryable());

        assert!(!EsiError::AuthRequired.is_retryable());
        assert!(!EsiError::FittingTooManyItems {
            name: "Split 1".into()
        }
        .is_retryable());
        assert!(!EsiError::Api {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_auth_errors() {
        assert!(EsiError::AuthRequired.is_auth_error());
        assert!(EsiError::TokenExpired("nope".into()).is_auth_error());
        assert!(!EsiError::ServerBusy.is_auth_error());
    }

    #[test]
    fn test_error_display() {
        let err = EsiError::Api {
            status: 404,
            message: "Type not found".into(),
        };
        assert_eq!(err.to_string(), "ESI error (404): Type not found");
    }
}
