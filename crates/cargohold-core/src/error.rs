//! # Error Types
//!
//! Domain-specific error types for cargohold-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cargohold-core errors (this file)                                     │
//! │  ├── CoreError        - Resolution and split computation failures      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cargohold-esi errors (separate crate)                                 │
//! │  └── EsiError         - SSO / ESI request failures                     │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, counts)
//! 3. Errors are enum variants, never String
//!
//! Note that a malformed pasted row is NOT an error: lenient parsing drops
//! it silently so spreadsheet paste artifacts never block a calculation.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Split computation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced item name has no catalog entry.
    ///
    /// ## When This Occurs
    /// - The name is misspelled in the pasted inventory
    /// - ESI does not know the item (renamed or removed type)
    ///
    /// Fatal to the whole computation: the engine never returns splits
    /// built from a partially resolved inventory.
    #[error("Could not find item: {0}")]
    UnknownItem(String),

    /// Split computation produced no non-empty splits for a non-empty
    /// inventory.
    ///
    /// ## When This Occurs
    /// - Every item's single unit exceeds the configured capacity,
    ///   so nothing could be placed anywhere
    #[error("No valid splits could be created with the given constraints ({item_count} items)")]
    Infeasible { item_count: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied limits or items don't meet
/// requirements. Used for early validation before the engine runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownItem("Tritanum".to_string());
        assert_eq!(err.to_string(), "Could not find item: Tritanum");

        let err = CoreError::Infeasible { item_count: 3 };
        assert!(err.to_string().contains("3 items"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "max_volume".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
