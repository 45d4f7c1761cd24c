//! # Validation Module
//!
//! Input validation for caller-supplied limits and items.
//!
//! Validation runs once at the boundary, before the split engine. The
//! engine itself assumes validated input and never re-checks.

use crate::error::ValidationError;
use crate::types::{CargoLimits, ResolvedItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Limit Validators
// =============================================================================

/// Validates cargo limits.
///
/// ## Rules
/// - `max_value` must be positive (`+∞` is allowed and means unconstrained)
/// - `max_volume` must be positive (same)
/// - `max_entries` must be at least 1
///
/// ## Example
/// ```rust
/// use cargohold_core::types::CargoLimits;
/// use cargohold_core::validation::validate_limits;
///
/// assert!(validate_limits(&CargoLimits::default()).is_ok());
/// assert!(validate_limits(&CargoLimits::new(Some(0.0), None)).is_err());
/// ```
pub fn validate_limits(limits: &CargoLimits) -> ValidationResult<()> {
    if !(limits.max_value > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: "max_value".to_string(),
        });
    }

    if !(limits.max_volume > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: "max_volume".to_string(),
        });
    }

    if limits.max_entries == 0 {
        return Err(ValidationError::MustBePositive {
            field: "max_entries".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Item Validators
// =============================================================================

/// Validates a resolved item before distribution.
///
/// ## Rules
/// - Name must be non-empty
/// - Quantity must be positive
/// - Unit volume and unit price must not be negative (zero is fine: ESI
///   reports no price for some types and no volume for a few)
pub fn validate_item(item: &ResolvedItem) -> ValidationResult<()> {
    if item.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if item.quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if item.unit_volume < 0.0 || !item.unit_volume.is_finite() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_volume".to_string(),
        });
    }

    if item.unit_price < 0.0 || !item.unit_price.is_finite() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ResolvedItem {
        ResolvedItem {
            name: "Tritanium".to_string(),
            quantity: 10,
            type_id: 34,
            unit_volume: 0.01,
            unit_price: 5.0,
        }
    }

    #[test]
    fn test_validate_limits() {
        assert!(validate_limits(&CargoLimits::default()).is_ok());
        assert!(validate_limits(&CargoLimits::new(Some(1_000.0), Some(60_000.0))).is_ok());

        assert!(validate_limits(&CargoLimits::new(Some(0.0), None)).is_err());
        assert!(validate_limits(&CargoLimits::new(None, Some(-5.0))).is_err());
        assert!(validate_limits(&CargoLimits::new(Some(f64::NAN), None)).is_err());

        let mut limits = CargoLimits::default();
        limits.max_entries = 0;
        assert!(validate_limits(&limits).is_err());
    }

    #[test]
    fn test_validate_item() {
        assert!(validate_item(&item()).is_ok());

        let mut bad = item();
        bad.name = "  ".to_string();
        assert!(validate_item(&bad).is_err());

        let mut bad = item();
        bad.quantity = 0;
        assert!(validate_item(&bad).is_err());

        let mut bad = item();
        bad.unit_volume = -0.01;
        assert!(validate_item(&bad).is_err());

        let mut zero_price = item();
        zero_price.unit_price = 0.0;
        assert!(validate_item(&zero_price).is_ok());
    }
}
