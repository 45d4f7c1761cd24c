//! # Domain Types
//!
//! Core domain types used throughout Cargohold.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │    TypeInfo     │   │  ResolvedItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │ + │  type_id        │ = │  name, quantity │       │
//! │  │  quantity       │   │  volume         │   │  type_id        │       │
//! │  │  (pasted row)   │   │  price          │   │  unit_volume    │       │
//! │  └─────────────────┘   │  (catalog)      │   │  unit_price     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CargoLimits   │   │     Split       │   │   SplitEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  max_value      │   │  entries        │   │  name           │       │
//! │  │  max_volume     │   │  total_volume   │   │  type_id        │       │
//! │  │  max_entries    │   │  total_value    │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! LineItems come from pasted inventory text, TypeInfo from the item
//! catalog; the split engine only ever sees the joined ResolvedItem form.

use serde::{Deserialize, Serialize};

use crate::MAX_ENTRIES_PER_SPLIT;

// =============================================================================
// Line Item
// =============================================================================

/// One row of pasted inventory: an item name and how many of it.
///
/// Produced by [`crate::parse::parse_inventory`]. Duplicate names are kept
/// as separate rows in input order; they are never merged into one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name, trimmed, non-empty.
    pub name: String,

    /// Quantity from the pasted row (> 0).
    pub quantity: i64,
}

// =============================================================================
// Type Info
// =============================================================================

/// Catalog data for one item name.
///
/// This is the output shape of the item catalog resolver. The core never
/// fetches it; it arrives as an injected map keyed by item name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// ESI type id.
    pub type_id: i64,

    /// Packaged volume of one unit in m³. Zero when ESI has no volume.
    pub volume: f64,

    /// Market price of one unit in ISK. Zero when ESI has no price.
    pub price: f64,
}

// =============================================================================
// Resolved Item
// =============================================================================

/// A line item joined with its catalog data.
///
/// ## Invariant
/// Every name in the working set resolves to exactly one catalog record
/// before anything reaches the split engine. A missing record fails the
/// whole computation; there are no partially resolved batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedItem {
    /// Item name from the pasted row.
    pub name: String,

    /// Quantity from the pasted row (> 0).
    pub quantity: i64,

    /// ESI type id from the catalog.
    pub type_id: i64,

    /// Volume of one unit in m³ (≥ 0).
    pub unit_volume: f64,

    /// Price of one unit in ISK (≥ 0).
    pub unit_price: f64,
}

impl ResolvedItem {
    /// Total volume of the full line (unit volume × quantity).
    #[inline]
    pub fn line_volume(&self) -> f64 {
        self.unit_volume * self.quantity as f64
    }

    /// Total value of the full line (unit price × quantity).
    #[inline]
    pub fn line_value(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }

    /// Value density: ISK per m³ of one unit.
    ///
    /// Quantity cancels out of the ratio, so density is computed per unit.
    /// Items without volume are treated as maximally dense and placed
    /// first during distribution.
    #[inline]
    pub fn value_density(&self) -> f64 {
        if self.unit_volume <= 0.0 {
            f64::INFINITY
        } else {
            self.unit_price / self.unit_volume
        }
    }
}

// =============================================================================
// Cargo Limits
// =============================================================================

/// Capacity constraints for one split.
///
/// ## Defaults
/// An unset value or volume limit means "unconstrained" and is stored as
/// `+∞`, which drops its term out of every capacity computation naturally.
/// The entry ceiling is always finite: the fittings endpoint enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoLimits {
    /// Maximum total ISK value per split (> 0).
    pub max_value: f64,

    /// Maximum total volume per split in m³ (> 0).
    pub max_volume: f64,

    /// Maximum number of entries per split.
    pub max_entries: usize,
}

impl CargoLimits {
    /// Creates limits from optional user inputs, defaulting each missing
    /// constraint to unconstrained.
    pub fn new(max_value: Option<f64>, max_volume: Option<f64>) -> Self {
        CargoLimits {
            max_value: max_value.unwrap_or(f64::INFINITY),
            max_volume: max_volume.unwrap_or(f64::INFINITY),
            max_entries: MAX_ENTRIES_PER_SPLIT,
        }
    }
}

impl Default for CargoLimits {
    fn default() -> Self {
        CargoLimits::new(None, None)
    }
}

// =============================================================================
// Split
// =============================================================================

/// One placement record: a (possibly partial) quantity of an item assigned
/// to a specific split.
///
/// An item type can appear as multiple entries across different splits when
/// its quantity is divided between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEntry {
    /// Item name.
    pub name: String,

    /// ESI type id.
    pub type_id: i64,

    /// Units of the item assigned by this entry (> 0).
    pub quantity: i64,
}

/// One output bin: entries plus running totals.
///
/// ## Lifecycle
/// Created empty at the start of distribution, mutated by appending
/// entries, read-only once the engine returns. Splits that end with zero
/// entries are discarded from the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Placement records in the order they were made.
    pub entries: Vec<SplitEntry>,

    /// Sum of entry volumes in m³.
    pub total_volume: f64,

    /// Sum of entry values in ISK.
    pub total_value: f64,
}

impl Split {
    /// Creates an empty split.
    pub fn new() -> Self {
        Split {
            entries: Vec::new(),
            total_volume: 0.0,
            total_value: 0.0,
        }
    }

    /// Number of entries placed in this split (not total units).
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been placed here.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized combined load under the given limits.
    ///
    /// Lower score = more room. Summing both ratios balances the two
    /// constraints instead of filling one axis and overflowing the other.
    /// With an unconstrained limit the ratio is 0, so that axis simply
    /// stops participating in the comparison.
    #[inline]
    pub fn load_score(&self, limits: &CargoLimits) -> f64 {
        self.total_value / limits.max_value + self.total_volume / limits.max_volume
    }

    /// Appends a placement of `quantity` units of `item` and updates the
    /// running totals.
    pub fn place(&mut self, item: &ResolvedItem, quantity: i64) {
        self.entries.push(SplitEntry {
            name: item.name.clone(),
            type_id: item.type_id,
            quantity,
        });
        self.total_volume += quantity as f64 * item.unit_volume;
        self.total_value += quantity as f64 * item.unit_price;
    }
}

impl Default for Split {
    fn default() -> Self {
        Split::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tritanium(quantity: i64) -> ResolvedItem {
        ResolvedItem {
            name: "Tritanium".to_string(),
            quantity,
            type_id: 34,
            unit_volume: 0.01,
            unit_price: 5.0,
        }
    }

    #[test]
    fn test_line_totals() {
        let item = tritanium(1000);
        assert_eq!(item.line_volume(), 10.0);
        assert_eq!(item.line_value(), 5000.0);
    }

    #[test]
    fn test_value_density() {
        let item = tritanium(1);
        assert_eq!(item.value_density(), 500.0);
    }

    #[test]
    fn test_zero_volume_density_is_maximal() {
        let mut item = tritanium(1);
        item.unit_volume = 0.0;
        assert_eq!(item.value_density(), f64::INFINITY);
    }

    #[test]
    fn test_limits_default_to_unconstrained() {
        let limits = CargoLimits::default();
        assert_eq!(limits.max_value, f64::INFINITY);
        assert_eq!(limits.max_volume, f64::INFINITY);
        assert_eq!(limits.max_entries, MAX_ENTRIES_PER_SPLIT);
    }

    #[test]
    fn test_split_place_accumulates() {
        let mut split = Split::new();
        split.place(&tritanium(1000), 600);
        split.place(&tritanium(1000), 400);

        assert_eq!(split.entry_count(), 2);
        assert!((split.total_volume - 10.0).abs() < 1e-9);
        assert!((split.total_value - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_score_with_unconstrained_axis() {
        let mut split = Split::new();
        split.place(&tritanium(1000), 1000);

        let limits = CargoLimits::new(Some(10_000.0), None);
        // Volume axis is unconstrained, only the value ratio counts.
        assert!((split.load_score(&limits) - 0.5).abs() < 1e-9);
    }
}
