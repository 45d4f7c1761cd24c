//! # Split Summary
//!
//! Aggregate statistics over a computed split list. Plain arithmetic
//! reduction, kept separate from the engine so rendering layers can show
//! totals without touching distribution state.

use serde::{Deserialize, Serialize};

use crate::types::Split;

/// Totals and averages over a final split list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    /// Total number of entries across all splits.
    pub item_count: usize,

    /// Sum of split volumes in m³.
    pub total_volume: f64,

    /// Sum of split values in ISK.
    pub total_value: f64,

    /// Number of splits.
    pub split_count: usize,

    /// Arithmetic mean volume per split (not weighted by entry count).
    pub avg_volume: f64,

    /// Arithmetic mean value per split (not weighted by entry count).
    pub avg_value: f64,
}

impl SplitSummary {
    /// Reduces a split list to its summary.
    pub fn from_splits(splits: &[Split]) -> Self {
        let split_count = splits.len();
        let item_count = splits.iter().map(Split::entry_count).sum();
        let total_volume: f64 = splits.iter().map(|s| s.total_volume).sum();
        let total_value: f64 = splits.iter().map(|s| s.total_value).sum();

        let (avg_volume, avg_value) = if split_count == 0 {
            (0.0, 0.0)
        } else {
            (
                total_volume / split_count as f64,
                total_value / split_count as f64,
            )
        };

        SplitSummary {
            item_count,
            total_volume,
            total_value,
            split_count,
            avg_volume,
            avg_value,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
