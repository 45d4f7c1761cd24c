//! # Split Engine
//!
//! Greedy distribution of resolved items into capacity-bounded splits.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Split Distribution                                 │
//! │                                                                         │
//! │  1. Lower-bound the split count                                        │
//! │     splits = max(⌈totVol / maxVol⌉, ⌈totVal / maxVal⌉, 1)              │
//! │                                                                         │
//! │  2. Sort items by value density (ISK per m³), highest first            │
//! │     Zero-volume items count as maximally dense                          │
//! │     Ties keep input order (stable sort)                                 │
//! │                                                                         │
//! │  3. For each item, while quantity remains:                             │
//! │     a. Pick the split with the lowest combined load                     │
//! │        (value ratio + volume ratio) among splits with                   │
//! │        entry room; append a fresh split if none has room                │
//! │     b. Place as many units as the tighter capacity axis admits          │
//! │     c. Nothing fits → stop placing this item, record the rest           │
//! │                                                                         │
//! │  4. Drop splits that stayed empty                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Density-first ordering front-loads space-expensive items while the bins
//! have the most room; the combined-load score keeps both constraints in
//! balance instead of filling one axis and overflowing the other. The
//! result is a deterministic heuristic, not an optimal packing: each
//! placement scans the current splits once, so the whole run is
//! O(items × splits) per placement batch rather than per unit.
//!
//! ## Leftovers
//! An item whose single unit exceeds the remaining capacity of the chosen
//! split cannot be placed further. The engine never overfills a split to
//! make it fit; the remainder is reported in [`SplitOutcome::unplaced`] so
//! callers can warn about it.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{CargoLimits, ResolvedItem, Split};
use crate::validation::{validate_item, validate_limits};

// =============================================================================
// Outcome Types
// =============================================================================

/// Quantity of an item that could not be placed into any split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedItem {
    /// Item name.
    pub name: String,

    /// ESI type id.
    pub type_id: i64,

    /// Units left over after distribution.
    pub quantity: i64,
}

/// Result of a split computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitOutcome {
    /// Non-empty splits in creation order.
    pub splits: Vec<Split>,

    /// Items with leftover quantity, in placement order.
    pub unplaced: Vec<UnplacedItem>,
}

impl SplitOutcome {
    /// True when every unit of every item was placed.
    pub fn is_fully_placed(&self) -> bool {
        self.unplaced.is_empty()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Distributes items into splits under the given limits.
///
/// ## Contract
/// - Empty `items` → empty outcome (a no-op, not an error)
/// - Non-empty `items` but zero non-empty splits →
///   [`CoreError::Infeasible`]
/// - Every returned split satisfies `entry_count ≤ max_entries`,
///   `total_value ≤ max_value`, and `total_volume ≤ max_volume`
/// - Identical input produces identical output
pub fn compute_splits(items: &[ResolvedItem], limits: &CargoLimits) -> CoreResult<SplitOutcome> {
    validate_limits(limits)?;
    for item in items {
        validate_item(item)?;
    }

    if items.is_empty() {
        return Ok(SplitOutcome {
            splits: Vec::new(),
            unplaced: Vec::new(),
        });
    }

    let total_volume: f64 = items.iter().map(ResolvedItem::line_volume).sum();
    let total_value: f64 = items.iter().map(ResolvedItem::line_value).sum();

    let mut splits: Vec<Split> = (0..initial_split_count(total_volume, total_value, limits))
        .map(|_| Split::new())
        .collect();
    let mut unplaced: Vec<UnplacedItem> = Vec::new();

    // Highest density first; stable sort keeps input order on ties.
    let mut ordered: Vec<&ResolvedItem> = items.iter().collect();
    ordered.sort_by(|a, b| b.value_density().total_cmp(&a.value_density()));

    for item in ordered {
        let mut remaining = item.quantity;

        while remaining > 0 {
            let target = match select_split(&splits, limits) {
                Some(idx) => idx,
                None => {
                    // Every split is at the entry ceiling.
                    splits.push(Split::new());
                    splits.len() - 1
                }
            };

            let take = placeable_quantity(&splits[target], item, remaining, limits);
            if take <= 0 {
                break;
            }

            splits[target].place(item, take);
            remaining -= take;
        }

        if remaining > 0 {
            unplaced.push(UnplacedItem {
                name: item.name.clone(),
                type_id: item.type_id,
                quantity: remaining,
            });
        }
    }

    splits.retain(|split| !split.is_empty());

    if splits.is_empty() {
        return Err(CoreError::Infeasible {
            item_count: items.len(),
        });
    }

    Ok(SplitOutcome { splits, unplaced })
}

/// Lower bound on the number of splits needed.
///
/// The greedy pass may still append splits beyond this count when the
/// per-split entry ceiling binds.
fn initial_split_count(total_volume: f64, total_value: f64, limits: &CargoLimits) -> usize {
    let by_volume = (total_volume / limits.max_volume).ceil();
    let by_value = (total_value / limits.max_value).ceil();
    by_volume.max(by_value).max(1.0) as usize
}

/// Picks the split with the lowest combined load among those with entry
/// room, or `None` when all are at the ceiling.
///
/// A linear scan with a running best: split counts are small, and scores
/// change after every placement, so there is nothing to gain from a heap.
/// The first split wins ties, which keeps the choice deterministic.
fn select_split(splits: &[Split], limits: &CargoLimits) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, split) in splits.iter().enumerate() {
        if split.entry_count() >= limits.max_entries {
            continue;
        }

        let score = split.load_score(limits);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((idx, score)),
        }
    }

    best.map(|(idx, _)| idx)
}

/// Units of `item` that fit into `split`, bounded by the remaining
/// quantity and both capacity axes.
fn placeable_quantity(
    split: &Split,
    item: &ResolvedItem,
    remaining: i64,
    limits: &CargoLimits,
) -> i64 {
    let by_value = axis_allowance(limits.max_value - split.total_value, item.unit_price);
    let by_volume = axis_allowance(limits.max_volume - split.total_volume, item.unit_volume);

    let take = (remaining as f64).min(by_value).min(by_volume);
    if take <= 0.0 {
        0
    } else {
        take as i64
    }
}

/// Units one capacity axis still admits.
///
/// A unit that costs nothing on an axis (zero price, zero volume) never
/// binds it. Otherwise the floored quotient stands as-is: a result of zero
/// means the next unit genuinely does not fit, and forcing it in would
/// push the split over its limit.
fn axis_allowance(capacity_left: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        return f64::INFINITY;
    }
    (capacity_left / unit).floor()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(name: &str, quantity: i64, unit_volume: f64, unit_price: f64) -> ResolvedItem {
        ResolvedItem {
            name: name.to_string(),
            quantity,
            type_id: name.len() as i64,
            unit_volume,
            unit_price,
        }
    }

    /// Sums placed quantities per item name across all splits.
    fn placed_by_name(outcome: &SplitOutcome) -> HashMap<String, i64> {
        let mut totals = HashMap::new();
        for split in &outcome.splits {
            for entry in &split.entries {
                *totals.entry(entry.name.clone()).or_insert(0) += entry.quantity;
            }
        }
        totals
    }

    #[test]
    fn test_single_item_single_split() {
        // 1000 × Tritanium: 10 m³ and 5,000 ISK total, well inside limits
        let items = vec![item("Tritanium", 1000, 0.01, 5.0)];
        let limits = CargoLimits::new(Some(10_000.0), Some(1_000.0));

        let outcome = compute_splits(&items, &limits).unwrap();

        assert_eq!(outcome.splits.len(), 1);
        assert!(outcome.is_fully_placed());
        assert!((outcome.splits[0].total_volume - 10.0).abs() < 1e-9);
        assert!((outcome.splits[0].total_value - 5000.0).abs() < 1e-9);
        assert_eq!(placed_by_name(&outcome)["Tritanium"], 1000);
    }

    #[test]
    fn test_volume_bound_dominates_value_bound() {
        // Each item: 150 m³, 75 ISK. Together: 300 m³ (3 splits by volume)
        // and 150 ISK (2 splits by value). The volume bound wins.
        let items = vec![
            item("Ore A", 15, 10.0, 5.0),
            item("Ore B", 15, 10.0, 5.0),
        ];
        let limits = CargoLimits::new(Some(100.0), Some(100.0));

        let outcome = compute_splits(&items, &limits).unwrap();

        assert!(outcome.splits.len() >= 3);
        assert!(outcome.is_fully_placed());
        assert_eq!(placed_by_name(&outcome)["Ore A"], 15);
        assert_eq!(placed_by_name(&outcome)["Ore B"], 15);
        for split in &outcome.splits {
            assert!(split.total_volume <= 100.0 + 1e-9);
            assert!(split.total_value <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_entry_ceiling_forces_extra_split() {
        // 300 distinct single-unit lines with ample headroom: the entry
        // ceiling is the only binding constraint.
        let items: Vec<ResolvedItem> = (0..300)
            .map(|i| item(&format!("Module {i}"), 1, 1.0, 1.0))
            .collect();
        let limits = CargoLimits::default();

        let outcome = compute_splits(&items, &limits).unwrap();

        assert!(outcome.splits.len() >= 2);
        assert!(outcome.is_fully_placed());
        for split in &outcome.splits {
            assert!(split.entry_count() <= limits.max_entries);
        }
        let placed: i64 = outcome
            .splits
            .iter()
            .flat_map(|s| s.entries.iter())
            .map(|e| e.quantity)
            .sum();
        assert_eq!(placed, 300);
    }

    #[test]
    fn test_small_entry_ceiling() {
        let items = vec![
            item("A", 1, 1.0, 1.0),
            item("B", 1, 1.0, 1.0),
            item("C", 1, 1.0, 1.0),
        ];
        let mut limits = CargoLimits::default();
        limits.max_entries = 2;

        let outcome = compute_splits(&items, &limits).unwrap();

        assert_eq!(outcome.splits.len(), 2);
        assert!(outcome.is_fully_placed());
        assert_eq!(outcome.splits[0].entry_count(), 2);
        assert_eq!(outcome.splits[1].entry_count(), 1);
    }

    #[test]
    fn test_item_divided_across_splits() {
        // Value cap of 1,000 ISK forces the 1,500 units apart.
        let items = vec![item("Pyerite", 1500, 0.01, 1.0)];
        let limits = CargoLimits::new(Some(1_000.0), None);

        let outcome = compute_splits(&items, &limits).unwrap();

        assert_eq!(outcome.splits.len(), 2);
        assert!(outcome.is_fully_placed());
        assert_eq!(placed_by_name(&outcome)["Pyerite"], 1500);
        // The first split may reach the cap exactly but never exceed it.
        for split in &outcome.splits {
            assert!(split.total_value <= 1_000.0 + 1e-9);
        }
    }

    #[test]
    fn test_oversized_unit_left_unplaced() {
        // A single unit larger than the whole volume cap cannot go
        // anywhere; the rest of the inventory still splits normally.
        let items = vec![
            item("Station Egg", 2, 2_000.0, 10.0),
            item("Tritanium", 100, 0.01, 5.0),
        ];
        let limits = CargoLimits::new(None, Some(1_000.0));

        let outcome = compute_splits(&items, &limits).unwrap();

        assert_eq!(
            outcome.unplaced,
            vec![UnplacedItem {
                name: "Station Egg".to_string(),
                type_id: "Station Egg".len() as i64,
                quantity: 2,
            }]
        );
        assert_eq!(placed_by_name(&outcome)["Tritanium"], 100);
        for split in &outcome.splits {
            assert!(split.total_volume <= 1_000.0);
        }
    }

    #[test]
    fn test_nothing_placeable_is_infeasible() {
        let items = vec![item("Station Egg", 1, 2_000.0, 10.0)];
        let limits = CargoLimits::new(None, Some(1_000.0));

        let err = compute_splits(&items, &limits).unwrap_err();
        assert!(matches!(err, CoreError::Infeasible { item_count: 1 }));
    }

    #[test]
    fn test_empty_input_is_empty_outcome() {
        let outcome = compute_splits(&[], &CargoLimits::default()).unwrap();
        assert!(outcome.splits.is_empty());
        assert!(outcome.unplaced.is_empty());
    }

    #[test]
    fn test_zero_volume_item_placed_first() {
        // Blueprints have no packaged volume; they must not divide by zero
        // and should land before bulky ore.
        let items = vec![
            item("Veldspar", 100, 0.25, 10.0),
            item("Blueprint", 1, 0.0, 1_000_000.0),
        ];
        let limits = CargoLimits::new(None, Some(5.0));

        let outcome = compute_splits(&items, &limits).unwrap();

        assert!(outcome.is_fully_placed());
        assert_eq!(outcome.splits[0].entries[0].name, "Blueprint");
    }

    #[test]
    fn test_zero_price_zero_volume_goes_in_one_entry() {
        let items = vec![item("Corpse", 50, 0.0, 0.0)];
        let limits = CargoLimits::new(Some(100.0), Some(100.0));

        let outcome = compute_splits(&items, &limits).unwrap();

        assert_eq!(outcome.splits.len(), 1);
        assert_eq!(outcome.splits[0].entries.len(), 1);
        assert_eq!(outcome.splits[0].entries[0].quantity, 50);
    }

    #[test]
    fn test_density_order_ties_keep_input_order() {
        let items = vec![
            item("First", 1, 1.0, 10.0),
            item("Second", 1, 1.0, 10.0),
            item("Third", 1, 1.0, 10.0),
        ];
        let limits = CargoLimits::default();

        let outcome = compute_splits(&items, &limits).unwrap();

        let names: Vec<&str> = outcome.splits[0]
            .entries
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_deterministic() {
        let items = vec![
            item("Ore A", 137, 3.0, 7.0),
            item("Ore B", 91, 2.0, 11.0),
            item("Ore C", 64, 5.0, 7.5),
        ];
        let limits = CargoLimits::new(Some(500.0), Some(300.0));

        let first = compute_splits(&items, &limits).unwrap();
        let second = compute_splits(&items, &limits).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_count_never_below_lower_bound() {
        let items = vec![item("Ore", 100, 2.0, 4.0)];
        let limits = CargoLimits::new(Some(100.0), Some(50.0));
        // Totals: 200 m³ → 4 splits by volume; 400 ISK → 4 splits by value.

        let outcome = compute_splits(&items, &limits).unwrap();
        assert!(outcome.splits.len() >= 4);
        assert!(outcome.is_fully_placed());
    }

    #[test]
    fn test_fragmented_capacity_reports_leftover() {
        // Two splits each end up with 6/10 m³ used; the third unit would
        // fit an empty split, but none is created below the entry ceiling,
        // so the leftover is reported instead of overfilling.
        let items = vec![item("Crate", 3, 6.0, 1.0)];
        let limits = CargoLimits::new(None, Some(10.0));

        let outcome = compute_splits(&items, &limits).unwrap();

        assert_eq!(outcome.splits.len(), 2);
        assert_eq!(placed_by_name(&outcome)["Crate"], 2);
        assert_eq!(outcome.unplaced.len(), 1);
        assert_eq!(outcome.unplaced[0].quantity, 1);
        for split in &outcome.splits {
            assert!(split.total_volume <= 10.0);
        }
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let items = vec![item("Ore", 1, 1.0, 1.0)];
        let limits = CargoLimits::new(Some(0.0), None);

        assert!(compute_splits(&items, &limits).is_err());
    }
}
