//! # Catalog Resolution
//!
//! Joins parsed line items with catalog data into [`ResolvedItem`]s.
//!
//! The catalog arrives as a plain map keyed by item name. Where it comes
//! from (ESI, a fixture, a cache) is the caller's business; keeping the
//! lookup injected is what lets the split engine run without any network.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::types::{LineItem, ResolvedItem, TypeInfo};

/// Resolves every line item against the catalog map.
///
/// ## Failure
/// Any name without a catalog entry fails the whole batch with
/// [`CoreError::UnknownItem`]. There are no partial results: splitting a
/// half-resolved inventory would silently produce wrong totals.
pub fn resolve_line_items(
    lines: &[LineItem],
    catalog: &HashMap<String, TypeInfo>,
) -> CoreResult<Vec<ResolvedItem>> {
    lines
        .iter()
        .map(|line| {
            let info = catalog
                .get(&line.name)
                .ok_or_else(|| CoreError::UnknownItem(line.name.clone()))?;

            Ok(ResolvedItem {
                name: line.name.clone(),
                quantity: line.quantity,
                type_id: info.type_id,
                unit_volume: info.volume,
                unit_price: info.price,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
