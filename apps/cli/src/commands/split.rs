//! The `split` command: parse, resolve, distribute, render.

use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use cargohold_core::split::SplitOutcome;
use cargohold_core::types::CargoLimits;
use cargohold_core::{compute_splits, parse_inventory, resolve_line_items, SplitSummary};
use cargohold_esi::{EsiConfig, ItemCatalog};

use crate::error::{AppError, AppResult};
use crate::prefs::Preferences;
use crate::render;

/// Runs the split command.
pub async fn run(
    input: Option<PathBuf>,
    max_value: Option<f64>,
    max_volume: Option<f64>,
) -> AppResult<()> {
    let outcome = compute_outcome(input, max_value, max_volume).await?;

    let summary = SplitSummary::from_splits(&outcome.splits);
    render::print_summary(&summary);
    render::print_splits(&outcome.splits);
    render::print_unplaced(&outcome.unplaced);

    Ok(())
}

/// Shared pipeline for `split` and `save-fits`: read input, resolve names
/// against ESI, and run the engine.
pub(crate) async fn compute_outcome(
    input: Option<PathBuf>,
    max_value: Option<f64>,
    max_volume: Option<f64>,
) -> AppResult<SplitOutcome> {
    let limits = effective_limits(max_value, max_volume)?;

    let raw = read_input(input)?;
    let lines = parse_inventory(&raw);
    if lines.is_empty() {
        return Err(AppError::NoItems);
    }
    debug!(rows = lines.len(), "Parsed inventory");

    let unique_names = unique_names(lines.iter().map(|l| l.name.as_str()));

    let config = EsiConfig::load_or_default(None);
    let catalog = ItemCatalog::new(config).resolve_names(&unique_names).await?;

    let items = resolve_line_items(&lines, &catalog)?;
    Ok(compute_splits(&items, &limits)?)
}

/// Merges command-line limits with stored preferences.
///
/// Explicit flags win and are written back, so the next run repeats the
/// last explicit choice without retyping it.
fn effective_limits(max_value: Option<f64>, max_volume: Option<f64>) -> AppResult<CargoLimits> {
    let mut prefs = Preferences::load_or_default();

    if max_value.is_some() || max_volume.is_some() {
        if max_value.is_some() {
            prefs.max_value = max_value;
        }
        if max_volume.is_some() {
            prefs.max_volume = max_volume;
        }
        prefs.save()?;
    }

    Ok(CargoLimits::new(
        max_value.or(prefs.max_value),
        max_volume.or(prefs.max_volume),
    ))
}

/// Reads the raw inventory from a file or stdin.
fn read_input(input: Option<PathBuf>) -> AppResult<String> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

/// Deduplicates names while keeping first-seen order.
fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_names_keep_first_seen_order() {
        let names = unique_names(
            ["Tritanium", "Pyerite", "Tritanium", "Mexallon"]
                .iter()
                .copied(),
        );
        assert_eq!(names, vec!["Tritanium", "Pyerite", "Mexallon"]);
    }
}
