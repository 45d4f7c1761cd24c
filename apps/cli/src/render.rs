//! # Terminal Rendering
//!
//! Formats summaries, splits, and leftovers for the terminal. The string
//! building is kept separate from printing so it stays testable.

use console::style;

use cargohold_core::isk::{Isk, Volume};
use cargohold_core::split::UnplacedItem;
use cargohold_core::types::Split;
use cargohold_core::{SplitSummary, ENTRY_WARN_THRESHOLD, MAX_ENTRIES_PER_SPLIT};

// =============================================================================
// Entry Count Bands
// =============================================================================

/// How close a split's entry count is to the fitting limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryBand {
    /// Comfortably below the limit.
    Normal,
    /// Near the limit, worth a look before uploading.
    High,
    /// At the limit.
    Max,
}

/// Classifies an entry count against the warning thresholds.
pub fn entry_band(count: usize) -> EntryBand {
    if count >= MAX_ENTRIES_PER_SPLIT {
        EntryBand::Max
    } else if count >= ENTRY_WARN_THRESHOLD {
        EntryBand::High
    } else {
        EntryBand::Normal
    }
}

// =============================================================================
// Line Builders
// =============================================================================

/// Builds the header line for one split.
pub fn split_header(index: usize, split: &Split) -> String {
    format!(
        "Split {} - Items: {}/{} - {} - {}",
        index + 1,
        split.entry_count(),
        MAX_ENTRIES_PER_SPLIT,
        Volume(split.total_volume),
        Isk(split.total_value),
    )
}

// =============================================================================
// Printing
// =============================================================================

/// Prints the aggregate statistics block.
pub fn print_summary(summary: &SplitSummary) {
    println!("{}", style("Totals").bold());
    println!("  Total Items:          {}", summary.item_count);
    println!("  Total Volume:         {}", Volume(summary.total_volume));
    println!("  Total Value:          {}", Isk(summary.total_value));
    println!("  Number of Splits:     {}", summary.split_count);
    println!("  Average Split Volume: {}", Volume(summary.avg_volume));
    println!("  Average Split Value:  {}", Isk(summary.avg_value));
    println!();
}

/// Prints every split with its entries.
pub fn print_splits(splits: &[Split]) {
    for (index, split) in splits.iter().enumerate() {
        let header = split_header(index, split);
        match entry_band(split.entry_count()) {
            EntryBand::Max => println!("{}", style(header).red().bold()),
            EntryBand::High => println!("{}", style(header).yellow()),
            EntryBand::Normal => println!("{}", style(header).bold()),
        }

        for entry in &split.entries {
            println!("  {} x{}", entry.name, entry.quantity);
        }
        println!();
    }
}

/// Prints leftover quantities that fit nowhere, if any.
pub fn print_unplaced(unplaced: &[UnplacedItem]) {
    if unplaced.is_empty() {
        return;
    }

    println!(
        "{}",
        style("Warning: some quantities did not fit into any split:")
            .yellow()
            .bold()
    );
    for item in unplaced {
        println!("  {} x{}", item.name, item.quantity);
    }
    println!();
}

// =============================================================================
// Unit Tests
// =============================================================================
