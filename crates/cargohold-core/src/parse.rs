//! # Inventory Parsing
//!
//! Lenient parsing of pasted inventory text into [`LineItem`] rows.
//!
//! ## Input Shape
//! The expected source is a copy-paste from the in-game inventory window,
//! which produces tab-separated columns:
//!
//! ```text
//! Tritanium\t29438\tMineral\t294.38 m3
//! Pyerite\t10200\tMineral\t102.00 m3
//! ```
//!
//! Only the first two columns matter (name, quantity). Anything after them
//! is ignored, which is what makes pasted spreadsheet rows with trailing
//! metadata columns work unmodified.
//!
//! ## Leniency
//! Rows that don't qualify (fewer than two columns, quantity not an
//! integer) are dropped without error. This is deliberate: a stray header
//! or total row in the paste should never block the calculation.

use crate::types::LineItem;

/// Parses raw pasted text into line items.
///
/// ## Rules
/// - One row per line, columns split on tab
/// - Column 0 trimmed is the name, column 1 trimmed must parse as an integer
/// - Non-qualifying rows are silently skipped
/// - Output order matches input order; duplicate names stay separate rows
pub fn parse_inventory(raw: &str) -> Vec<LineItem> {
    raw.trim()
        .lines()
        .filter_map(parse_row)
        .collect()
}

/// Parses one row, returning `None` when it doesn't qualify.
fn parse_row(line: &str) -> Option<LineItem> {
    let mut columns = line.trim().split('\t');

    let name = columns.next()?.trim();
    let quantity = columns.next()?.trim().parse::<i64>().ok()?;

    if name.is_empty() || quantity <= 0 {
        return None;
    }

    Some(LineItem {
        name: name.to_string(),
        quantity,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_rows() {
        let items = parse_inventory("Tritanium\t1000\nPyerite\t500");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Tritanium");
        assert_eq!(items[0].quantity, 1000);
        assert_eq!(items[1].name, "Pyerite");
        assert_eq!(items[1].quantity, 500);
    }

    #[test]
    fn test_trailing_columns_ignored() {
        let items = parse_inventory("Tritanium\t1000\tMineral\t10 m3");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1000);
    }

    #[test]
    fn test_malformed_rows_dropped_silently() {
        let raw = "Tritanium\t1000\n\
                   just a name\n\
                   Pyerite\tlots\n\
                   \n\
                   Mexallon\t250";
        let items = parse_inventory(raw);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Tritanium");
        assert_eq!(items[1].name, "Mexallon");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let items = parse_inventory("  Tritanium \t 1000 \n");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tritanium");
        assert_eq!(items[0].quantity, 1000);
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let items = parse_inventory("Tritanium\t100\nPyerite\t1\nTritanium\t200");

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].quantity, 100);
        assert_eq!(items[2].name, "Tritanium");
        assert_eq!(items[2].quantity, 200);
    }

    #[test]
    fn test_non_positive_quantities_dropped() {
        let items = parse_inventory("Tritanium\t0\nPyerite\t-5\nMexallon\t1");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Mexallon");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_inventory("").is_empty());
        assert!(parse_inventory("   \n  \n").is_empty());
    }
}
