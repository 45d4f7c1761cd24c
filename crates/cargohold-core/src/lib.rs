//! # cargohold-core: Pure Splitting Logic for Cargohold
//!
//! This crate is the **heart** of Cargohold. It turns a pasted inventory
//! list into cargo-sized splits as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cargohold Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       apps/cli                                  │   │
//! │  │    split ──► login ──► save-fits ──► whoami                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cargohold-esi                                │   │
//! │  │    SSO auth, item catalog resolution, fitting upload           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cargohold-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   parse   │  │  resolve  │  │   split   │  │  summary  │  │   │
//! │  │   │ LineItem  │  │ Resolved  │  │  greedy   │  │ aggregate │  │   │
//! │  │   │  rows     │  │  Item     │  │  packing  │  │  stats    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, ResolvedItem, Split, CargoLimits)
//! - [`isk`] - ISK and volume display formatting
//! - [`parse`] - Lenient tab-separated inventory parsing
//! - [`resolve`] - Joining parsed rows with catalog data
//! - [`split`] - The greedy split distribution engine
//! - [`summary`] - Aggregate statistics over computed splits
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and terminal access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **Injected Catalog**: item data arrives as a plain map, never from
//!    ambient state, so the engine stays testable in isolation
//!
//! ## Example Usage
//!
//! ```rust
//! use cargohold_core::parse::parse_inventory;
//! use cargohold_core::split::compute_splits;
//! use cargohold_core::types::{CargoLimits, ResolvedItem};
//!
//! let lines = parse_inventory("Tritanium\t1000\n");
//! assert_eq!(lines.len(), 1);
//!
//! let items = vec![ResolvedItem {
//!     name: "Tritanium".to_string(),
//!     quantity: 1000,
//!     type_id: 34,
//!     unit_volume: 0.01,
//!     unit_price: 5.0,
//! }];
//! let limits = CargoLimits::new(Some(10_000.0), Some(1_000.0));
//! let outcome = compute_splits(&items, &limits).unwrap();
//!
//! assert_eq!(outcome.splits.len(), 1);
//! assert!(outcome.unplaced.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod isk;
pub mod parse;
pub mod resolve;
pub mod split;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cargohold_core::Split` instead of
// `use cargohold_core::types::Split`

pub use error::{CoreError, CoreResult};
pub use isk::{Isk, Volume};
pub use parse::parse_inventory;
pub use resolve::resolve_line_items;
pub use split::{compute_splits, SplitOutcome, UnplacedItem};
pub use summary::SplitSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of entries a single split may hold.
///
/// ## Why 250?
/// The ESI fittings endpoint rejects fittings with more than 250 items
/// (`FittingTooManyItems`). The engine never produces a split that the
/// upload path would have to refuse.
pub const MAX_ENTRIES_PER_SPLIT: usize = 250;

/// Entry count at which a split is flagged as nearly full.
///
/// Presentation layers use this to warn before the hard ceiling is hit.
pub const ENTRY_WARN_THRESHOLD: usize = 200;
