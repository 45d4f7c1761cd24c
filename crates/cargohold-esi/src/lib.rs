//! # cargohold-esi: EVE SSO and ESI Client
//!
//! This crate provides the network layer for Cargohold: logging a
//! character in through the EVE SSO (OAuth2 + PKCE), resolving pasted item
//! names to type ids, volumes, and prices, and uploading computed splits
//! as saved fittings.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ESI Client Flow                                 │
//! │                                                                         │
//! │  ┌────────────┐   authorize URL    ┌──────────────────┐                │
//! │  │  SsoAuth   │───────────────────►│ login.eveonline  │                │
//! │  │            │◄───────────────────│      .com        │                │
//! │  └─────┬──────┘   code → tokens    └──────────────────┘                │
//! │        │ bearer token                                                   │
//! │        ▼                                                                │
//! │  ┌────────────┐   /universe/ids    ┌──────────────────┐                │
//! │  │ItemCatalog │───────────────────►│                  │                │
//! │  │            │   /markets/prices  │  esi.evetech.net │                │
//! │  │            │   /universe/types  │                  │                │
//! │  └────────────┘                    │                  │                │
//! │  ┌────────────┐   POST /fittings   │                  │                │
//! │  │ Fittings   │───────────────────►│                  │                │
//! │  │ Client     │   (520 → retry)    └──────────────────┘                │
//! │  └────────────┘                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Endpoints, client id, scopes, datasource
//! - [`error`] - ESI error types with retryability categorization
//! - [`auth`] - PKCE login, token refresh, token persistence
//! - [`catalog`] - Item name resolution (the catalog resolver)
//! - [`fittings`] - Saved-fitting payloads and upload

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fittings;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{CharacterInfo, PkceCodes, SsoAuth, TokenInfo};
pub use catalog::ItemCatalog;
pub use config::EsiConfig;
pub use error::{EsiError, EsiResult};
pub use fittings::{FitItem, Fitting, FittingsClient, ITERON_MARK_V_TYPE_ID};
