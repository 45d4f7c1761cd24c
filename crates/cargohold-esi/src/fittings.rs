//! # Saved Fittings
//!
//! Turns computed splits into ESI fitting payloads and uploads them to
//! the logged-in character.
//!
//! ## Upload Behavior
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fitting Upload                                   │
//! │                                                                         │
//! │  For each split:                                                       │
//! │    build payload ──► POST /characters/{id}/fittings/                   │
//! │                        │                                               │
//! │                        ├── 2xx → record fitting_id                     │
//! │                        ├── 520 → wait 10 s, retry (max 3 attempts)     │
//! │                        └── else → typed error, no retry                │
//! │                                                                         │
//! │  Callers pace consecutive uploads by UPLOAD_PACING to stay friendly    │
//! │  with the endpoint's rate limiting.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cargohold_core::isk::{format_grouped, Isk};
use cargohold_core::types::Split;

use crate::auth::SsoAuth;
use crate::config::EsiConfig;
use crate::error::{EsiError, EsiResult};

/// Pause between consecutive fitting uploads.
pub const UPLOAD_PACING: Duration = Duration::from_secs(2);

/// Attempts per fitting when the server answers 520.
const SAVE_ATTEMPTS: usize = 3;

/// Pause before retrying after a 520.
const SERVER_BUSY_PAUSE: Duration = Duration::from_secs(10);

/// The Iteron Mark V hull, the default hauler for computed splits.
pub const ITERON_MARK_V_TYPE_ID: i64 = 657;

/// Expanded Cargohold II low-slot module.
const EXPANDED_CARGOHOLD_II_TYPE_ID: i64 = 1319;

// =============================================================================
// Payload Types
// =============================================================================

/// One item row inside a fitting payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitItem {
    /// Slot the item occupies ("Cargo", "LoSlot0", "RigSlot0", ...).
    pub flag: String,

    /// Item count.
    pub quantity: i64,

    /// ESI type id.
    pub type_id: i64,
}

/// A saved-fitting payload for `POST /characters/{id}/fittings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitting {
    /// Fitting name shown in game.
    pub name: String,

    /// Fitting description.
    pub description: String,

    /// Hull the fitting is saved against.
    pub ship_type_id: i64,

    /// Cargo rows plus any hull modules.
    pub items: Vec<FitItem>,
}

impl Fitting {
    /// Builds a fitting payload from one computed split.
    ///
    /// The name carries the split's position and formatted value so the
    /// in-game fitting list reads like the tool's own output. When the
    /// hull is an Iteron Mark V, the cargo-expander loadout is appended so
    /// the saved fit actually reaches the volume the split was computed
    /// for.
    pub fn from_split(index: usize, split: &Split, ship_type_id: i64) -> Self {
        let mut items: Vec<FitItem> = split
            .entries
            .iter()
            .map(|entry| FitItem {
                flag: "Cargo".to_string(),
                quantity: entry.quantity,
                type_id: entry.type_id,
            })
            .collect();

        if ship_type_id == ITERON_MARK_V_TYPE_ID {
            items.extend(iteron_expander_loadout());
        }

        Fitting {
            name: format!("Split {} - {}", index + 1, Isk(split.total_value)),
            description: format_grouped(split.total_value),
            ship_type_id,
            items,
        }
    }
}

/// Cargo-expander fit for the Iteron Mark V: five Expanded Cargohold II
/// lows and three cargohold optimization rigs.
fn iteron_expander_loadout() -> Vec<FitItem> {
    let mut loadout: Vec<FitItem> = (0..5)
        .map(|slot| FitItem {
            flag: format!("LoSlot{slot}"),
            quantity: 1,
            type_id: EXPANDED_CARGOHOLD_II_TYPE_ID,
        })
        .collect();

    loadout.push(FitItem {
        flag: "RigSlot0".to_string(),
        quantity: 1,
        type_id: 31125,
    });
    loadout.push(FitItem {
        flag: "RigSlot1".to_string(),
        quantity: 1,
        type_id: 31125,
    });
    loadout.push(FitItem {
        flag: "RigSlot2".to_string(),
        quantity: 1,
        type_id: 31119,
    });

    loadout
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateFittingResponse {
    fitting_id: i64,
}

#[derive(Debug, Deserialize)]
struct EsiErrorBody {
    error: Option<String>,
}

// =============================================================================
// Fittings Client
// =============================================================================

/// Authenticated client for the fittings endpoint.
pub struct FittingsClient {
    config: EsiConfig,
    http: reqwest::Client,
    auth: Arc<SsoAuth>,
}

impl FittingsClient {
    /// Creates a fittings client sharing the auth manager.
    pub fn new(config: EsiConfig, auth: Arc<SsoAuth>) -> Self {
        FittingsClient {
            config,
            http: reqwest::Client::new(),
            auth,
        }
    }

    /// Uploads one fitting, returning its new fitting id.
    ///
    /// A 520 answer is retried up to three times with a 10 second pause;
    /// everything else fails immediately with a typed error.
    pub async fn save_fitting(&self, fitting: &Fitting) -> EsiResult<i64> {
        let character = self.auth.character().await?;
        let url = format!(
            "{}/characters/{}/fittings/",
            self.config.esi_base_url, character.character_id
        );

        let mut attempts = 0;
        loop {
            let token = self.auth.get_token().await?;
            let response = self
                .http
                .post(&url)
                .bearer_auth(token)
                .json(fitting)
                .send()
                .await?;

            let status = response.status();

            if status.is_success() {
                let body: CreateFittingResponse = response.json().await?;
                info!(
                    fitting = %fitting.name,
                    fitting_id = body.fitting_id,
                    "Fitting saved"
                );
                return Ok(body.fitting_id);
            }

            if status.as_u16() == 520 {
                attempts += 1;
                if attempts >= SAVE_ATTEMPTS {
                    return Err(EsiError::ServerBusy);
                }
                warn!(
                    fitting = %fitting.name,
                    attempt = attempts,
                    "Server returned 520, waiting before retry"
                );
                tokio::time::sleep(SERVER_BUSY_PAUSE).await;
                continue;
            }

            let message = response
                .json::<EsiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("Fitting upload returned {status}"));
            debug!(fitting = %fitting.name, %message, "Fitting upload rejected");

            if message.contains("FittingTooManyItems") {
                return Err(EsiError::FittingTooManyItems {
                    name: fitting.name.clone(),
                });
            }

            return Err(EsiError::Api {
                status: status.as_u16(),
                message,
            });
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cargohold_core::types::{ResolvedItem, Split};

    fn split_with_tritanium() -> Split {
        let mut split = Split::new();
        split.place(
            &ResolvedItem {
                name: "Tritanium".to_string(),
                quantity: 1000,
                type_id: 34,
                unit_volume: 0.01,
                unit_price: 5.0,
            },
            1000,
        );
        split
    }

    #[test]
    fn test_fitting_from_split() {
        let fitting = Fitting::from_split(0, &split_with_tritanium(), 648);

        assert_eq!(fitting.name, "Split 1 - 5K ISK");
        assert_eq!(fitting.description, "5,000");
        assert_eq!(fitting.ship_type_id, 648);
        assert_eq!(
            fitting.items,
            vec![FitItem {
                flag: "Cargo".to_string(),
                quantity: 1000,
                type_id: 34,
            }]
        );
    }

    #[test]
    fn test_iteron_gets_expander_loadout() {
        let fitting =
            Fitting::from_split(2, &split_with_tritanium(), ITERON_MARK_V_TYPE_ID);

        assert_eq!(fitting.name, "Split 3 - 5K ISK");
        // 1 cargo row + 5 lows + 3 rigs
        assert_eq!(fitting.items.len(), 9);

        let lows: Vec<&FitItem> = fitting
            .items
            .iter()
            .filter(|i| i.flag.starts_with("LoSlot"))
            .collect();
        assert_eq!(lows.len(), 5);
        assert!(lows
            .iter()
            .all(|i| i.type_id == EXPANDED_CARGOHOLD_II_TYPE_ID));

        let rigs: Vec<&FitItem> = fitting
            .items
            .iter()
            .filter(|i| i.flag.starts_with("RigSlot"))
            .collect();
        assert_eq!(rigs.len(), 3);
    }

    #[test]
    fn test_other_hulls_get_cargo_only() {
        let fitting = Fitting::from_split(0, &split_with_tritanium(), 648);
        assert!(fitting.items.iter().all(|i| i.flag == "Cargo"));
    }

    #[test]
    fn test_payload_serialization_shape() {
        let fitting = Fitting::from_split(0, &split_with_tritanium(), 648);
        let json = serde_json::to_value(&fitting).unwrap();

        assert_eq!(json["ship_type_id"], 648);
        assert_eq!(json["items"][0]["flag"], "Cargo");
        assert_eq!(json["items"][0]["type_id"], 34);
        assert_eq!(json["items"][0]["quantity"], 1000);
    }
}
