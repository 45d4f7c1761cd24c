//! # Item Catalog Resolver
//!
//! Resolves pasted item names into type ids, packaged volumes, and market
//! prices using three ESI routes:
//!
//! ```text
//! POST /universe/ids/        names → type ids
//! GET  /markets/prices/      global price list (fetched once, indexed)
//! GET  /universe/types/{id}  packaged volume per type
//! ```
//!
//! The output is a plain `name → TypeInfo` map. Names ESI does not know
//! are simply absent; the core's resolve step turns absences into a fatal
//! error before any splitting happens.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use cargohold_core::types::TypeInfo;

use crate::config::EsiConfig;
use crate::error::{EsiError, EsiResult};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct UniverseIdsResponse {
    inventory_types: Option<Vec<InventoryType>>,
}

#[derive(Debug, Deserialize)]
struct InventoryType {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MarketPrice {
    type_id: i64,
    average_price: Option<f64>,
    adjusted_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TypeData {
    packaged_volume: Option<f64>,
}

// =============================================================================
// Item Catalog
// =============================================================================

/// ESI-backed item catalog.
pub struct ItemCatalog {
    config: EsiConfig,
    http: reqwest::Client,
}

impl ItemCatalog {
    /// Creates a catalog client.
    pub fn new(config: EsiConfig) -> Self {
        ItemCatalog {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Resolves item names to catalog records.
    ///
    /// ## Behavior
    /// - Names the ids endpoint does not recognize are left out of the map
    /// - A type whose detail lookup fails is left out too (and logged),
    ///   matching how an unknown name behaves
    /// - Types without a market price resolve with price 0
    pub async fn resolve_names(&self, names: &[String]) -> EsiResult<HashMap<String, TypeInfo>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = self.fetch_type_ids(names).await?;
        debug!(requested = names.len(), resolved = ids.len(), "Resolved item ids");

        // One price list fetch serves every item in the batch.
        let prices = self.fetch_market_prices().await?;

        let mut catalog = HashMap::with_capacity(ids.len());
        for inventory_type in ids {
            match self.fetch_packaged_volume(inventory_type.id).await {
                Ok(volume) => {
                    catalog.insert(
                        inventory_type.name,
                        TypeInfo {
                            type_id: inventory_type.id,
                            volume,
                            price: price_for(prices.get(&inventory_type.id)),
                        },
                    );
                }
                Err(e) => {
                    warn!(
                        name = %inventory_type.name,
                        type_id = inventory_type.id,
                        error = %e,
                        "Skipping item, type lookup failed"
                    );
                }
            }
        }

        Ok(catalog)
    }

    /// POST the unique names to the ids endpoint.
    async fn fetch_type_ids(&self, names: &[String]) -> EsiResult<Vec<InventoryType>> {
        let url = format!(
            "{}/universe/ids/?datasource={}&language=en",
            self.config.esi_base_url, self.config.datasource
        );

        let response = self.http.post(&url).json(&names).send().await?;
        if !response.status().is_success() {
            return Err(EsiError::ResolutionFailed);
        }

        let body: UniverseIdsResponse = response.json().await?;
        Ok(body.inventory_types.unwrap_or_default())
    }

    /// GET the global market price list, indexed by type id.
    async fn fetch_market_prices(&self) -> EsiResult<HashMap<i64, MarketPrice>> {
        let url = format!(
            "{}/markets/prices/?datasource={}",
            self.config.esi_base_url, self.config.datasource
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EsiError::Api {
                status: response.status().as_u16(),
                message: "Failed to fetch market prices".into(),
            });
        }

        let prices: Vec<MarketPrice> = response.json().await?;
        Ok(prices.into_iter().map(|p| (p.type_id, p)).collect())
    }

    /// GET one type's packaged volume.
    async fn fetch_packaged_volume(&self, type_id: i64) -> EsiResult<f64> {
        let url = format!(
            "{}/universe/types/{}/?datasource={}",
            self.config.esi_base_url, type_id, self.config.datasource
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EsiError::Api {
                status: response.status().as_u16(),
                message: format!("Failed to fetch type {type_id}"),
            });
        }

        let body: TypeData = response.json().await?;
        Ok(body.packaged_volume.unwrap_or(0.0))
    }
}

/// Picks the unit price from a market record.
///
/// The average price wins when present and non-zero, then the adjusted
/// price; a type without market data prices at 0.
fn price_for(price: Option<&MarketPrice>) -> f64 {
    let Some(price) = price else {
        return 0.0;
    };

    price
        .average_price
        .filter(|p| *p != 0.0)
        .or(price.adjusted_price)
        .unwrap_or(0.0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_prefers_average() {
        let price = MarketPrice {
            type_id: 34,
            average_price: Some(5.2),
            adjusted_price: Some(4.9),
        };
        assert_eq!(price_for(Some(&price)), 5.2);
    }

    #[test]
    fn test_price_falls_back_to_adjusted() {
        let price = MarketPrice {
            type_id: 34,
            average_price: None,
            adjusted_price: Some(4.9),
        };
        assert_eq!(price_for(Some(&price)), 4.9);

        let zero_average = MarketPrice {
            type_id: 34,
            average_price: Some(0.0),
            adjusted_price: Some(4.9),
        };
        assert_eq!(price_for(Some(&zero_average)), 4.9);
    }

    #[test]
    fn test_missing_price_is_zero() {
        assert_eq!(price_for(None), 0.0);

        let empty = MarketPrice {
            type_id: 34,
            average_price: None,
            adjusted_price: None,
        };
        assert_eq!(price_for(Some(&empty)), 0.0);
    }

    #[test]
    fn test_ids_response_shape() {
        let body = r#"{"inventory_types": [{"id": 34, "name": "Tritanium"}]}"#;
        let parsed: UniverseIdsResponse = serde_json::from_str(body).unwrap();
        let types = parsed.inventory_types.unwrap();

        assert_eq!(types.len(), 1);
        assert_eq!(types[0].id, 34);
        assert_eq!(types[0].name, "Tritanium");
    }

    #[test]
    fn test_ids_response_without_matches() {
        // ESI omits the key entirely when nothing matched
        let parsed: UniverseIdsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.inventory_types.is_none());
    }

    #[test]
    fn test_type_data_shape() {
        let parsed: TypeData =
            serde_json::from_str(r#"{"packaged_volume": 0.01, "name": "Tritanium"}"#).unwrap();
        assert_eq!(parsed.packaged_volume, Some(0.01));

        let no_volume: TypeData = serde_json::from_str(r#"{"name": "Weird Type"}"#).unwrap();
        assert_eq!(no_volume.packaged_volume, None);
    }
}
