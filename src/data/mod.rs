mod catalog;
mod prices;

pub use catalog::{Catalog, Crop, Market};
pub use prices::{PriceRow, PriceTable};

use thiserror::Error;

/// Validation failures when assembling the lookup tables from config.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("duplicate crop id: {0}")]
    DuplicateCrop(String),

    #[error("duplicate market id: {0}")]
    DuplicateMarket(String),

    #[error("price row references unknown crop id: {0}")]
    UnknownCrop(String),

    #[error("price row references unknown market id: {0}")]
    UnknownMarket(String),
}

/// Immutable lookup tables, loaded once at startup and passed into the menu
/// engine as an explicit dependency. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct MarketData {
    pub catalog: Catalog,
    pub prices: PriceTable,
}

impl MarketData {
    /// Validate that every price row points at a known crop and market.
    pub fn new(catalog: Catalog, prices: PriceTable) -> Result<Self, DataError> {
        for row in prices.rows() {
            if catalog.crop_by_id(&row.crop_id).is_none() {
                return Err(DataError::UnknownCrop(row.crop_id.clone()));
            }
            if catalog.market_by_id(&row.market_id).is_none() {
                return Err(DataError::UnknownMarket(row.market_id.clone()));
            }
        }
        Ok(Self { catalog, prices })
    }

    /// Markets with at least one price row for the crop, in catalog order.
    /// A row with an empty sample list still counts: the market carries the
    /// unit but has no data yet, and shows "-" rather than being hidden.
    pub fn best_markets(&self, crop_id: &str) -> Vec<&Market> {
        self.catalog
            .markets()
            .iter()
            .filter(|m| self.prices.has_rows(crop_id, &m.id))
            .collect()
    }
}
