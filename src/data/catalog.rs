use std::collections::HashSet;

use super::DataError;

/// A crop the service knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crop {
    pub id: String,
    /// Display name shown in menus (e.g. "Peas").
    pub name: String,
}

/// A market the service knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    pub id: String,
    /// Display name shown in menus (e.g. "Kitwe").
    pub name: String,
}

/// The fixed crop and market sets. Order is load order and drives menu
/// numbering, so it must stay stable across invocations.
#[derive(Debug, Clone)]
pub struct Catalog {
    crops: Vec<Crop>,
    markets: Vec<Market>,
}

impl Catalog {
    pub fn new(crops: Vec<Crop>, markets: Vec<Market>) -> Result<Self, DataError> {
        let mut seen = HashSet::new();
        for crop in &crops {
            if !seen.insert(crop.id.as_str()) {
                return Err(DataError::DuplicateCrop(crop.id.clone()));
            }
        }
        seen.clear();
        for market in &markets {
            if !seen.insert(market.id.as_str()) {
                return Err(DataError::DuplicateMarket(market.id.clone()));
            }
        }
        Ok(Self { crops, markets })
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn crop_by_id(&self, id: &str) -> Option<&Crop> {
        self.crops.iter().find(|c| c.id == id)
    }

    pub fn market_by_id(&self, id: &str) -> Option<&Market> {
        self.markets.iter().find(|m| m.id == id)
    }

    /// Crop at a 0-based menu position.
    pub fn crop_at(&self, idx: usize) -> Option<&Crop> {
        self.crops.get(idx)
    }
}
