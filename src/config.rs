use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

use crate::data::{Catalog, Crop, DataError, Market, MarketData, PriceRow, PriceTable};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub farmer: Farmer,
    pub crops: Vec<CropEntry>,
    pub markets: Vec<MarketEntry>,
    #[serde(default)]
    pub prices: Vec<PriceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: String,
}

/// Who the service greets. The real deployment resolves this per MSISDN
/// through the gateway framework; the simulator reads it from config.
#[derive(Debug, Deserialize)]
pub struct Farmer {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CropEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub name: String,
}

/// One price series: samples for a (crop, market, unit) triple.
/// An empty sample list is valid and renders as "-".
#[derive(Debug, Deserialize)]
pub struct PriceEntry {
    pub crop: String,
    pub market: String,
    pub unit: String,
    pub samples: Vec<Decimal>,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Build the validated lookup tables from the raw config entries.
    pub fn market_data(&self) -> Result<MarketData, DataError> {
        let crops = self
            .crops
            .iter()
            .map(|c| Crop {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect();
        let markets = self
            .markets
            .iter()
            .map(|m| Market {
                id: m.id.clone(),
                name: m.name.clone(),
            })
            .collect();
        let catalog = Catalog::new(crops, markets)?;

        let rows = self
            .prices
            .iter()
            .map(|p| PriceRow {
                crop_id: p.crop.clone(),
                market_id: p.market.clone(),
                unit_name: p.unit.clone(),
                samples: p.samples.clone(),
            })
            .collect();
        MarketData::new(catalog, PriceTable::new(rows))
    }
}
