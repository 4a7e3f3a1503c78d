use rust_decimal::Decimal;

/// Price samples for one (crop, market, unit) triple.
#[derive(Debug, Clone)]
pub struct PriceRow {
    pub crop_id: String,
    pub market_id: String,
    /// Unit the crop is sold as at this market (e.g. "boxes", "crates").
    pub unit_name: String,
    /// Recent price samples, newest last. May be empty.
    pub samples: Vec<Decimal>,
}

impl PriceRow {
    /// Arithmetic mean of the samples. None when there are no samples.
    pub fn average(&self) -> Option<Decimal> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: Decimal = self.samples.iter().sum();
        Some(sum / Decimal::from(self.samples.len()))
    }

    /// The price as shown on screen: two decimals, or "-" with no data.
    /// Rounds first; precision formatting alone truncates a Decimal.
    pub fn display_price(&self) -> String {
        match self.average() {
            Some(avg) => format!("{:.2}", avg.round_dp(2)),
            None => "-".to_string(),
        }
    }
}

/// All price rows, in config order. Row order is display order, so a
/// market's units always list the same way.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    /// Unit rows for a (crop, market) pair, preserving table order.
    pub fn units_for<'a>(
        &'a self,
        crop_id: &'a str,
        market_id: &'a str,
    ) -> impl Iterator<Item = &'a PriceRow> {
        self.rows
            .iter()
            .filter(move |r| r.crop_id == crop_id && r.market_id == market_id)
    }

    /// Whether any unit row exists for the pair (even one without samples).
    pub fn has_rows(&self, crop_id: &str, market_id: &str) -> bool {
        self.units_for(crop_id, market_id).next().is_some()
    }
}
