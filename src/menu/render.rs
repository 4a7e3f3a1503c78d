//! Prompt rendering per state. USSD screens are plain text, one option per
//! line, so everything here is string assembly against the lookup tables.

use crate::menu::{MenuEngine, MenuState};
use crate::session::UserState;

pub(super) fn prompt(engine: &MenuEngine, user: &UserState) -> String {
    match user.current_state {
        MenuState::SelectService => format!(
            "Hi {}.\nSelect a service:\n1. Market prices",
            engine.farmer_name
        ),
        MenuState::SelectCrop => {
            let mut lines = vec!["Select a crop:".to_string()];
            for (i, crop) in engine.data.catalog.crops().iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, crop.name));
            }
            lines.join("\n")
        }
        MenuState::SelectMarketList => format!(
            "Select which markets to view:\n1. All markets\n2. Best markets for {}",
            engine.crop_name(user)
        ),
        MenuState::SelectMarket => {
            let mut lines = vec!["Select a market:".to_string()];
            for (i, (_, name)) in engine.resolved_markets(user).iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, name));
            }
            lines.join("\n")
        }
        MenuState::ShowPrices => price_block(engine, user),
        MenuState::End => "Goodbye!".to_string(),
    }
}

fn price_block(engine: &MenuEngine, user: &UserState) -> String {
    let markets = engine.resolved_markets(user);
    let crop_name = engine.crop_name(user);
    let mut lines = Vec::new();

    if markets.is_empty() {
        lines.push(format!("No markets found for {}.", crop_name));
    } else {
        let idx = user.price_cursor() % markets.len();
        let (market_id, market_name) = &markets[idx];
        lines.push(format!("Prices of {} in {}:", crop_name, market_name));
        if let Some(crop_id) = user.answers.get(&MenuState::SelectCrop) {
            for row in engine.data.prices.units_for(crop_id, market_id) {
                lines.push(format!("  {}: {}", row.unit_name, row.display_price()));
            }
        }
    }

    lines.push("Enter 1 for next market, 2 for previous market.".to_string());
    lines.push("Enter 3 to exit.".to_string());
    lines.join("\n")
}
