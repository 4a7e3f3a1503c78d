//! Per-state transition rules. Each handler parses the input, records the
//! answer, updates the custom fields, and moves `current_state`. Returning
//! false means the input was rejected and the caller re-renders the same
//! prompt.

use crate::menu::{MarketList, MenuEngine, MenuState};
use crate::session::UserState;

pub(super) fn apply(engine: &MenuEngine, user: &mut UserState, input: &str) -> bool {
    match user.current_state {
        MenuState::SelectService => select_service(user, input),
        MenuState::SelectCrop => select_crop(engine, user, input),
        MenuState::SelectMarketList => select_market_list(engine, user, input),
        MenuState::SelectMarket => select_market(engine, user, input),
        MenuState::ShowPrices => show_prices(engine, user, input),
        // Terminal; the framework has already closed the session.
        MenuState::End => false,
    }
}

fn select_service(user: &mut UserState, input: &str) -> bool {
    if input != "1" {
        return false;
    }
    user.answers
        .insert(MenuState::SelectService, "market_prices".to_string());
    user.current_state = MenuState::SelectCrop;
    true
}

fn select_crop(engine: &MenuEngine, user: &mut UserState, input: &str) -> bool {
    let idx = match parse_choice(input, engine.data.catalog.crops().len()) {
        Some(idx) => idx,
        None => return false,
    };
    let crop = match engine.data.catalog.crop_at(idx) {
        Some(crop) => crop,
        None => return false,
    };
    user.answers.insert(MenuState::SelectCrop, crop.id.clone());
    user.custom.chosen_crop_name = Some(crop.name.clone());
    user.current_state = MenuState::SelectMarketList;
    true
}

fn select_market_list(engine: &MenuEngine, user: &mut UserState, input: &str) -> bool {
    let list = match input {
        "1" => MarketList::All,
        "2" => MarketList::Best,
        _ => return false,
    };
    user.answers
        .insert(MenuState::SelectMarketList, list.as_answer().to_string());

    // Fix the market set here, once; show_prices pages over this snapshot.
    let resolved = engine.resolved_markets(user);
    user.custom.chosen_markets = resolved;
    if user.custom.chosen_crop_name.is_none() {
        user.custom.chosen_crop_name = user
            .answers
            .get(&MenuState::SelectCrop)
            .and_then(|id| engine.data.catalog.crop_by_id(id))
            .map(|c| c.name.clone());
    }
    user.current_state = MenuState::SelectMarket;
    true
}

fn select_market(engine: &MenuEngine, user: &mut UserState, input: &str) -> bool {
    let markets = engine.resolved_markets(user);
    let idx = match parse_choice(input, markets.len()) {
        Some(idx) => idx,
        None => return false,
    };
    user.custom.chosen_markets = markets;
    user.set_price_cursor(idx);
    user.current_state = MenuState::ShowPrices;
    true
}

fn show_prices(engine: &MenuEngine, user: &mut UserState, input: &str) -> bool {
    if input == "3" {
        user.current_state = MenuState::End;
        return true;
    }

    // Same market set the price block was rendered from, including the
    // answers fallback for a replayed state with an empty custom bag.
    let markets = engine.resolved_markets(user);
    let len = markets.len();
    if len == 0 {
        return false;
    }
    let cur = user.price_cursor() % len;
    let next = match input {
        "1" => (cur + 1) % len,
        "2" => (cur + len - 1) % len,
        _ => return false,
    };
    user.custom.chosen_markets = markets;
    user.set_price_cursor(next);
    true
}

/// Parse a 1-based menu selection into a 0-based index.
fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.parse().ok()?;
    if n >= 1 && n <= len {
        Some(n - 1)
    } else {
        None
    }
}
