mod flow;
mod render;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::MarketData;
use crate::session::{Turn, UserState};

/// The menu states, in visit order. Serialized names are the wire contract
/// with the gateway framework.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    #[default]
    SelectService,
    SelectCrop,
    SelectMarketList,
    SelectMarket,
    ShowPrices,
    End,
}

impl MenuState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectService => "select_service",
            Self::SelectCrop => "select_crop",
            Self::SelectMarketList => "select_market_list",
            Self::SelectMarket => "select_market",
            Self::ShowPrices => "show_prices",
            Self::End => "end",
        }
    }
}

/// Which market set the user asked to browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketList {
    All,
    Best,
}

impl MarketList {
    /// The value recorded in `answers["select_market_list"]`.
    pub fn as_answer(&self) -> &'static str {
        match self {
            Self::All => "all_markets",
            Self::Best => "best_markets",
        }
    }

    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer {
            "all_markets" => Some(Self::All),
            "best_markets" => Some(Self::Best),
            _ => None,
        }
    }
}

/// The session state machine. Stateless between invocations: each step gets
/// the persisted user state plus the new input, and returns the reply and
/// updated state for the framework to persist.
pub struct MenuEngine {
    pub farmer_name: String,
    pub data: MarketData,
}

impl MenuEngine {
    pub fn new(farmer_name: impl Into<String>, data: MarketData) -> Self {
        Self {
            farmer_name: farmer_name.into(),
            data,
        }
    }

    /// Run one session step.
    ///
    /// `user` is None on first contact, `content` is None when the gateway
    /// opens a session (or replays the current prompt). Blank or invalid
    /// input leaves the state unchanged and re-renders the same prompt.
    pub fn step(&self, user: Option<UserState>, content: Option<&str>) -> Turn {
        let mut user = user.unwrap_or_default();
        let from = user.current_state;

        if let Some(input) = content.map(str::trim).filter(|s| !s.is_empty()) {
            if flow::apply(self, &mut user, input) {
                debug!(
                    from = from.as_str(),
                    to = user.current_state.as_str(),
                    input,
                    "transition"
                );
            } else {
                debug!(state = from.as_str(), input, "invalid input, re-prompting");
            }
        }

        let response = render::prompt(self, &user);
        Turn {
            next_state: user.current_state,
            response,
            continue_session: user.current_state != MenuState::End,
            user,
        }
    }

    /// The market set in play: the persisted `chosen_markets` when present,
    /// otherwise re-resolved from the recorded answers. The fallback covers
    /// the framework replaying a state it persisted before the custom bag
    /// was filled in.
    pub fn resolved_markets(&self, user: &UserState) -> Vec<(String, String)> {
        if !user.custom.chosen_markets.is_empty() {
            return user.custom.chosen_markets.clone();
        }
        let list = user
            .answers
            .get(&MenuState::SelectMarketList)
            .and_then(|a| MarketList::from_answer(a))
            .unwrap_or(MarketList::All);
        let markets = match list {
            MarketList::All => self.data.catalog.markets().iter().collect(),
            MarketList::Best => match user.answers.get(&MenuState::SelectCrop) {
                Some(crop_id) => self.data.best_markets(crop_id),
                None => Vec::new(),
            },
        };
        markets
            .into_iter()
            .map(|m| (m.id.clone(), m.name.clone()))
            .collect()
    }

    /// Display name of the chosen crop, falling back to the answer history.
    pub fn crop_name(&self, user: &UserState) -> String {
        if let Some(name) = &user.custom.chosen_crop_name {
            return name.clone();
        }
        user.answers
            .get(&MenuState::SelectCrop)
            .and_then(|id| self.data.catalog.crop_by_id(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "your crop".to_string())
    }
}

#[cfg(test)]
pub(crate) fn demo_engine() -> MenuEngine {
    use crate::data::{Catalog, Crop, Market, PriceRow, PriceTable};
    use rust_decimal_macros::dec;

    let crop = |id: &str, name: &str| Crop {
        id: id.into(),
        name: name.into(),
    };
    let market = |id: &str, name: &str| Market {
        id: id.into(),
        name: name.into(),
    };
    let catalog = Catalog::new(
        vec![crop("crop1", "Peas"), crop("crop2", "Carrots")],
        vec![
            market("market1", "Kitwe"),
            market("market2", "Ndola"),
            market("market3", "Masala"),
        ],
    )
    .unwrap();
    let row = |crop: &str, market: &str, unit: &str, samples: Vec<rust_decimal::Decimal>| PriceRow {
        crop_id: crop.into(),
        market_id: market.into(),
        unit_name: unit.into(),
        samples,
    };
    let prices = PriceTable::new(vec![
        row("crop1", "market1", "boxes", vec![dec!(1.2), dec!(1.1), dec!(1.5)]),
        row("crop1", "market1", "crates", vec![dec!(1.6), dec!(1.7), dec!(1.8)]),
        row("crop1", "market2", "boxes", vec![]),
        row("crop2", "market1", "bags", vec![dec!(0.64), dec!(0.71)]),
    ]);
    let data = MarketData::new(catalog, prices).unwrap();
    MenuEngine::new("Farmer Bob", data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOTER: &str = "Enter 1 for next market, 2 for previous market.\nEnter 3 to exit.";

    #[test]
    fn test_new_session_greets_and_stays_in_select_service() {
        let engine = demo_engine();
        let turn = engine.step(None, None);
        assert_eq!(turn.next_state, MenuState::SelectService);
        assert_eq!(
            turn.response,
            "Hi Farmer Bob.\nSelect a service:\n1. Market prices"
        );
        assert!(turn.continue_session);
    }

    #[test]
    fn test_select_service_replay_is_idempotent() {
        let engine = demo_engine();
        let first = engine.step(None, None);
        let replay = engine.step(Some(first.user.clone()), None);
        assert_eq!(replay.next_state, MenuState::SelectService);
        assert_eq!(replay.response, first.response);
    }

    #[test]
    fn test_full_session_walkthrough() {
        let engine = demo_engine();

        let turn = engine.step(None, None);
        let turn = engine.step(Some(turn.user), Some("1"));
        assert_eq!(turn.next_state, MenuState::SelectCrop);
        assert_eq!(turn.response, "Select a crop:\n1. Peas\n2. Carrots");

        let turn = engine.step(Some(turn.user), Some("1"));
        assert_eq!(turn.next_state, MenuState::SelectMarketList);
        assert_eq!(
            turn.response,
            "Select which markets to view:\n1. All markets\n2. Best markets for Peas"
        );

        let turn = engine.step(Some(turn.user), Some("2"));
        assert_eq!(turn.next_state, MenuState::SelectMarket);
        assert_eq!(turn.response, "Select a market:\n1. Kitwe\n2. Ndola");
        assert_eq!(
            turn.user.answers.get(&MenuState::SelectMarketList).unwrap(),
            "best_markets"
        );

        let turn = engine.step(Some(turn.user), Some("1"));
        assert_eq!(turn.next_state, MenuState::ShowPrices);
        assert_eq!(
            turn.response,
            format!("Prices of Peas in Kitwe:\n  boxes: 1.27\n  crates: 1.70\n{FOOTER}")
        );
        assert_eq!(turn.user.custom.chosen_market_idx, Some(0));

        let turn = engine.step(Some(turn.user), Some("3"));
        assert_eq!(turn.next_state, MenuState::End);
        assert_eq!(turn.response, "Goodbye!");
        assert!(!turn.continue_session);
    }

    #[test]
    fn test_all_markets_lists_full_catalog() {
        let engine = demo_engine();
        let turn = engine.step(None, None);
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        assert_eq!(turn.next_state, MenuState::SelectMarket);
        assert_eq!(
            turn.response,
            "Select a market:\n1. Kitwe\n2. Ndola\n3. Masala"
        );
        assert_eq!(
            turn.user.custom.chosen_markets,
            vec![
                ("market1".to_string(), "Kitwe".to_string()),
                ("market2".to_string(), "Ndola".to_string()),
                ("market3".to_string(), "Masala".to_string()),
            ]
        );
    }

    #[test]
    fn test_paging_wraps_both_ways() {
        let engine = demo_engine();
        let turn = engine.step(None, None);
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("2")); // best markets: Kitwe, Ndola
        let turn = engine.step(Some(turn.user), Some("1")); // Kitwe

        // next: Kitwe -> Ndola (no crates row there, boxes has no samples)
        let turn = engine.step(Some(turn.user), Some("1"));
        assert_eq!(turn.next_state, MenuState::ShowPrices);
        assert_eq!(
            turn.response,
            format!("Prices of Peas in Ndola:\n  boxes: -\n{FOOTER}")
        );
        assert_eq!(turn.user.custom.chosen_market_idx, Some(1));

        // next again wraps to Kitwe
        let turn = engine.step(Some(turn.user), Some("1"));
        assert!(turn.response.starts_with("Prices of Peas in Kitwe:"));
        assert_eq!(turn.user.custom.chosen_market_idx, Some(0));

        // previous wraps back to Ndola
        let turn = engine.step(Some(turn.user), Some("2"));
        assert!(turn.response.starts_with("Prices of Peas in Ndola:"));
        assert_eq!(turn.user.custom.chosen_market_idx, Some(1));
    }

    #[test]
    fn test_invalid_input_reprompts_without_moving() {
        let engine = demo_engine();
        let fresh = engine.step(None, None);

        for bad in ["9", "0", "x", "", "  "] {
            let turn = engine.step(Some(fresh.user.clone()), Some(bad));
            assert_eq!(turn.next_state, MenuState::SelectService);
            assert_eq!(turn.response, fresh.response);
            assert!(turn.continue_session);
        }
    }

    #[test]
    fn test_market_selection_persists_zero_based_index() {
        let engine = demo_engine();
        let turn = engine.step(None, None);
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1")); // all markets
        let turn = engine.step(Some(turn.user), Some("3")); // Masala

        assert_eq!(turn.user.custom.chosen_market_idx, Some(2));

        // Survives the framework's JSON persistence round trip.
        let json = serde_json::to_string(&turn.user).unwrap();
        let back: crate::session::UserState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.custom.chosen_market_idx, Some(2));
        assert_eq!(back.current_state, MenuState::ShowPrices);
    }

    #[test]
    fn test_goodbye_has_no_footer() {
        let engine = demo_engine();
        let turn = engine.step(None, None);
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("1"));
        let turn = engine.step(Some(turn.user), Some("3"));
        assert_eq!(turn.response, "Goodbye!");
        assert!(!turn.response.contains("Enter"));
    }

    #[test]
    fn test_state_names_match_wire_contract() {
        assert_eq!(MenuState::SelectService.as_str(), "select_service");
        assert_eq!(MenuState::ShowPrices.as_str(), "show_prices");
        assert_eq!(
            serde_json::to_value(MenuState::SelectMarketList).unwrap(),
            "select_market_list"
        );
    }
}
