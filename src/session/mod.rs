//! Per-user session state as the gateway framework persists it.
//!
//! The framework stores this blob between USSD steps and hands it back as
//! JSON on the next input. The menu engine is stateless: everything it needs
//! lives here or in the immutable lookup tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::menu::MenuState;

/// Everything persisted for one user between steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub current_state: MenuState,

    /// Recorded answer per visited state. `select_crop` stores the crop id,
    /// `select_market_list` stores "all_markets" or "best_markets".
    #[serde(default)]
    pub answers: HashMap<MenuState, String>,

    #[serde(default)]
    pub custom: CustomFields,

    /// Pagination cursor per state. Only `show_prices` uses one.
    #[serde(default)]
    pub pages: HashMap<MenuState, usize>,
}

/// Free-form bag of auxiliary state outside the strict answer history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_crop_name: Option<String>,

    /// Resolved (market_id, market_name) pairs, fixed once at the
    /// select_market_list -> select_market transition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chosen_markets: Vec<(String, String)>,

    /// 0-based index into `chosen_markets`. Always in range when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_market_idx: Option<usize>,
}

impl UserState {
    /// Cursor for the show_prices pager, falling back to the selected
    /// market when no page has been recorded yet.
    pub fn price_cursor(&self) -> usize {
        self.pages
            .get(&MenuState::ShowPrices)
            .copied()
            .or(self.custom.chosen_market_idx)
            .unwrap_or(0)
    }

    pub fn set_price_cursor(&mut self, idx: usize) {
        self.pages.insert(MenuState::ShowPrices, idx);
        self.custom.chosen_market_idx = Some(idx);
    }
}

/// What one engine step hands back to the framework.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub next_state: MenuState,
    pub response: String,
    pub continue_session: bool,

    /// Updated state for the framework to persist. Not part of the reply
    /// payload itself.
    #[serde(skip)]
    pub user: UserState,
}
