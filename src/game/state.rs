//! Global engine state container.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the WASM module alive, so the loaded cards, the
//! current round and the mirrored localStorage survive across
//! `handle_request` calls for the whole page session.

use std::cell::RefCell;

use serde::Serialize;

use crate::cards::Card;
use crate::config::GameConfig;
use crate::game::daily::UtcDate;
use crate::game::session::GameSession;
use crate::game::snapshot::MemoryStore;
use crate::game::streak::{DailyStreak, PracticeStreak};

/// Which kind of round is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// The shared card for one UTC day. Saved under the date.
    Daily { date: UtcDate },
    /// A random card, not saved. `index` is remembered so the next round
    /// draws a different card.
    Practice { index: usize },
}

#[derive(Debug, Clone)]
pub struct ActiveGame {
    pub mode: Mode,
    pub session: GameSession,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub config: GameConfig,
    pub cards: Vec<Card>,
    /// Distinct card names, sorted, for the name dropdown.
    pub all_names: Vec<String>,
    pub game: Option<ActiveGame>,
    pub store: MemoryStore,
    pub daily_streak: DailyStreak,
    pub practice_streak: PracticeStreak,
}

impl AppState {
    /// Install a freshly loaded card list. Any round in progress refers to the
    /// old list and is dropped.
    pub fn set_cards(&mut self, cards: Vec<Card>) {
        let mut names: Vec<String> = cards.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names.dedup();
        self.all_names = names;
        self.cards = cards;
        self.game = None;
    }

    pub fn practice_index(&self) -> Option<usize> {
        match self.game.as_ref().map(|g| g.mode) {
            Some(Mode::Practice { index }) => Some(index),
            _ => None,
        }
    }
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Execute a closure with read access to the engine state.
pub fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the engine state.
pub fn with_state_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

/// Put the engine state back to a fresh page load.
#[cfg(test)]
pub(crate) fn reset_state() {
    STATE.with(|s| {
        *s.borrow_mut() = AppState::default();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::fixtures::{avatar, fire_drake};

    #[test]
    fn default_state_is_empty() {
        reset_state();
        with_state(|s| {
            assert!(s.cards.is_empty());
            assert!(s.game.is_none());
            assert_eq!(s.config.max_attempts, 7);
        });
    }

    #[test]
    fn set_cards_sorts_and_dedups_names() {
        let mut state = AppState::default();
        state.set_cards(vec![fire_drake(), avatar(Some(20)), fire_drake()]);
        assert_eq!(state.all_names, vec!["Fire Drake", "Sparkmage"]);
        assert_eq!(state.cards.len(), 3);
    }

    #[test]
    fn set_cards_drops_current_game() {
        let mut state = AppState::default();
        state.game = Some(ActiveGame {
            mode: Mode::Practice { index: 0 },
            session: GameSession::new(fire_drake(), 7, None),
        });
        assert_eq!(state.practice_index(), Some(0));
        state.set_cards(vec![fire_drake()]);
        assert!(state.game.is_none());
        assert_eq!(state.practice_index(), None);
    }

    #[test]
    fn mutations_persist_between_calls() {
        reset_state();
        with_state_mut(|s| s.set_cards(vec![fire_drake()]));
        assert_eq!(with_state(|s| s.all_names.clone()), vec!["Fire Drake"]);
        reset_state();
    }
}
