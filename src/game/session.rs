//! One game round: guesses, remaining attempts, and the win/lose outcome.
//!
//! Letter, digit and threshold guesses reveal parts of the card; only a
//! correct name guess wins. The final attempt is reserved for a name guess,
//! so character guesses stop being accepted once one attempt is left.
//!
//! Every operation is a plain state transition. Calls that make no sense in
//! the current state (a repeated token, a guess after the game ended, an
//! empty name) are ignored rather than reported, since the UI can fire them
//! from double clicks.

use std::collections::BTreeSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::mask::{CardView, Mask};
use crate::game::reveal::reveals;
use crate::game::token::{is_guessable, keyboard_tokens, normalize};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessResult {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// Emitted once per session when it reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Won,
    Lost,
}

/// Guess bookkeeping. `correct` and `incorrect` partition `guessed`, and
/// `results` holds one entry per accepted guess of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessState {
    pub guessed: BTreeSet<String>,
    pub correct: BTreeSet<String>,
    pub incorrect: BTreeSet<String>,
    pub remaining: u32,
    pub has_won: bool,
    /// Names already submitted, in submission order.
    pub name_guessed: Vec<String>,
    pub results: Vec<GuessResult>,
}

impl GuessState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            guessed: BTreeSet::new(),
            correct: BTreeSet::new(),
            incorrect: BTreeSet::new(),
            remaining: max_attempts,
            has_won: false,
            name_guessed: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.has_won {
            Outcome::Won
        } else if self.remaining == 0 {
            Outcome::Lost
        } else {
            Outcome::InProgress
        }
    }
}

impl Default for GuessState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Correct,
    Incorrect,
    Unguessed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyView {
    pub token: String,
    pub status: KeyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardView {
    pub disabled: bool,
    pub keys: Vec<KeyView>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    card: Card,
    persist_key: Option<String>,
    state: GuessState,
    name_selection: String,
    win_reported: bool,
    lose_reported: bool,
}

impl GameSession {
    pub fn new(card: Card, max_attempts: u32, persist_key: Option<String>) -> Self {
        Self::restore(card, persist_key, GuessState::new(max_attempts), String::new())
    }

    /// Rebuild a session from saved state. A saved game that already ended
    /// still reports its outcome once through [`GameSession::take_event`].
    pub fn restore(
        card: Card,
        persist_key: Option<String>,
        state: GuessState,
        name_selection: String,
    ) -> Self {
        Self {
            card,
            persist_key,
            state,
            name_selection,
            win_reported: false,
            lose_reported: false,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn persist_key(&self) -> Option<&str> {
        self.persist_key.as_deref()
    }

    pub fn state(&self) -> &GuessState {
        &self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.outcome() != Outcome::InProgress
    }

    pub fn name_selection(&self) -> &str {
        &self.name_selection
    }

    pub fn select_name(&mut self, name: &str) {
        self.name_selection = name.to_string();
    }

    /// Guess a letter, digit or threshold. Returns the verdict, or `None`
    /// when the guess was ignored.
    pub fn guess_char(&mut self, input: &str) -> Option<GuessResult> {
        if self.is_over() || self.state.remaining <= 1 {
            return None;
        }
        let token = normalize(input);
        if !is_guessable(&token) || self.state.guessed.contains(&token) {
            return None;
        }

        let result = if reveals(&self.card, &token) {
            self.state.correct.insert(token.clone());
            GuessResult::Correct
        } else {
            self.state.incorrect.insert(token.clone());
            GuessResult::Incorrect
        };
        debug!("guess {:?} -> {:?}", token, result);
        self.state.guessed.insert(token);
        self.state.results.push(result);
        self.state.remaining = self.state.remaining.saturating_sub(1);
        Some(result)
    }

    /// Submit a full card name. A match wins the game; a miss costs an attempt.
    /// Returns the terminal event if this guess ended the game.
    pub fn guess_name(&mut self, name: &str) -> Option<SessionEvent> {
        if name.is_empty() || self.is_over() || self.state.remaining == 0 {
            return None;
        }
        if self.state.name_guessed.iter().any(|n| n == name) {
            return None;
        }
        self.state.name_guessed.push(name.to_string());

        if name == self.card.name {
            self.state.has_won = true;
            self.state.results.push(GuessResult::Correct);
        } else {
            debug!("wrong name guess {:?}", name);
            self.state.results.push(GuessResult::Incorrect);
            self.state.remaining = self.state.remaining.saturating_sub(1);
        }
        self.take_event()
    }

    /// The terminal event, if the session has ended and it has not been
    /// reported yet.
    pub fn take_event(&mut self) -> Option<SessionEvent> {
        match self.outcome() {
            Outcome::Won if !self.win_reported => {
                self.win_reported = true;
                info!("session won: {}", self.card.name);
                Some(SessionEvent::Won)
            }
            Outcome::Lost if !self.lose_reported => {
                self.lose_reported = true;
                info!("session lost: {}", self.card.name);
                Some(SessionEvent::Lost)
            }
            _ => None,
        }
    }

    /// The card as the player currently sees it. Everything is revealed once
    /// the game is over.
    pub fn view(&self) -> CardView {
        Mask::new(&self.state.guessed, self.is_over()).card(&self.card)
    }

    pub fn keyboard(&self) -> KeyboardView {
        let keys = keyboard_tokens()
            .into_iter()
            .map(|token| {
                let status = if self.state.correct.contains(&token) {
                    KeyStatus::Correct
                } else if self.state.incorrect.contains(&token) {
                    KeyStatus::Incorrect
                } else {
                    KeyStatus::Unguessed
                };
                KeyView { token, status }
            })
            .collect();
        KeyboardView {
            disabled: self.is_over() || self.state.remaining <= 1,
            keys,
        }
    }

    /// Dropdown options: every card name not yet tried.
    pub fn available_names<'a>(&self, all_names: &'a [String]) -> Vec<&'a str> {
        all_names
            .iter()
            .filter(|n| !self.state.name_guessed.contains(n))
            .map(String::as_str)
            .collect()
    }
}
