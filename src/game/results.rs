//! End-of-game summary: the attempt bar and the shareable result text.

use serde::Serialize;

use crate::game::session::{GameSession, GuessResult};

const SHARE_URL: &str = "https://sorcerify.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Correct,
    Incorrect,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub has_won: bool,
    pub card_name: String,
    pub info_url: String,
    pub attempts: Vec<Slot>,
    pub share_text: String,
}

/// One slot per attempt, filled in guess order.
pub fn attempt_bar(results: &[GuessResult], max_attempts: u32) -> Vec<Slot> {
    let mut slots: Vec<Slot> = results
        .iter()
        .take(max_attempts as usize)
        .map(|r| match r {
            GuessResult::Correct => Slot::Correct,
            GuessResult::Incorrect => Slot::Incorrect,
        })
        .collect();
    slots.resize(max_attempts as usize, Slot::Empty);
    slots
}

fn emoji_row(results: &[GuessResult], has_won: bool) -> String {
    let last = results.len().saturating_sub(1);
    results
        .iter()
        .enumerate()
        .map(|(i, r)| match (i == last, has_won, r) {
            (true, true, _) => '\u{2705}',
            (true, false, _) => '\u{274C}',
            (false, _, GuessResult::Correct) => '\u{1F7E9}',
            (false, _, GuessResult::Incorrect) => '\u{1F7E5}',
        })
        .collect()
}

/// Plain-text summary for the clipboard. The final guess shows the outcome
/// instead of its own verdict.
pub fn share_text(persist_key: Option<&str>, results: &[GuessResult], has_won: bool) -> String {
    let header = match persist_key {
        Some(key) if !key.is_empty() => format!("Sorcerify {}", key),
        _ => "Sorcerify".to_string(),
    };
    format!("{}\n{}\n{}", header, emoji_row(results, has_won), SHARE_URL)
}

pub fn results_view(session: &GameSession, max_attempts: u32) -> ResultsView {
    let state = session.state();
    ResultsView {
        has_won: state.has_won,
        card_name: session.card().name.clone(),
        info_url: session.card().info_url(),
        attempts: attempt_bar(&state.results, max_attempts),
        share_text: share_text(session.persist_key(), &state.results, state.has_won),
    }
}
