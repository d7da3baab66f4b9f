//! `/api/game/*` and `/api/streak` routes — starting rounds, guessing, and
//! reading the round back for rendering.
//!
//! Every state-changing route answers with a [`TurnReport`](crate::game::play::TurnReport):
//! the guess verdict, the terminal event (once), a streak notice the host
//! should dispatch as a DOM event, and the full round status.

use crate::game::daily::UtcDate;
use crate::game::play::{self, PlayError};
use crate::routes::util::{error_span, json, Params};

fn play_error(e: PlayError) -> String {
    error_span(&e.to_string())
}

// ── POST /api/game/daily ───────────────────────────────────────────

/// Handle POST /api/game/daily
/// Body params:
///   - date={YYYY-MM-DD}  → the round for that UTC day
///   - now={unix millis}  → the round for the UTC day containing that instant
///
/// A saved round for the day is resumed.
pub fn handle_daily_post(body: &str) -> String {
    let params = Params::from_form(body);
    let date = if let Some(raw) = params.non_empty("date") {
        match raw.parse::<UtcDate>() {
            Ok(date) => date,
            Err(e) => return error_span(&e.to_string()),
        }
    } else if let Some(raw) = params.non_empty("now") {
        let Ok(millis) = raw.trim().parse::<f64>() else {
            return error_span("Invalid now parameter");
        };
        match UtcDate::from_unix_millis(millis) {
            Ok(date) => date,
            Err(e) => return error_span(&e.to_string()),
        }
    } else {
        return error_span("Missing date or now parameter");
    };

    play::start_daily(date).map_or_else(play_error, |report| json(&report))
}

// ── POST /api/game/practice ────────────────────────────────────────

/// Handle POST /api/game/practice
/// Starts an unsaved round on a random card, never the one just played.
pub fn handle_practice_post(_body: &str) -> String {
    play::start_practice(&mut rand::rng()).map_or_else(play_error, |report| json(&report))
}

// ── POST /api/game/guess ───────────────────────────────────────────

/// Handle POST /api/game/guess
/// Body params: token={letter, digit, or air/earth/fire/water}
/// Tokens that cannot be guessed, repeats, and guesses after the round ended
/// come back with a null result.
pub fn handle_guess_post(body: &str) -> String {
    let params = Params::from_form(body);
    let token = params.get("token").unwrap_or("");
    play::guess_char(token).map_or_else(play_error, |report| json(&report))
}

// ── POST /api/game/name ────────────────────────────────────────────

/// Handle POST /api/game/name
/// Body params: name={full card name}
pub fn handle_name_post(body: &str) -> String {
    let params = Params::from_form(body);
    let name = params.get("name").unwrap_or("");
    play::guess_name(name).map_or_else(play_error, |report| json(&report))
}

// ── POST /api/game/select ──────────────────────────────────────────

/// Handle POST /api/game/select
/// Body params: name={dropdown selection}
pub fn handle_select_post(body: &str) -> String {
    let params = Params::from_form(body);
    let name = params.get("name").unwrap_or("");
    play::select_name(name).map_or_else(play_error, |status| json(&status))
}

// ── GET /api/game/view ─────────────────────────────────────────────

pub fn handle_view_get(_query: &str) -> String {
    play::current_status().map_or_else(play_error, |status| json(&status))
}

// ── GET /api/game/results ──────────────────────────────────────────

/// Attempt bar, share text and card link for the results dialog.
pub fn handle_results_get(_query: &str) -> String {
    play::current_results().map_or_else(play_error, |results| json(&results))
}

// ── GET /api/streak ────────────────────────────────────────────────

pub fn handle_streak_get(_query: &str) -> String {
    json(&play::streaks())
}
