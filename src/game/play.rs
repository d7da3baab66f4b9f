//! Round lifecycle over the global state.
//!
//! Starting daily and practice rounds, applying guesses, and keeping the
//! saved progress and streaks current. Every mutation is saved immediately;
//! save failures are logged and play continues.

use std::collections::BTreeMap;

use log::info;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::cards::{parse_cards, CardError};
use crate::config::{ConfigError, GameConfig};
use crate::game::daily::{pick_practice_index, DailySchedule, UtcDate};
use crate::game::mask::CardView;
use crate::game::results::{results_view, ResultsView};
use crate::game::session::{GameSession, GuessResult, KeyboardView, Outcome, SessionEvent};
use crate::game::snapshot::{export_progress, import_progress, persist_session, read_snapshot, SnapshotError};
use crate::game::state::{with_state, with_state_mut, ActiveGame, AppState, Mode};
use crate::game::streak::{DailyStreak, StreakUpdate};

#[derive(Error, Debug)]
pub enum PlayError {
    #[error("No cards loaded")]
    NoCards,
    #[error("No game in progress")]
    NoGame,
}

/// A streak change for the host to broadcast as a DOM event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakNotice {
    pub event: String,
    pub detail: StreakUpdate,
}

/// Everything the UI needs to draw the current round.
#[derive(Debug, Clone, Serialize)]
pub struct GameStatus {
    #[serde(flatten)]
    pub mode: Mode,
    pub persist_key: Option<String>,
    pub outcome: Outcome,
    pub remaining: u32,
    pub max_attempts: u32,
    pub name_selection: String,
    pub available_names: Vec<String>,
    pub card: CardView,
    pub keyboard: KeyboardView,
}

/// Response to any round-changing request.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// Verdict of the guess just made, if it was accepted.
    pub result: Option<GuessResult>,
    /// Set once, on the request that ended the round.
    pub event: Option<SessionEvent>,
    pub streak_notice: Option<StreakNotice>,
    pub game: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub daily: u32,
    pub last_win_date: Option<String>,
    pub practice: u32,
}

// ── Setup ──────────────────────────────────────────────────────────

pub fn configure(json: &str) -> Result<(), ConfigError> {
    let config = GameConfig::from_json(json)?;
    with_state_mut(|s| {
        s.daily_streak = DailyStreak::load(&s.store, &config);
        s.config = config;
    });
    Ok(())
}

/// Parse and install the card list. Returns the number of cards loaded.
pub fn load_cards(json: &str) -> Result<usize, CardError> {
    let cards = parse_cards(json)?;
    let count = cards.len();
    with_state_mut(|s| s.set_cards(cards));
    info!("loaded {} cards", count);
    Ok(count)
}

// ── Storage mirror ─────────────────────────────────────────────────

/// Seed the store from the browser's localStorage and pick up its streak.
pub fn hydrate_store(entries: BTreeMap<String, String>) {
    with_state_mut(|s| {
        s.store.hydrate(entries);
        s.daily_streak = DailyStreak::load(&s.store, &s.config);
    });
}

/// Entries changed since the last flush, for the host to write back.
pub fn flush_store() -> BTreeMap<String, String> {
    with_state_mut(|s| s.store.take_dirty())
}

pub fn export_saves() -> Result<String, SnapshotError> {
    with_state(|s| export_progress(&s.store, &s.config.progress_key))
}

/// Replace all saved rounds. The round in play keeps going; imported state
/// applies from the next round start.
pub fn import_saves(encoded: &str) -> Result<usize, SnapshotError> {
    with_state_mut(|s| {
        let progress_key = s.config.progress_key.clone();
        import_progress(&mut s.store, &progress_key, encoded)
    })
}

// ── Rounds ─────────────────────────────────────────────────────────

/// Start (or resume) the daily round for `date`.
pub fn start_daily(date: UtcDate) -> Result<TurnReport, PlayError> {
    with_state_mut(|s| {
        let index = DailySchedule::with_prefix(s.cards.len(), &s.config.daily_seed_prefix)
            .index_for(date);
        let card = s.cards.get(index).cloned().ok_or(PlayError::NoCards)?;
        let key = date.to_string();
        let max_attempts = s.config.max_attempts;
        let mut session = match read_snapshot(&s.store, &s.config.progress_key, &key) {
            Some(saved) => saved.into_session(card, Some(key), max_attempts),
            None => GameSession::new(card, max_attempts, Some(key)),
        };
        info!("daily round {} (card #{})", date, index);
        let event = session.take_event();
        s.game = Some(ActiveGame {
            mode: Mode::Daily { date },
            session,
        });
        settle(s, None, event)
    })
}

/// Start a practice round on a random card other than the current one.
pub fn start_practice<R: Rng + ?Sized>(rng: &mut R) -> Result<TurnReport, PlayError> {
    with_state_mut(|s| {
        let index = pick_practice_index(s.cards.len(), s.practice_index(), rng);
        let card = s.cards.get(index).cloned().ok_or(PlayError::NoCards)?;
        info!("practice round (card #{})", index);
        s.game = Some(ActiveGame {
            mode: Mode::Practice { index },
            session: GameSession::new(card, s.config.max_attempts, None),
        });
        settle(s, None, None)
    })
}

pub fn guess_char(token: &str) -> Result<TurnReport, PlayError> {
    with_state_mut(|s| {
        let active = s.game.as_mut().ok_or(PlayError::NoGame)?;
        let result = active.session.guess_char(token);
        let event = active.session.take_event();
        settle(s, result, event)
    })
}

pub fn guess_name(name: &str) -> Result<TurnReport, PlayError> {
    with_state_mut(|s| {
        let active = s.game.as_mut().ok_or(PlayError::NoGame)?;
        let before = active.session.state().results.len();
        let event = active.session.guess_name(name);
        let results = &active.session.state().results;
        let result = if results.len() > before {
            results.last().copied()
        } else {
            None
        };
        settle(s, result, event)
    })
}

/// Remember the dropdown selection so a reload shows it again.
pub fn select_name(name: &str) -> Result<GameStatus, PlayError> {
    with_state_mut(|s| {
        let active = s.game.as_mut().ok_or(PlayError::NoGame)?;
        active.session.select_name(name);
        persist_session(&mut s.store, &s.config.progress_key, &active.session);
        status(s)
    })
}

// ── Views ──────────────────────────────────────────────────────────

pub fn current_status() -> Result<GameStatus, PlayError> {
    with_state(status)
}

pub fn current_results() -> Result<ResultsView, PlayError> {
    with_state(|s| {
        let active = s.game.as_ref().ok_or(PlayError::NoGame)?;
        Ok(results_view(&active.session, s.config.max_attempts))
    })
}

/// Names for the guess dropdown. Without a round, or with `all`, every name.
pub fn card_names(all: bool) -> Vec<String> {
    with_state(|s| match &s.game {
        Some(active) if !all => card_names_for(&active.session, &s.all_names),
        _ => s.all_names.clone(),
    })
}

pub fn streaks() -> StreakSummary {
    with_state(|s| StreakSummary {
        daily: s.daily_streak.streak,
        last_win_date: s.daily_streak.last_win_date.map(|d| d.to_string()),
        practice: s.practice_streak.0,
    })
}

/// Save the round and apply a terminal event to the matching streak.
fn settle(
    s: &mut AppState,
    result: Option<GuessResult>,
    event: Option<SessionEvent>,
) -> Result<TurnReport, PlayError> {
    let active = s.game.as_ref().ok_or(PlayError::NoGame)?;
    let mode = active.mode;
    persist_session(&mut s.store, &s.config.progress_key, &active.session);

    let streak_notice = match (event, mode) {
        (Some(event), Mode::Daily { date }) => {
            let update = s.daily_streak.record(event, date);
            if update.is_some() {
                s.daily_streak.save(&mut s.store, &s.config);
            }
            update.map(|detail| StreakNotice {
                event: s.config.streak_event.clone(),
                detail,
            })
        }
        (Some(event), Mode::Practice { .. }) => {
            s.practice_streak.record(event);
            None
        }
        (None, _) => None,
    };

    Ok(TurnReport {
        result,
        event,
        streak_notice,
        game: status(s)?,
    })
}

fn status(s: &AppState) -> Result<GameStatus, PlayError> {
    let active = s.game.as_ref().ok_or(PlayError::NoGame)?;
    let session = &active.session;
    Ok(GameStatus {
        mode: active.mode,
        persist_key: session.persist_key().map(str::to_string),
        outcome: session.outcome(),
        remaining: session.state().remaining,
        max_attempts: s.config.max_attempts,
        name_selection: session.name_selection().to_string(),
        available_names: card_names_for(session, &s.all_names),
        card: session.view(),
        keyboard: session.keyboard(),
    })
}

fn card_names_for(session: &GameSession, all_names: &[String]) -> Vec<String> {
    session
        .available_names(all_names)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::fixtures::{avatar, fire_drake};
    use crate::game::state::reset_state;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> UtcDate {
        "2026-10-18".parse().unwrap()
    }

    fn with_cards(cards: Vec<crate::cards::Card>) {
        reset_state();
        with_state_mut(|s| s.set_cards(cards));
    }

    #[test]
    fn start_without_cards_fails() {
        reset_state();
        assert!(matches!(start_daily(today()), Err(PlayError::NoCards)));
        assert!(matches!(guess_char("a"), Err(PlayError::NoGame)));
        reset_state();
    }

    #[test]
    fn daily_round_is_stable_for_a_date() {
        with_cards(vec![fire_drake(), avatar(Some(20))]);
        let first = start_daily(today()).unwrap();
        let again = start_daily(today()).unwrap();
        assert_eq!(first.game.card.name, again.game.card.name);
        assert_eq!(first.game.persist_key.as_deref(), Some("2026-10-18"));
        assert_eq!(first.game.outcome, Outcome::InProgress);
        reset_state();
    }

    #[test]
    fn guesses_are_saved_and_resumed() {
        with_cards(vec![fire_drake()]);
        start_daily(today()).unwrap();
        let report = guess_char("F").unwrap();
        assert_eq!(report.result, Some(GuessResult::Correct));
        assert_eq!(report.game.remaining, 6);
        with_state_mut(|s| s.game = None);

        let resumed = start_daily(today()).unwrap();
        assert_eq!(resumed.game.remaining, 6);
        assert!(with_state(|s| s.game.as_ref().unwrap().session.state().guessed.contains("f")));
        reset_state();
    }

    #[test]
    fn daily_win_updates_streak_once() {
        with_cards(vec![fire_drake()]);
        start_daily(today()).unwrap();
        let report = guess_name("Fire Drake").unwrap();
        assert_eq!(report.result, Some(GuessResult::Correct));
        assert_eq!(report.event, Some(SessionEvent::Won));
        let notice = report.streak_notice.unwrap();
        assert_eq!(notice.event, "sorcerify:streak-updated");
        assert_eq!(notice.detail.streak, 1);

        let dirty = flush_store();
        assert_eq!(dirty.get("sorcerify:streak").map(String::as_str), Some("1"));
        assert_eq!(dirty.get("sorcerify:lastWinDate").map(String::as_str), Some("2026-10-18"));
        assert!(dirty.contains_key("sorcerify:progress"));

        // Reloading the finished round reports the win again but the
        // streak already counts today.
        let reloaded = start_daily(today()).unwrap();
        assert_eq!(reloaded.event, Some(SessionEvent::Won));
        assert_eq!(reloaded.streak_notice, None);
        assert_eq!(streaks().daily, 1);
        reset_state();
    }

    #[test]
    fn hydrated_streak_extends_from_yesterday() {
        with_cards(vec![fire_drake()]);
        hydrate_store(BTreeMap::from([
            ("sorcerify:streak".to_string(), "4".to_string()),
            ("sorcerify:lastWinDate".to_string(), "2026-10-17".to_string()),
        ]));
        start_daily(today()).unwrap();
        let report = guess_name("Fire Drake").unwrap();
        assert_eq!(report.streak_notice.unwrap().detail.streak, 5);
        reset_state();
    }

    #[test]
    fn wrong_names_until_lost() {
        with_cards(vec![fire_drake(), avatar(Some(20))]);
        configure(r#"{"max_attempts": 3}"#).unwrap();
        with_state_mut(|s| s.set_cards(vec![fire_drake()]));
        start_daily(today()).unwrap();
        assert_eq!(guess_char("a").unwrap().result, Some(GuessResult::Correct));
        let first = guess_name("Sparkmage").unwrap();
        assert_eq!(first.result, Some(GuessResult::Incorrect));
        assert_eq!(first.event, None);
        assert_eq!(first.game.remaining, 1);
        // The last attempt is reserved for a name.
        assert_eq!(guess_char("b").unwrap().result, None);
        let second = guess_name("Other").unwrap();
        assert_eq!(second.event, Some(SessionEvent::Lost));
        assert_eq!(second.game.outcome, Outcome::Lost);
        assert_eq!(second.streak_notice.unwrap().detail.streak, 0);
        reset_state();
    }

    #[test]
    fn repeated_name_is_ignored() {
        with_cards(vec![fire_drake()]);
        start_daily(today()).unwrap();
        guess_name("Sparkmage").unwrap();
        let again = guess_name("Sparkmage").unwrap();
        assert_eq!(again.result, None);
        assert_eq!(again.game.remaining, 6);
        reset_state();
    }

    #[test]
    fn practice_rounds_change_card_and_count_wins() {
        with_cards(vec![fire_drake(), avatar(Some(20))]);
        let mut rng = StdRng::seed_from_u64(7);
        let first = start_practice(&mut rng).unwrap();
        assert_eq!(first.game.persist_key, None);
        let first_index = with_state(|s| s.practice_index()).unwrap();
        start_practice(&mut rng).unwrap();
        let second_index = with_state(|s| s.practice_index()).unwrap();
        assert_ne!(first_index, second_index);

        let name = with_state(|s| s.game.as_ref().unwrap().session.card().name.clone());
        let report = guess_name(&name).unwrap();
        assert_eq!(report.event, Some(SessionEvent::Won));
        assert_eq!(report.streak_notice, None);
        assert_eq!(streaks().practice, 1);
        assert!(flush_store().is_empty());
        reset_state();
    }

    #[test]
    fn selection_is_saved() {
        with_cards(vec![fire_drake(), avatar(Some(20))]);
        start_daily(today()).unwrap();
        let status = select_name("Sparkmage").unwrap();
        assert_eq!(status.name_selection, "Sparkmage");
        with_state_mut(|s| s.game = None);
        let resumed = start_daily(today()).unwrap();
        assert_eq!(resumed.game.name_selection, "Sparkmage");
        reset_state();
    }

    #[test]
    fn names_exclude_tried_ones() {
        with_cards(vec![fire_drake(), avatar(Some(20))]);
        assert_eq!(card_names(false), vec!["Fire Drake", "Sparkmage"]);
        start_daily(today()).unwrap();
        guess_name("Sparkmage").unwrap();
        assert_eq!(card_names(false), vec!["Fire Drake"]);
        assert_eq!(card_names(true).len(), 2);
        reset_state();
    }

    #[test]
    fn export_then_import_saves() {
        with_cards(vec![fire_drake()]);
        start_daily(today()).unwrap();
        guess_char("e").unwrap();
        let exported = export_saves().unwrap();

        with_cards(vec![fire_drake()]);
        assert_eq!(import_saves(&exported).unwrap(), 1);
        let resumed = start_daily(today()).unwrap();
        assert_eq!(resumed.game.remaining, 6);
        reset_state();
    }
}
