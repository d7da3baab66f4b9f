//! Saved games.
//!
//! All saved sessions share one store entry: a JSON object mapping each
//! session's persist key (the UTC date for daily games) to its saved state.
//!
//! ```text
//! "sorcerify:progress" => {
//!   "2026-10-17": { "guessed": [...], "remaining": 0, "hasWon": true, ... },
//!   "2026-10-18": { "guessed": ["e"], "remaining": 6, ... }
//! }
//! ```
//!
//! Storage is best effort. A missing, corrupt or full store never breaks a
//! game: reads fall back to a fresh session and failed writes are logged and
//! dropped.

use std::collections::{BTreeMap, BTreeSet};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::cards::Card;
use crate::game::reveal::reveals;
use crate::game::session::{GameSession, GuessResult, GuessState};

pub const DEFAULT_PROGRESS_KEY: &str = "sorcerify:progress";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage quota exceeded writing {key} ({needed} bytes over)")]
    QuotaExceeded { key: String, needed: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid progress JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid progress export: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("progress export is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// String key-value storage, shaped like the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store. The WASM host mirrors `localStorage` into one of these
/// and drains the changed entries back out with [`MemoryStore::take_dirty`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    dirty: BTreeSet<String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Replace the contents wholesale without marking anything dirty.
    pub fn hydrate(&mut self, entries: BTreeMap<String, String>) {
        self.entries = entries;
        self.dirty.clear();
    }

    /// Entries written since the last drain.
    pub fn take_dirty(&mut self) -> BTreeMap<String, String> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .filter_map(|k| self.entries.get(&k).map(|v| (k, v.clone())))
            .collect()
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let total = self.used_without(key) + key.len() + value.len();
            if total > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: total - quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value);
        self.dirty.insert(key.to_string());
        Ok(())
    }
}

/// One saved session as stored on disk. Every field is optional on read so
/// older or partial saves still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub guessed: Vec<String>,
    pub correct: Vec<String>,
    pub incorrect: Vec<String>,
    pub remaining: Option<u32>,
    pub has_won: bool,
    pub name_guessed: Vec<String>,
    pub name_guess_selection: String,
    pub results: Vec<GuessResult>,
}

impl PersistedState {
    pub fn from_session(session: &GameSession) -> Self {
        let state = session.state();
        Self {
            guessed: state.guessed.iter().cloned().collect(),
            correct: state.correct.iter().cloned().collect(),
            incorrect: state.incorrect.iter().cloned().collect(),
            remaining: Some(state.remaining),
            has_won: state.has_won,
            name_guessed: state.name_guessed.clone(),
            name_guess_selection: session.name_selection().to_string(),
            results: state.results.clone(),
        }
    }

    /// Rebuild a session for `card`. Hits and misses are re-derived from the
    /// card so a tampered or stale save cannot break the partition.
    pub fn into_session(
        self,
        card: Card,
        persist_key: Option<String>,
        max_attempts: u32,
    ) -> GameSession {
        let mut state = GuessState::new(max_attempts);
        let mut verdicts = Vec::new();
        for token in self.guessed {
            if state.guessed.contains(&token) {
                continue;
            }
            if reveals(&card, &token) {
                state.correct.insert(token.clone());
                verdicts.push(GuessResult::Correct);
            } else {
                state.incorrect.insert(token.clone());
                verdicts.push(GuessResult::Incorrect);
            }
            state.guessed.insert(token);
        }
        for name in self.name_guessed {
            if !state.name_guessed.contains(&name) {
                state.name_guessed.push(name);
            }
        }
        state.remaining = self.remaining.unwrap_or(max_attempts).min(max_attempts);
        state.has_won = self.has_won;
        // One verdict per recorded guess. A list that does not line up is
        // rebuilt: characters first, then names in submission order.
        state.results = if self.results.len() == state.guessed.len() + state.name_guessed.len() {
            self.results
        } else {
            warn!("saved results do not match saved guesses, rebuilding");
            verdicts.extend(state.name_guessed.iter().map(|name| {
                if *name == card.name {
                    GuessResult::Correct
                } else {
                    GuessResult::Incorrect
                }
            }));
            verdicts
        };
        GameSession::restore(card, persist_key, state, self.name_guess_selection)
    }
}

fn load_map<S: KeyValueStore + ?Sized>(
    store: &S,
    progress_key: &str,
) -> Result<BTreeMap<String, Value>, SnapshotError> {
    match store.get(progress_key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(BTreeMap::new()),
    }
}

/// Saved state for one session, or `None` when absent or unreadable.
pub fn read_snapshot<S: KeyValueStore + ?Sized>(
    store: &S,
    progress_key: &str,
    persist_key: &str,
) -> Option<PersistedState> {
    let mut map = match load_map(store, progress_key) {
        Ok(map) => map,
        Err(e) => {
            warn!("ignoring unreadable progress store: {}", e);
            return None;
        }
    };
    let entry = map.remove(persist_key)?;
    match serde_json::from_value(entry) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("ignoring corrupt saved game {:?}: {}", persist_key, e);
            None
        }
    }
}

/// Save one session's state, keeping every other session's entry. Failures
/// are logged and swallowed.
pub fn write_snapshot<S: KeyValueStore + ?Sized>(
    store: &mut S,
    progress_key: &str,
    persist_key: &str,
    state: &PersistedState,
) {
    if let Err(e) = try_write_snapshot(store, progress_key, persist_key, state) {
        warn!("could not save game {:?}: {}", persist_key, e);
    }
}

fn try_write_snapshot<S: KeyValueStore + ?Sized>(
    store: &mut S,
    progress_key: &str,
    persist_key: &str,
    state: &PersistedState,
) -> Result<(), SnapshotError> {
    let mut map = load_map(store, progress_key).unwrap_or_else(|e| {
        warn!("progress store unreadable, starting a fresh one: {}", e);
        BTreeMap::new()
    });
    map.insert(persist_key.to_string(), serde_json::to_value(state)?);
    store.set(progress_key, serde_json::to_string(&map)?)?;
    Ok(())
}

/// Save the session if it has a persist key. Practice rounds have none.
pub fn persist_session<S: KeyValueStore + ?Sized>(
    store: &mut S,
    progress_key: &str,
    session: &GameSession,
) {
    if let Some(key) = session.persist_key() {
        write_snapshot(store, progress_key, key, &PersistedState::from_session(session));
    }
}

/// The whole progress map as URL-safe base64, for backup or moving devices.
pub fn export_progress<S: KeyValueStore + ?Sized>(
    store: &S,
    progress_key: &str,
) -> Result<String, SnapshotError> {
    let map = load_map(store, progress_key)?;
    let json = serde_json::to_string(&map)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Replace the progress map from an [`export_progress`] string. Returns the
/// number of saved sessions imported.
pub fn import_progress<S: KeyValueStore + ?Sized>(
    store: &mut S,
    progress_key: &str,
    encoded: &str,
) -> Result<usize, SnapshotError> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded.trim())?;
    let json = String::from_utf8(bytes)?;
    let map: BTreeMap<String, PersistedState> = serde_json::from_str(&json)?;
    store.set(progress_key, serde_json::to_string(&map)?)?;
    Ok(map.len())
}
