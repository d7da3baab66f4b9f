//! Win streaks.
//!
//! The daily streak counts consecutive UTC days won. It is stored as two
//! plain entries, the count and the last winning date, and each change
//! produces a [`StreakUpdate`] the host broadcasts to the rest of the page.
//! Practice streaks live only for the page session.

use log::warn;
use serde::Serialize;

use crate::config::GameConfig;
use crate::game::daily::UtcDate;
use crate::game::session::SessionEvent;
use crate::game::snapshot::KeyValueStore;

pub const DEFAULT_STREAK_KEY: &str = "sorcerify:streak";
pub const DEFAULT_LAST_WIN_KEY: &str = "sorcerify:lastWinDate";
pub const STREAK_EVENT: &str = "sorcerify:streak-updated";

/// Payload of the streak-updated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    pub streak: u32,
    pub last_win_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyStreak {
    pub streak: u32,
    pub last_win_date: Option<UtcDate>,
}

impl DailyStreak {
    /// Read the streak from the store. Anything unreadable counts as no streak.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, config: &GameConfig) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("could not read {}: {}", key, e);
                None
            }
        };
        let streak = read(&config.streak_key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0);
        let last_win_date = read(&config.last_win_key).and_then(|raw| raw.parse().ok());
        Self {
            streak,
            last_win_date,
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S, config: &GameConfig) {
        if let Err(e) = store.set(&config.streak_key, self.streak.to_string()) {
            warn!("could not save streak: {}", e);
        }
        if let Some(date) = self.last_win_date {
            if let Err(e) = store.set(&config.last_win_key, date.to_string()) {
                warn!("could not save last win date: {}", e);
            }
        }
    }

    /// Apply a daily game's result. A day that already has a recorded win
    /// ignores further results.
    pub fn record(&mut self, event: SessionEvent, today: UtcDate) -> Option<StreakUpdate> {
        match event {
            SessionEvent::Won => self.record_win(today),
            SessionEvent::Lost => self.record_loss(today),
        }
    }

    pub fn record_win(&mut self, today: UtcDate) -> Option<StreakUpdate> {
        if self.last_win_date == Some(today) {
            return None;
        }
        self.streak = if self.last_win_date == Some(today.previous()) {
            self.streak + 1
        } else {
            1
        };
        self.last_win_date = Some(today);
        Some(self.update())
    }

    pub fn record_loss(&mut self, today: UtcDate) -> Option<StreakUpdate> {
        if self.last_win_date == Some(today) {
            return None;
        }
        self.streak = 0;
        Some(self.update())
    }

    fn update(&self) -> StreakUpdate {
        StreakUpdate {
            streak: self.streak,
            last_win_date: self.last_win_date.map(|d| d.to_string()),
        }
    }
}

/// Consecutive practice wins in this page session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PracticeStreak(pub u32);

impl PracticeStreak {
    pub fn record(&mut self, event: SessionEvent) {
        self.0 = match event {
            SessionEvent::Won => self.0 + 1,
            SessionEvent::Lost => 0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::snapshot::MemoryStore;

    fn date(s: &str) -> UtcDate {
        s.parse().unwrap()
    }

    #[test]
    fn consecutive_wins_extend_streak() {
        let mut streak = DailyStreak::default();
        assert_eq!(streak.record_win(date("2026-10-16")).unwrap().streak, 1);
        assert_eq!(streak.record_win(date("2026-10-17")).unwrap().streak, 2);
        let update = streak.record_win(date("2026-10-18")).unwrap();
        assert_eq!(update.streak, 3);
        assert_eq!(update.last_win_date.as_deref(), Some("2026-10-18"));
    }

    #[test]
    fn gap_restarts_streak() {
        let mut streak = DailyStreak {
            streak: 5,
            last_win_date: Some(date("2026-10-15")),
        };
        assert_eq!(streak.record_win(date("2026-10-18")).unwrap().streak, 1);
    }

    #[test]
    fn second_result_same_day_is_ignored() {
        let mut streak = DailyStreak::default();
        streak.record_win(date("2026-10-18"));
        assert_eq!(streak.record_win(date("2026-10-18")), None);
        assert_eq!(streak.record_loss(date("2026-10-18")), None);
        assert_eq!(streak.streak, 1);
    }

    #[test]
    fn loss_resets_and_keeps_last_win() {
        let mut streak = DailyStreak {
            streak: 4,
            last_win_date: Some(date("2026-10-17")),
        };
        let update = streak.record(SessionEvent::Lost, date("2026-10-18")).unwrap();
        assert_eq!(update.streak, 0);
        assert_eq!(update.last_win_date.as_deref(), Some("2026-10-17"));
    }

    #[test]
    fn update_serializes_camel_case() {
        let update = StreakUpdate {
            streak: 2,
            last_win_date: Some("2026-10-18".to_string()),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"streak":2,"lastWinDate":"2026-10-18"}"#);
    }

    #[test]
    fn save_and_load() {
        let config = GameConfig::default();
        let mut store = MemoryStore::new();
        let streak = DailyStreak {
            streak: 3,
            last_win_date: Some(date("2026-10-18")),
        };
        streak.save(&mut store, &config);
        assert_eq!(store.get("sorcerify:streak").unwrap().as_deref(), Some("3"));
        assert_eq!(DailyStreak::load(&store, &config), streak);
    }

    #[test]
    fn garbage_loads_as_no_streak() {
        let config = GameConfig::default();
        let mut store = MemoryStore::new();
        store.set("sorcerify:streak", "many".to_string()).unwrap();
        store.set("sorcerify:lastWinDate", "someday".to_string()).unwrap();
        assert_eq!(DailyStreak::load(&store, &config), DailyStreak::default());
    }

    #[test]
    fn practice_streak_counts_wins() {
        let mut streak = PracticeStreak::default();
        streak.record(SessionEvent::Won);
        streak.record(SessionEvent::Won);
        assert_eq!(streak.0, 2);
        streak.record(SessionEvent::Lost);
        assert_eq!(streak.0, 0);
    }
}
