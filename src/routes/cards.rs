//! `/api/cards/*` routes — loading the card list and the name dropdown.

use serde_json::json as json_value;

use crate::game::play;
use crate::routes::util::{error_span, json, Params};

/// Handle POST /api/cards/load
/// Body is the card list JSON as fetched by the host. A malformed list is
/// fatal for the page; there is nothing to play without it.
pub fn handle_load_post(body: &str) -> String {
    match play::load_cards(body) {
        Ok(count) => json(&json_value!({ "loaded": count })),
        Err(e) => error_span(&format!("Failed to load cards: {}", e)),
    }
}

/// Handle GET /api/cards/names?all={bool}
/// Names not yet tried in the current round, sorted. `all=true` lists every name.
pub fn handle_names_get(query: &str) -> String {
    let params = Params::from_query(query);
    json(&play::card_names(params.flag("all")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cards::fixtures::card_json;
    use crate::game::state::{reset_state, with_state};

    /// Two-card list in the host's JSON shape.
    pub fn sample_cards_json() -> String {
        format!(
            "[{},{}]",
            card_json(
                "Fire Drake",
                "Minion",
                "Breathes (F)(1) and roars \u{2460}",
                (Some(3), Some(4), Some(3), None),
                [0, 0, 1, 0],
                "An Elite Minion \u{2014} Dragon",
            ),
            card_json(
                "Lone Wolf",
                "Minion",
                "Hunts alone.",
                (Some(2), Some(2), Some(2), None),
                [0, 1, 0, 0],
                "A Minion \u{2014} Beast",
            )
        )
    }

    #[test]
    fn load_reports_count() {
        reset_state();
        let out = handle_load_post(&sample_cards_json());
        assert_eq!(out, r#"{"loaded":2}"#);
        assert_eq!(with_state(|s| s.cards.len()), 2);
        reset_state();
    }

    #[test]
    fn load_rejects_malformed_json() {
        reset_state();
        let out = handle_load_post("[{\"name\": 3}]");
        assert!(out.contains("Failed to load cards"));
        assert!(with_state(|s| s.cards.is_empty()));
    }

    #[test]
    fn names_are_sorted() {
        reset_state();
        handle_load_post(&sample_cards_json());
        assert_eq!(handle_names_get(""), r#"["Fire Drake","Lone Wolf"]"#);
        assert_eq!(handle_names_get("?all=true"), r#"["Fire Drake","Lone Wolf"]"#);
        reset_state();
    }
}
