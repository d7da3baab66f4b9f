//! `POST /api/config` — replace the engine configuration.

use crate::game::{play, state};
use crate::routes::util::{error_span, json};

/// Body is a JSON object; omitted fields keep their defaults. Returns the
/// configuration now in effect.
pub fn handle_post(body: &str) -> String {
    let body = if body.trim().is_empty() { "{}" } else { body };
    match play::configure(body) {
        Ok(()) => state::with_state(|s| json(&s.config)),
        Err(e) => error_span(&e.to_string()),
    }
}
