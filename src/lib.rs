//! Sorcerify in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Web Worker
//! bridge to call. Uses `matchit` for URL routing, the same router engine
//! that powers Axum.
//!
//! The engine behind the routes is plain Rust: card data in [`cards`], the
//! word-guessing game in [`game`], and its settings in [`config`].

use wasm_bindgen::prelude::*;

pub mod cards;
pub mod config;
pub mod game;
pub mod routes;

/// Process an HTTP-like request and return the response body.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/game/guess")
/// * `query`  — Query string (e.g., "?all=true")
/// * `body`   — Request body (form data or JSON). Empty string for GET requests.
///
/// # Returns
/// JSON for data routes, or an HTML error fragment.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/config", "config").ok();

    router.insert("/api/cards/load", "cards_load").ok();
    router.insert("/api/cards/names", "cards_names").ok();

    router.insert("/api/storage/hydrate", "storage_hydrate").ok();
    router.insert("/api/storage/flush", "storage_flush").ok();
    router.insert("/api/storage/export", "storage_export").ok();
    router.insert("/api/storage/import", "storage_import").ok();

    router.insert("/api/game/daily", "game_daily").ok();
    router.insert("/api/game/practice", "game_practice").ok();
    router.insert("/api/game/guess", "game_guess").ok();
    router.insert("/api/game/name", "game_name").ok();
    router.insert("/api/game/select", "game_select").ok();
    router.insert("/api/game/view", "game_view").ok();
    router.insert("/api/game/results", "game_results").ok();
    router.insert("/api/streak", "streak").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("config", "POST") => routes::config::handle_post(body),

            ("cards_load", "POST") => routes::cards::handle_load_post(body),
            ("cards_names", "GET") => routes::cards::handle_names_get(query),

            ("storage_hydrate", "POST") => routes::storage::handle_hydrate_post(body),
            ("storage_flush", "GET") => routes::storage::handle_flush_get(query),
            ("storage_export", "GET") => routes::storage::handle_export_get(query),
            ("storage_import", "POST") => routes::storage::handle_import_post(body),

            ("game_daily", "POST") => routes::game::handle_daily_post(body),
            ("game_practice", "POST") => routes::game::handle_practice_post(body),
            ("game_guess", "POST") => routes::game::handle_guess_post(body),
            ("game_name", "POST") => routes::game::handle_name_post(body),
            ("game_select", "POST") => routes::game::handle_select_post(body),
            ("game_view", "GET") => routes::game::handle_view_get(query),
            ("game_results", "GET") => routes::game::handle_results_get(query),
            ("streak", "GET") => routes::game::handle_streak_get(query),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-500">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-500">405 — method not allowed</span>"#.to_string()
}
