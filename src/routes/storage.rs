//! `/api/storage/*` routes — mirroring the browser's localStorage.
//!
//! The worker cannot reach localStorage, so the page posts its entries on
//! startup (`hydrate`) and pulls changed entries back after each request
//! (`flush`). `export`/`import` move saved rounds between devices.

use std::collections::BTreeMap;

use serde_json::json as json_value;

use crate::game::play;
use crate::routes::util::{error_span, json};

/// Handle POST /api/storage/hydrate
/// Body is a JSON object of localStorage keys to string values.
pub fn handle_hydrate_post(body: &str) -> String {
    let entries: BTreeMap<String, String> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => return error_span(&format!("Invalid storage JSON: {}", e)),
    };
    let count = entries.len();
    play::hydrate_store(entries);
    json(&json_value!({ "entries": count }))
}

/// Handle GET /api/storage/flush
/// Entries written since the last flush, as a JSON object.
pub fn handle_flush_get(_query: &str) -> String {
    json(&play::flush_store())
}

/// Handle GET /api/storage/export
/// All saved rounds as one URL-safe base64 string.
pub fn handle_export_get(_query: &str) -> String {
    match play::export_saves() {
        Ok(encoded) => encoded,
        Err(e) => error_span(&format!("Export failed: {}", e)),
    }
}

/// Handle POST /api/storage/import
/// Body is a string from `/api/storage/export`.
pub fn handle_import_post(body: &str) -> String {
    match play::import_saves(body) {
        Ok(count) => json(&json_value!({ "imported": count })),
        Err(e) => error_span(&format!("Import failed: {}", e)),
    }
}
