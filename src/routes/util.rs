//! Shared request parsing and response helpers for route handlers.

use serde::Serialize;

/// Decoded `key=value&key2=value2` pairs from a query string or form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Parse a URL-encoded form body (HTMX POST bodies).
    pub fn from_form(body: &str) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        let pairs = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
                (percent_decode(key), percent_decode(val))
            })
            .collect();
        Self(pairs)
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        Self::from_form(query.strip_prefix('?').unwrap_or(query))
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-blank value for `key`.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("true" | "1" | "on"))
    }
}

/// Percent-decode a URL-encoded value. Decodes to bytes first so multi-byte
/// UTF-8 sequences (accented card names) survive; invalid sequences are
/// replaced rather than rejected.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Escape text for inclusion in an HTML fragment.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Error fragment for HTMX to swap into the page.
pub fn error_span(message: &str) -> String {
    format!(r#"<span class="text-red-500">{}</span>"#, escape_html(message))
}

/// Serialize a response body, or an error fragment if that fails.
pub fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_span(&format!("Failed to encode response: {}", e)))
}
