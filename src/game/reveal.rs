//! Reveal predicate — does a guessed token appear anywhere on a card?
//!
//! Three rules are tried in order and the first hit wins:
//!
//! 1. Threshold tokens hit when the card needs that element or its rules
//!    text mentions the element code, e.g. `(F)`.
//! 2. Digit tokens hit when the rules text contains the matching circled
//!    digit (① for 1 through ⑳ for 20).
//! 3. Any token hits when a character of a searchable field normalizes to it.

use crate::cards::Card;
use crate::game::token::{normalize_char, single_digit, Element};

/// Code point of ①. Circled digits run sequentially up to ⑳.
const CIRCLED_DIGIT_START: u32 = 0x2460;
const CIRCLED_DIGIT_MAX: u32 = 20;

/// Whether `token` (already normalized) reveals anything on `card`.
pub fn reveals(card: &Card, token: &str) -> bool {
    if matches_threshold(card, token) {
        return true;
    }
    if matches_circled_digit(&card.guardian.rules_text, token) {
        return true;
    }
    matches_literal(&card.searchable_texts(), token)
}

fn matches_threshold(card: &Card, token: &str) -> bool {
    let Some(element) = Element::from_token(token) else {
        return false;
    };
    if card.guardian.thresholds.get(element) > 0 {
        return true;
    }
    let code = format!("({})", element.code());
    card.guardian.rules_text.contains(&code)
}

fn matches_circled_digit(rules_text: &str, token: &str) -> bool {
    match single_digit(token).and_then(circled_digit) {
        Some(glyph) => rules_text.contains(glyph),
        None => false,
    }
}

/// The circled glyph for `n`, or `None` outside 1..=20.
pub fn circled_digit(n: u32) -> Option<char> {
    if !(1..=CIRCLED_DIGIT_MAX).contains(&n) {
        return None;
    }
    char::from_u32(CIRCLED_DIGIT_START + n - 1)
}

fn matches_literal(texts: &[String], token: &str) -> bool {
    texts
        .iter()
        .flat_map(|text| text.chars())
        .any(|c| normalize_char(c) == token)
}
