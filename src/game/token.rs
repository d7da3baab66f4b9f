//! Guess tokens — the units a player can guess.
//!
//! A token is a lowercase ASCII letter, a single decimal digit, or one of the
//! four threshold names. Everything that flows into the reveal engine or the
//! masking renderer is compared in this normalized form.

use serde::{Deserialize, Serialize};

/// The four threshold elements, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Air,
    Earth,
    Fire,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Air, Element::Earth, Element::Fire, Element::Water];

    /// The guess token for this element (`"air"`, `"earth"`, ...).
    pub fn token(self) -> &'static str {
        match self {
            Element::Air => "air",
            Element::Earth => "earth",
            Element::Fire => "fire",
            Element::Water => "water",
        }
    }

    /// Single-letter code used inline in rules text, e.g. `(F)`.
    pub fn code(self) -> char {
        match self {
            Element::Air => 'A',
            Element::Earth => 'E',
            Element::Fire => 'F',
            Element::Water => 'W',
        }
    }

    pub fn from_token(token: &str) -> Option<Element> {
        Element::ALL.into_iter().find(|e| e.token() == token)
    }

    pub fn from_code(code: char) -> Option<Element> {
        Element::ALL.into_iter().find(|e| e.code() == code)
    }
}

/// Normalize raw input to its canonical guess key.
///
/// Letters are lowercased; threshold names, digits and anything else pass
/// through unchanged.
pub fn normalize(input: &str) -> String {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => normalize_char(c),
        _ => input.to_string(),
    }
}

/// Single-character form of [`normalize`].
pub fn normalize_char(c: char) -> String {
    if c.is_ascii_alphabetic() {
        c.to_ascii_lowercase().to_string()
    } else {
        c.to_string()
    }
}

/// Whether a normalized token is something the keyboard can submit.
pub fn is_guessable(token: &str) -> bool {
    if Element::from_token(token).is_some() {
        return true;
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_lowercase() || c.is_ascii_digit(),
        _ => false,
    }
}

/// True for a token made of exactly one decimal digit.
pub fn single_digit(token: &str) -> Option<u32> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10),
        _ => None,
    }
}

/// All keyboard tokens: letters, then digits, then thresholds.
pub fn keyboard_tokens() -> Vec<String> {
    let letters = ('a'..='z').map(|c| c.to_string());
    let digits = ('0'..='9').map(|c| c.to_string());
    let thresholds = Element::ALL.into_iter().map(|e| e.token().to_string());
    letters.chain(digits).chain(thresholds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_letters() {
        assert_eq!(normalize("A"), "a");
        assert_eq!(normalize("z"), "z");
    }

    #[test]
    fn normalize_passes_digits_and_punctuation() {
        assert_eq!(normalize("7"), "7");
        assert_eq!(normalize("'"), "'");
        assert_eq!(normalize("①"), "①");
    }

    #[test]
    fn normalize_keeps_threshold_names() {
        for e in Element::ALL {
            assert_eq!(normalize(e.token()), e.token());
        }
    }

    #[test]
    fn guessable_tokens() {
        assert!(is_guessable("a"));
        assert!(is_guessable("0"));
        assert!(is_guessable("water"));
        assert!(!is_guessable("A"));
        assert!(!is_guessable("-"));
        assert!(!is_guessable("ab"));
        assert!(!is_guessable(""));
    }

    #[test]
    fn element_codes_roundtrip() {
        for e in Element::ALL {
            assert_eq!(Element::from_code(e.code()), Some(e));
            assert_eq!(Element::from_token(e.token()), Some(e));
        }
        assert_eq!(Element::from_code('X'), None);
    }

    #[test]
    fn keyboard_has_forty_keys() {
        let keys = keyboard_tokens();
        assert_eq!(keys.len(), 40);
        assert_eq!(keys[0], "a");
        assert_eq!(keys[26], "0");
        assert_eq!(keys[36], "air");
        assert_eq!(keys[39], "water");
    }
}
