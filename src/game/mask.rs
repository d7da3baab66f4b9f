//! Masking renderer — hangman-style display of card text.
//!
//! Plain text masks character by character. Rules text additionally carries
//! inline markup: `(F)`-style element codes become icons and `(3)`-style
//! numbers become numeral badges. Both have their own reveal state, separate
//! from the letters around them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::cards::{Card, Thresholds};
use crate::game::token::{normalize_char, Element};

/// Placeholder for anything still hidden.
pub const PLACEHOLDER: char = '_';

/// One piece of rendered rules text or threshold row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Text { text: String },
    Icon { element: Element, revealed: bool },
    Numeral { display: String, revealed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Landscape frame used by Sites.
    Site,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftTop {
    Life,
    Cost,
}

/// Every displayed field of a card, masked against one guessed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub layout: Layout,
    pub left_top_label: LeftTop,
    pub left_top: String,
    pub thresholds: Vec<Segment>,
    pub stats: String,
    pub name: String,
    pub type_line: String,
    pub rules: Vec<Segment>,
}

/// Maskable characters are ASCII letters and digits. Threshold names only
/// show up as whole tokens, never inside plain text.
pub fn is_maskable(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Mask `text` against the guessed tokens.
pub fn mask_text(text: &str, guessed: &BTreeSet<String>) -> String {
    text.chars()
        .map(|c| {
            if is_maskable(c) && !guessed.contains(&normalize_char(c)) {
                PLACEHOLDER
            } else {
                c
            }
        })
        .collect()
}

/// A guessed-token set plus the reveal-all override used once a game ends.
#[derive(Debug, Clone, Copy)]
pub struct Mask<'a> {
    guessed: &'a BTreeSet<String>,
    reveal_all: bool,
}

impl<'a> Mask<'a> {
    pub fn new(guessed: &'a BTreeSet<String>, reveal_all: bool) -> Self {
        Self { guessed, reveal_all }
    }

    fn shows(&self, token: &str) -> bool {
        self.reveal_all || self.guessed.contains(token)
    }

    pub fn text(&self, text: &str) -> String {
        if self.reveal_all {
            text.to_string()
        } else {
            mask_text(text, self.guessed)
        }
    }

    /// Split rules text into masked text, element icons and numeral badges.
    pub fn rules(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut plain = String::new();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            if c == '(' {
                if let Some((segment, consumed)) = self.markup(&rest[1..]) {
                    self.flush(&mut plain, &mut segments);
                    segments.push(segment);
                    rest = &rest[1 + consumed..];
                    continue;
                }
            }
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
        self.flush(&mut plain, &mut segments);
        segments
    }

    /// Recognize `X)` or `digits)` right after an opening parenthesis.
    /// Returns the segment and how many bytes it consumed.
    fn markup(&self, after_paren: &str) -> Option<(Segment, usize)> {
        let mut chars = after_paren.chars();
        if let (Some(code), Some(')')) = (chars.next(), chars.next()) {
            if let Some(element) = Element::from_code(code) {
                let revealed = self.shows(element.token());
                return Some((Segment::Icon { element, revealed }, 2));
            }
        }

        let digits: &str = {
            let end = after_paren
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_paren.len());
            &after_paren[..end]
        };
        if digits.is_empty() || !after_paren[digits.len()..].starts_with(')') {
            return None;
        }
        let revealed = self.shows(digits);
        let display = if revealed {
            digits.to_string()
        } else {
            PLACEHOLDER.to_string()
        };
        Some((Segment::Numeral { display, revealed }, digits.len() + 1))
    }

    fn flush(&self, plain: &mut String, segments: &mut Vec<Segment>) {
        if !plain.is_empty() {
            segments.push(Segment::Text {
                text: self.text(plain),
            });
            plain.clear();
        }
    }

    /// One icon per required threshold, elements in display order.
    pub fn threshold_icons(&self, thresholds: &Thresholds) -> Vec<Segment> {
        Element::ALL
            .into_iter()
            .flat_map(|element| {
                let revealed = self.shows(element.token());
                (0..thresholds.get(element)).map(move |_| Segment::Icon { element, revealed })
            })
            .collect()
    }

    pub fn card(&self, card: &Card) -> CardView {
        CardView {
            layout: if card.is_site() {
                Layout::Site
            } else {
                Layout::Standard
            },
            left_top_label: if card.is_avatar() {
                LeftTop::Life
            } else {
                LeftTop::Cost
            },
            left_top: self.text(&card.left_top_text()),
            thresholds: self.threshold_icons(&card.guardian.thresholds),
            stats: self.text(&card.stat_text()),
            name: self.text(&card.name),
            type_line: self.text(card.type_text()),
            rules: self.rules(&card.guardian.rules_text),
        }
    }
}
