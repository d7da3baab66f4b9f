//! Card data model and load-time validation.
//!
//! Cards arrive as a JSON array fetched by the host page. They are parsed
//! once into strongly typed, immutable values; any record that does not fit
//! the schema fails the whole load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::token::Element;

/// Base URL for the card reference site linked from the results screen.
const CARD_INFO_BASE: &str = "https://curiosa.io/cards/";

#[derive(Error, Debug)]
pub enum CardError {
    #[error("malformed card data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("card #{index} is invalid: {reason}")]
    Invalid { index: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Ordinary,
    Exceptional,
    Elite,
    Unique,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Avatar,
    Aura,
    Magic,
    Minion,
    Relic,
    Site,
    Spell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finish {
    Standard,
    Foil,
}

/// Threshold requirements per element. Counts are unsigned, so a negative
/// count in the source data is rejected by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub air: u32,
    pub earth: u32,
    pub fire: u32,
    pub water: u32,
}

impl Thresholds {
    pub fn get(&self, element: Element) -> u32 {
        match element {
            Element::Air => self.air,
            Element::Earth => self.earth,
            Element::Fire => self.fire,
            Element::Water => self.water,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub rules_text: String,
    pub cost: Option<i32>,
    pub attack: Option<i32>,
    pub defence: Option<i32>,
    pub life: Option<i32>,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub slug: String,
    pub finish: Finish,
    pub product: String,
    pub artist: String,
    pub flavor_text: String,
    pub type_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntry {
    pub name: String,
    pub released_at: String,
    pub metadata: Guardian,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    pub guardian: Guardian,
    pub elements: String,
    pub sub_types: String,
    pub sets: Vec<SetEntry>,
}

impl Card {
    pub fn is_avatar(&self) -> bool {
        self.guardian.card_type == CardType::Avatar
    }

    /// Sites are printed landscape; the UI lays them out differently.
    pub fn is_site(&self) -> bool {
        self.guardian.card_type == CardType::Site
    }

    /// Type line of the first printing. Empty when the card has no printings.
    pub fn type_text(&self) -> &str {
        self.sets
            .first()
            .and_then(|set| set.variants.first())
            .map(|v| v.type_text.as_str())
            .unwrap_or("")
    }

    /// Value in the top-left badge: life for Avatars, cost for everything else.
    pub fn left_top_text(&self) -> String {
        let value = if self.is_avatar() {
            self.guardian.life
        } else {
            self.guardian.cost
        };
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn stat_text(&self) -> String {
        stat_display(self.guardian.attack, self.guardian.defence)
    }

    /// Every text field a literal guess is scanned against, in scan order.
    pub fn searchable_texts(&self) -> [String; 5] {
        [
            self.left_top_text(),
            self.stat_text(),
            self.name.clone(),
            self.type_text().to_string(),
            self.guardian.rules_text.clone(),
        ]
    }

    /// Link to the card's reference page.
    pub fn info_url(&self) -> String {
        let stripped: String = self
            .name
            .to_lowercase()
            .chars()
            .filter(|c| *c != '\'' && *c != '\u{2019}')
            .collect();
        let slug = stripped.split_whitespace().collect::<Vec<_>>().join("_");
        format!("{}{}", CARD_INFO_BASE, slug)
    }
}

/// Attack/defence as printed: empty when both are missing, a bare number when
/// they match, otherwise `attack/defence` with `-` standing in for a missing side.
pub fn stat_display(attack: Option<i32>, defence: Option<i32>) -> String {
    match (attack, defence) {
        (None, None) => String::new(),
        (a, d) if a == d => a.or(d).map(|v| v.to_string()).unwrap_or_default(),
        (a, d) => format!("{}/{}", side(a), side(d)),
    }
}

fn side(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Parse and validate the full card list.
pub fn parse_cards(json: &str) -> Result<Vec<Card>, CardError> {
    let cards: Vec<Card> = serde_json::from_str(json)?;
    for (index, card) in cards.iter().enumerate() {
        validate(index, card)?;
    }
    Ok(cards)
}

fn validate(index: usize, card: &Card) -> Result<(), CardError> {
    if card.name.trim().is_empty() {
        return Err(CardError::Invalid {
            index,
            reason: "name is empty".to_string(),
        });
    }
    Ok(())
}
