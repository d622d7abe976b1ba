//! Validation rules for card data.
//!
//! Two entry points: [`validate_draft`] checks the string-valued form a
//! user edits (desktop form fields, CSV rows) and [`validate_input`]
//! checks a typed [`CardInput`] before it is written to the store.
//! Both report per-field errors instead of failing on the first one.

use log::debug;

use crate::error::ValidationErrors;
use crate::models::CardInput;

/// A card as entered by a user: every field still a raw string.
///
/// `copies` is the "Total Copies" count; the card is submitted that
/// many times.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDraft {
    pub year: String,
    pub player: String,
    pub manufacturer: String,
    pub card_set: String,
    pub subset: String,
    pub card_type: String,
    pub on_card_code: String,
    pub sport: String,
    pub tags: String,
    pub grade: String,
    pub notes: String,
    pub price_paid: String,
    pub market_price: String,
    pub copies: String,
}

impl Default for CardDraft {
    fn default() -> Self {
        Self {
            year: String::new(),
            player: String::new(),
            manufacturer: String::new(),
            card_set: String::new(),
            subset: String::new(),
            card_type: String::new(),
            on_card_code: String::new(),
            sport: String::new(),
            tags: String::new(),
            grade: String::new(),
            notes: String::new(),
            price_paid: String::new(),
            market_price: String::new(),
            copies: "1".to_string(),
        }
    }
}

impl CardDraft {
    /// Number of copies to submit, defaulting to 1.
    pub fn copies_count(&self) -> usize {
        self.copies.trim().parse::<usize>().unwrap_or(1).max(1)
    }

    /// Convert a validated draft into a typed input.
    ///
    /// Fields that fail to parse are dropped; run [`validate_draft`]
    /// first so that cannot happen for required fields.
    pub fn to_input(&self) -> CardInput {
        CardInput {
            year: self.year.trim().parse::<i64>().ok(),
            player: non_empty(&self.player),
            added_date: None,
            manufacturer: non_empty(&self.manufacturer),
            card_set: non_empty(&self.card_set),
            subset: non_empty(&self.subset),
            card_type: non_empty(&self.card_type),
            on_card_code: non_empty(&self.on_card_code),
            sport: non_empty(&self.sport),
            tags: parse_tags(&self.tags),
            notes: non_empty(&self.notes),
            grade: non_empty(&self.grade),
            price_paid: parse_optional_number(&self.price_paid),
            market_price: parse_optional_number(&self.market_price),
            quantity: Some(1),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_optional_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Split a comma-separated tag list, trimming entries and dropping
/// empties. Returns `None` when nothing remains.
pub fn parse_tags(value: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Validate a user-entered draft with the client-side rules.
///
/// Required: positive `year`; non-empty `player`, `manufacturer`,
/// `cardSet`, `type`, `onCardCode`, `sport`. `pricePaid` and
/// `marketPrice`, when present, must be non-negative numbers; `copies`
/// must be a positive integer.
pub fn validate_draft(draft: &CardDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match draft.year.trim().parse::<i64>() {
        Ok(year) if year > 0 => {}
        _ => errors.push("year", "Year is required and must be a positive number"),
    }
    if draft.player.trim().is_empty() {
        errors.push("player", "Player is required");
    }
    if draft.manufacturer.trim().is_empty() {
        errors.push("manufacturer", "Manufacturer is required");
    }
    if draft.card_set.trim().is_empty() {
        errors.push("cardSet", "Set is required");
    }
    if draft.card_type.trim().is_empty() {
        errors.push("type", "Type is required");
    }
    if draft.on_card_code.trim().is_empty() {
        errors.push("onCardCode", "On Card Code is required");
    }
    if draft.sport.trim().is_empty() {
        errors.push("sport", "Sport is required");
    }

    let price_paid = draft.price_paid.trim();
    if !price_paid.is_empty() && !price_paid.parse::<f64>().is_ok_and(|p| p >= 0.0) {
        errors.push("pricePaid", "Price Paid must be a valid number");
    }
    let market_price = draft.market_price.trim();
    if !market_price.is_empty() && !market_price.parse::<f64>().is_ok_and(|p| p >= 0.0) {
        errors.push("marketPrice", "Market Price must be a valid number");
    }

    let copies = draft.copies.trim();
    if !copies.is_empty() && !copies.parse::<i64>().is_ok_and(|c| c > 0) {
        errors.push("copies", "Total Copies must be a positive number");
    }

    if !errors.is_empty() {
        debug!("Draft validation failed: {}", errors.summary());
    }

    errors
}

/// Validate a typed input against the storage-required fields.
///
/// Unlike the draft rules this does not require `cardSet` (optional in
/// the model) and does not know about copies.
pub fn validate_input(input: &CardInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if input.year.is_none() {
        errors.push("year", "Year is required");
    }
    if blank(&input.player) {
        errors.push("player", "Player is required");
    }
    if blank(&input.manufacturer) {
        errors.push("manufacturer", "Manufacturer is required");
    }
    if blank(&input.card_type) {
        errors.push("type", "Type is required");
    }
    if blank(&input.on_card_code) {
        errors.push("onCardCode", "On Card Code is required");
    }
    if blank(&input.sport) {
        errors.push("sport", "Sport is required");
    }

    errors
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> CardDraft {
        CardDraft {
            year: "1996".to_string(),
            player: "Kobe Bryant".to_string(),
            manufacturer: "Topps".to_string(),
            card_set: "Chrome".to_string(),
            card_type: "Base".to_string(),
            on_card_code: "138".to_string(),
            sport: "Basketball".to_string(),
            ..CardDraft::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate_draft(&valid_draft()).is_empty());
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let errors = validate_draft(&CardDraft::default());
        for field in ["year", "player", "manufacturer", "cardSet", "type", "onCardCode", "sport"] {
            assert!(errors.fields.contains_key(field), "missing error for {field}");
        }
        // Optional fields left empty are not errors
        assert!(!errors.fields.contains_key("pricePaid"));
        assert!(!errors.fields.contains_key("marketPrice"));
    }

    #[test]
    fn year_must_be_a_positive_number() {
        let mut draft = valid_draft();
        draft.year = "abc".to_string();
        assert!(validate_draft(&draft).fields.contains_key("year"));

        draft.year = "-3".to_string();
        assert!(validate_draft(&draft).fields.contains_key("year"));

        draft.year = "0".to_string();
        assert!(validate_draft(&draft).fields.contains_key("year"));
    }

    #[test]
    fn prices_must_parse_when_present() {
        let mut draft = valid_draft();
        draft.price_paid = "twelve".to_string();
        draft.market_price = "-5".to_string();
        let errors = validate_draft(&draft);
        assert!(errors.fields.contains_key("pricePaid"));
        assert!(errors.fields.contains_key("marketPrice"));

        draft.price_paid = "12.50".to_string();
        draft.market_price = "80".to_string();
        assert!(validate_draft(&draft).is_empty());
    }

    #[test]
    fn copies_must_be_positive() {
        let mut draft = valid_draft();
        draft.copies = "0".to_string();
        assert!(validate_draft(&draft).fields.contains_key("copies"));

        draft.copies = "3".to_string();
        assert!(validate_draft(&draft).is_empty());
        assert_eq!(draft.copies_count(), 3);
    }

    #[test]
    fn to_input_parses_and_trims_fields() {
        let mut draft = valid_draft();
        draft.tags = "Rookie, Auto ,".to_string();
        draft.price_paid = " 12.5 ".to_string();
        draft.subset = "  ".to_string();

        let input = draft.to_input();
        assert_eq!(input.year, Some(1996));
        assert_eq!(input.player.as_deref(), Some("Kobe Bryant"));
        assert_eq!(
            input.tags,
            Some(vec!["Rookie".to_string(), "Auto".to_string()])
        );
        assert_eq!(input.price_paid, Some(12.5));
        assert_eq!(input.subset, None);
        assert_eq!(input.quantity, Some(1));
    }

    #[test]
    fn validate_input_does_not_require_card_set() {
        let input = CardInput {
            year: Some(1996),
            player: Some("Kobe Bryant".to_string()),
            manufacturer: Some("Topps".to_string()),
            card_type: Some("Base".to_string()),
            on_card_code: Some("138".to_string()),
            sport: Some("Basketball".to_string()),
            ..CardInput::default()
        };
        assert!(validate_input(&input).is_empty());

        let errors = validate_input(&CardInput::default());
        assert_eq!(errors.len(), 6);
        assert!(!errors.fields.contains_key("cardSet"));
    }

    #[test]
    fn parse_tags_drops_empty_entries() {
        assert_eq!(parse_tags(""), None);
        assert_eq!(parse_tags(" , ,"), None);
        assert_eq!(
            parse_tags("Rookie,Auto"),
            Some(vec!["Rookie".to_string(), "Auto".to_string()])
        );
    }
}
