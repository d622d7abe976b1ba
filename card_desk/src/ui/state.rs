//! Client-side state: filters, sorting, pagination, edit buffers.

use std::collections::HashSet;

use card_common::{Card, CardDraft, ValidationErrors};

use crate::import::ImportReport;

#[derive(PartialEq)]
pub enum Screen {
    Home,
    CardList,
    AddCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Tri-state column sorting.
///
/// Clicking a column cycles unsorted -> ascending -> descending ->
/// unsorted; clicking a different column starts ascending on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortState {
    pub field: Option<String>,
    pub order: Option<SortOrder>,
}

impl SortState {
    pub fn cycle(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.order = match self.order {
                Some(SortOrder::Asc) => Some(SortOrder::Desc),
                Some(SortOrder::Desc) => None,
                None => Some(SortOrder::Asc),
            };
            if self.order.is_none() {
                self.field = None;
            }
        } else {
            self.field = Some(field.to_string());
            self.order = Some(SortOrder::Asc);
        }
    }

    /// (sortField, sortOrder) request parameters, when sorted.
    pub fn to_param(&self) -> Option<(&str, &str)> {
        match (&self.field, self.order) {
            (Some(field), Some(order)) => Some((field.as_str(), order.as_param())),
            _ => None,
        }
    }

    /// Arrow suffix for a column header.
    pub fn indicator(&self, field: &str) -> &'static str {
        if self.field.as_deref() != Some(field) {
            return "";
        }
        match self.order {
            Some(SortOrder::Asc) => " ⏶",
            Some(SortOrder::Desc) => " ⏷",
            None => "",
        }
    }
}

/// One search input per filter field, all raw strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFields {
    pub year: String,
    pub player: String,
    pub added_date: String,
    pub manufacturer: String,
    pub card_set: String,
    pub subset: String,
    pub card_type: String,
    pub on_card_code: String,
    pub sport: String,
    pub tags: String,
    pub grade: String,
    pub price_paid: String,
    pub market_price: String,
    pub quantity: String,
}

impl SearchFields {
    /// (wire name, value) pairs; empty values are kept out so they
    /// impose no constraint on the server.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let all = [
            ("year", &self.year),
            ("player", &self.player),
            ("addedDate", &self.added_date),
            ("manufacturer", &self.manufacturer),
            ("cardSet", &self.card_set),
            ("subset", &self.subset),
            ("type", &self.card_type),
            ("onCardCode", &self.on_card_code),
            ("sport", &self.sport),
            ("tags", &self.tags),
            ("grade", &self.grade),
            ("pricePaid", &self.price_paid),
            ("marketPrice", &self.market_price),
            ("quantity", &self.quantity),
        ];
        all.into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (name, value.trim().to_string()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    pub fn clear(&mut self) {
        *self = SearchFields::default();
    }
}

/// State of the list/search screen.
pub struct ListState {
    pub cards: Vec<Card>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub sort: SortState,
    pub search: SearchFields,
    pub show_search: bool,
    pub loaded: bool,
    /// id of the row being edited in place, with its draft
    pub editing: Option<i64>,
    pub edit_draft: CardDraft,
    pub edit_errors: ValidationErrors,
    pub selected: HashSet<i64>,
    pub expanded_note: Option<String>,
    pub error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            total: 0,
            page: 1,
            limit: 50,
            sort: SortState::default(),
            search: SearchFields::default(),
            show_search: false,
            loaded: false,
            editing: None,
            edit_draft: CardDraft::default(),
            edit_errors: ValidationErrors::new(),
            selected: HashSet::new(),
            expanded_note: None,
            error: None,
        }
    }
}

impl ListState {
    pub fn total_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.limit - 1) / self.limit
        }
    }

    pub fn start_editing(&mut self, card: &Card) {
        self.editing = Some(card.id);
        self.edit_draft = draft_from_card(card);
        self.edit_errors = ValidationErrors::new();
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
        self.edit_draft = CardDraft::default();
        self.edit_errors = ValidationErrors::new();
    }
}

/// State of the add/import screen.
#[derive(Default)]
pub struct AddCardState {
    pub form: CardDraft,
    pub errors: ValidationErrors,
    pub success: Option<String>,
    pub csv_path: String,
    pub report: Option<ImportReport>,
}

/// State of the home screen.
#[derive(Default)]
pub struct HomeState {
    pub players: Vec<String>,
    pub loaded: bool,
    pub error: Option<String>,
}

/// Seed an edit buffer from a stored card.
pub fn draft_from_card(card: &Card) -> CardDraft {
    CardDraft {
        year: card.year.to_string(),
        player: card.player.clone(),
        manufacturer: card.manufacturer.clone(),
        card_set: card.card_set.clone().unwrap_or_default(),
        subset: card.subset.clone().unwrap_or_default(),
        card_type: card.card_type.clone(),
        on_card_code: card.on_card_code.clone(),
        sport: card.sport.clone(),
        tags: card.tags.as_ref().map(|t| t.join(", ")).unwrap_or_default(),
        grade: card.grade.clone().unwrap_or_default(),
        notes: card.notes.clone().unwrap_or_default(),
        price_paid: card.price_paid.map(|p| p.to_string()).unwrap_or_default(),
        market_price: card.market_price.map(|p| p.to_string()).unwrap_or_default(),
        copies: "1".to_string(),
    }
}

/// Render a stored RFC 3339 timestamp as a plain date for table cells.
pub fn display_date(added_date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(added_date) {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(_) => added_date.chars().take(10).collect(),
    }
}
