//! Card Ledger Server - REST API over the card inventory.
//!
//! Serves CRUD, search, and pagination for a single SQLite table of
//! trading-card records.

pub mod database;
pub mod error;
pub mod query;
pub mod web;

pub use database::{
    count_cards, delete_card, get_card, init_schema, insert_card, list_cards, recent_players,
    search_cards, update_card,
};
pub use error::{Result, StoreError};
pub use query::{CardFilter, PageParams, PageQuery, SearchParams, SortOrder, SortSpec};
