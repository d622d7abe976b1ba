//! Shared types for the card ledger.
//!
//! The card model, the page envelope used by list/search responses, and
//! the validation rules shared by the desktop form and the CSV importer.

pub mod error;
pub mod models;
pub mod validation;

pub use error::ValidationErrors;
pub use models::{Card, CardInput, CardPage};
pub use validation::{validate_draft, validate_input, CardDraft};
