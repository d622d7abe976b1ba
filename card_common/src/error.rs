//! Shared error types.

use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation failures, keyed by wire field name.
///
/// Kept ordered so error listings and log lines are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{}", render(.fields))]
pub struct ValidationErrors {
    pub fields: BTreeMap<String, String>,
}

/// Single-line rendering, e.g. `player: Player is required; year: ...`
fn render(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn summary(&self) -> String {
        render(&self.fields)
    }

    /// `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
