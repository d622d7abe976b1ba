//! Bulk CSV import.
//!
//! Each row is validated with the shared card rules; valid rows are
//! submitted to the server (duplicated per their Quantity column) and
//! failures are collected per row so one bad record never aborts the
//! batch.

use log::{info, warn};

use card_common::{validate_draft, CardDraft, ValidationErrors};

use crate::api::CardApi;
use crate::io::ImportRecord;

/// A row that could not be imported, with its per-field errors.
#[derive(Debug)]
pub struct RowFailure {
    /// 1-based file line (the header is line 1)
    pub line: usize,
    pub record: ImportRecord,
    pub errors: ValidationErrors,
}

/// Outcome of a bulk import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Cards created on the server (copies counted individually)
    pub imported: usize,
    /// Rows read from the file
    pub rows: usize,
    pub failures: Vec<RowFailure>,
}

/// Split rows into validated drafts and failures.
///
/// Returns `(line, draft)` pairs for the rows that passed.
pub fn validate_rows(records: &[ImportRecord]) -> (Vec<(usize, CardDraft)>, Vec<RowFailure>) {
    let mut valid = Vec::new();
    let mut failures = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let line = index + 2; // +2 because the CSV is 1-indexed and has a header
        let draft = record.to_draft();
        let errors = validate_draft(&draft);
        if errors.is_empty() {
            valid.push((line, draft));
        } else {
            warn!("Line {line}: {}", errors.summary());
            failures.push(RowFailure {
                line,
                record: record.clone(),
                errors,
            });
        }
    }

    (valid, failures)
}

/// Validate and submit a batch of import rows.
///
/// Server-side rejections join the failure list under a `server` key;
/// remaining rows keep going.
pub fn run_import(api: &CardApi, records: &[ImportRecord]) -> ImportReport {
    info!("Starting import of {} row(s)", records.len());
    let (valid, mut failures) = validate_rows(records);

    let mut imported = 0;
    for (line, draft) in valid {
        let input = draft.to_input();
        let copies = draft.copies_count();
        let mut submit_error = None;
        for _ in 0..copies {
            if let Err(e) = api.create_card(&input) {
                submit_error = Some(e);
                break;
            }
            imported += 1;
        }
        if let Some(e) = submit_error {
            warn!("Line {line}: server rejected card: {e}");
            let mut errors = ValidationErrors::new();
            errors.push("server", e.to_string());
            failures.push(RowFailure {
                line,
                record: record_from_draft(&draft),
                errors,
            });
        }
    }

    if failures.is_empty() {
        info!("Import finished: {imported} card(s) created");
    } else {
        warn!(
            "Import finished: {imported} card(s) created, {} row(s) failed",
            failures.len()
        );
    }

    ImportReport {
        imported,
        rows: records.len(),
        failures,
    }
}

fn record_from_draft(draft: &CardDraft) -> ImportRecord {
    ImportRecord {
        year: draft.year.clone(),
        manufacturer: draft.manufacturer.clone(),
        card_set: draft.card_set.clone(),
        subset: draft.subset.clone(),
        card_type: draft.card_type.clone(),
        player: draft.player.clone(),
        on_card_code: draft.on_card_code.clone(),
        sport: draft.sport.clone(),
        tags: draft.tags.clone(),
        grade: draft.grade.clone(),
        price_paid: draft.price_paid.clone(),
        quantity: draft.copies.clone(),
    }
}
