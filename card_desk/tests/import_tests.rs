use std::io::Write;

use tempfile::NamedTempFile;

use card_desk::import::validate_rows;
use card_desk::io::{read_import_csv, ImportRecord};

// Test fixtures - sample data for testing

fn sample_csv_content() -> String {
    r#"Year,Manufacturer,Set,Subset,Type,Player Name,Card Code,Sport,Tags,Grade,Price Paid,Quantity
1996,Topps,Chrome,,Base,Kobe Bryant,138,Basketball,"Rookie, Refractor",PSA 9,12.50,1
2011,Topps,Update,,Base,Mike Trout,US175,Baseball,Rookie,,80,2
2000,Playoff,Contenders,Championship Ticket,Auto,Tom Brady,144,Football,"Rookie, Auto",BGS 8.5,,
1986,Fleer,,,Base,,57,Basketball,Rookie,,,1"#
        .to_string()
}

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn read_import_csv_maps_headers() {
    let file = write_csv(&sample_csv_content());
    let records = read_import_csv(file.path().to_str().unwrap()).unwrap();

    assert_eq!(records.len(), 4);

    let first = &records[0];
    assert_eq!(first.year, "1996");
    assert_eq!(first.manufacturer, "Topps");
    assert_eq!(first.card_set, "Chrome");
    assert_eq!(first.subset, "");
    assert_eq!(first.card_type, "Base");
    assert_eq!(first.player, "Kobe Bryant");
    assert_eq!(first.on_card_code, "138");
    assert_eq!(first.sport, "Basketball");
    assert_eq!(first.tags, "Rookie, Refractor");
    assert_eq!(first.grade, "PSA 9");
    assert_eq!(first.price_paid, "12.50");
    assert_eq!(first.quantity, "1");
}

#[test]
fn read_import_csv_tolerates_short_rows() {
    let file = write_csv(
        "Year,Manufacturer,Set,Subset,Type,Player Name,Card Code,Sport,Tags,Grade,Price Paid,Quantity\n\
         1996,Topps,Chrome,,Base,Kobe Bryant,138,Basketball",
    );
    let records = read_import_csv(file.path().to_str().unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].player, "Kobe Bryant");
    assert_eq!(records[0].quantity, "");
}

#[test]
fn read_import_csv_missing_file_is_an_error() {
    assert!(read_import_csv("/nonexistent/cards.csv").is_err());
}

#[test]
fn to_draft_defaults_copies_to_one() {
    let record = ImportRecord {
        quantity: "".to_string(),
        ..ImportRecord::default()
    };
    assert_eq!(record.to_draft().copies, "1");

    let record = ImportRecord {
        quantity: "3".to_string(),
        ..ImportRecord::default()
    };
    let draft = record.to_draft();
    assert_eq!(draft.copies, "3");
    assert_eq!(draft.copies_count(), 3);
}

#[test]
fn validate_rows_splits_valid_and_failed() {
    let file = write_csv(&sample_csv_content());
    let records = read_import_csv(file.path().to_str().unwrap()).unwrap();

    let (valid, failures) = validate_rows(&records);

    // 3 valid rows; the Fleer row has no player name
    assert_eq!(valid.len(), 3);
    assert_eq!(failures.len(), 1);

    let failure = &failures[0];
    assert_eq!(failure.line, 5); // header is line 1
    assert!(failure.errors.fields.contains_key("player"));
    assert_eq!(failure.record.manufacturer, "Fleer");
}

#[test]
fn validate_rows_reports_line_numbers_after_the_header() {
    let file = write_csv(
        "Year,Manufacturer,Set,Subset,Type,Player Name,Card Code,Sport,Tags,Grade,Price Paid,Quantity\n\
         bad-year,Topps,Chrome,,Base,Kobe Bryant,138,Basketball,,,,\n\
         1996,Topps,Chrome,,Base,Kobe Bryant,138,Basketball,,,,",
    );
    let records = read_import_csv(file.path().to_str().unwrap()).unwrap();
    let (valid, failures) = validate_rows(&records);

    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].0, 3);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].line, 2);
    assert!(failures[0].errors.fields.contains_key("year"));
}

#[test]
fn validate_rows_keeps_multiple_errors_per_row() {
    let record = ImportRecord {
        year: "-1".to_string(),
        price_paid: "lots".to_string(),
        ..ImportRecord::default()
    };
    let (valid, failures) = validate_rows(&[record]);

    assert!(valid.is_empty());
    assert_eq!(failures.len(), 1);
    let errors = &failures[0].errors;
    assert!(errors.fields.contains_key("year"));
    assert!(errors.fields.contains_key("player"));
    assert!(errors.fields.contains_key("pricePaid"));
}
