//! CSV import file reading.
//!
//! Expected header row:
//! `Year, Manufacturer, Set, Subset, Type, Player Name, Card Code,
//! Sport, Tags, Grade, Price Paid, Quantity`

use serde::Deserialize;

use card_common::CardDraft;

/// One raw row of an import file. Every column is kept as text so a
/// bad value can be reported instead of breaking deserialization.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImportRecord {
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Manufacturer", default)]
    pub manufacturer: String,
    #[serde(rename = "Set", default)]
    pub card_set: String,
    #[serde(rename = "Subset", default)]
    pub subset: String,
    #[serde(rename = "Type", default)]
    pub card_type: String,
    #[serde(rename = "Player Name", default)]
    pub player: String,
    #[serde(rename = "Card Code", default)]
    pub on_card_code: String,
    #[serde(rename = "Sport", default)]
    pub sport: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
    #[serde(rename = "Grade", default)]
    pub grade: String,
    #[serde(rename = "Price Paid", default)]
    pub price_paid: String,
    #[serde(rename = "Quantity", default)]
    pub quantity: String,
}

impl ImportRecord {
    /// Map the row onto the shared draft shape so the usual validation
    /// rules apply. The Quantity column becomes the copies count,
    /// defaulting to 1 when empty.
    pub fn to_draft(&self) -> CardDraft {
        let copies = if self.quantity.trim().is_empty() {
            "1".to_string()
        } else {
            self.quantity.trim().to_string()
        };
        CardDraft {
            year: self.year.clone(),
            player: self.player.clone(),
            manufacturer: self.manufacturer.clone(),
            card_set: self.card_set.clone(),
            subset: self.subset.clone(),
            card_type: self.card_type.clone(),
            on_card_code: self.on_card_code.clone(),
            sport: self.sport.clone(),
            tags: self.tags.clone(),
            grade: self.grade.clone(),
            notes: String::new(),
            price_paid: self.price_paid.clone(),
            market_price: String::new(),
            copies,
        }
    }
}

/// Read every row of an import CSV. Short rows are tolerated and
/// whitespace is trimmed; per-row validation happens later.
pub fn read_import_csv(path: &str) -> Result<Vec<ImportRecord>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: ImportRecord = result?;
        records.push(record);
    }

    Ok(records)
}
