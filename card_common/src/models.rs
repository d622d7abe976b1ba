//! Card data model and wire types.
//!
//! Field names are camelCase on the wire; timestamps are RFC 3339 UTC
//! strings produced by the server.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One trading-card inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub year: i64,
    pub player: String,
    pub added_date: String,
    pub manufacturer: String,
    pub card_set: Option<String>,
    pub subset: Option<String>,
    #[serde(rename = "type")]
    pub card_type: String,
    pub on_card_code: String,
    pub sport: String,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub grade: Option<String>,
    pub price_paid: Option<f64>,
    pub market_price: Option<f64>,
    pub quantity: i64,
}

/// Caller-supplied field set for create and partial update.
///
/// Every field is optional; on update, absent fields leave the stored
/// value untouched. On create, `quantity` defaults to 1 and
/// `added_date` to the current time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardInput {
    pub year: Option<i64>,
    pub player: Option<String>,
    pub added_date: Option<String>,
    pub manufacturer: Option<String>,
    pub card_set: Option<String>,
    pub subset: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub on_card_code: Option<String>,
    pub sport: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub grade: Option<String>,
    pub price_paid: Option<f64>,
    pub market_price: Option<f64>,
    pub quantity: Option<i64>,
}

/// One page of a list/search result, with the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPage {
    pub data: Vec<Card>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Current time as an RFC 3339 UTC string, millisecond precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
