//! Request-parameter translation: filters, sorting, pagination.
//!
//! Raw query-string values come in as optional strings and are turned
//! into a typed filter specification plus a SQL predicate with bound
//! parameters. Values are never interpolated into SQL text.

use rusqlite::types::Value;
use serde::Deserialize;

use crate::error::{Result, StoreError};

/// Default page size when the caller supplies none (or garbage).
pub const DEFAULT_LIMIT: i64 = 10;
/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 500;

/// Sortable fields: wire name to column name.
const SORTABLE_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("year", "year"),
    ("player", "player"),
    ("addedDate", "added_date"),
    ("manufacturer", "manufacturer"),
    ("cardSet", "card_set"),
    ("subset", "subset"),
    ("type", "card_type"),
    ("onCardCode", "on_card_code"),
    ("sport", "sport"),
    ("grade", "grade"),
    ("notes", "notes"),
    ("pricePaid", "price_paid"),
    ("marketPrice", "market_price"),
    ("quantity", "quantity"),
];

/// Sort direction, parsed case-insensitively from `ASC`/`DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A validated sort: a known column plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub order: SortOrder,
}

impl SortSpec {
    /// Resolve a wire field name against the allow-list. Unknown field
    /// names and unknown orders are rejected rather than passed through
    /// to SQL.
    pub fn parse(field: &str, order: &str) -> Result<Self> {
        let column = SORTABLE_FIELDS
            .iter()
            .find(|(name, _)| *name == field.trim())
            .map(|(_, column)| *column)
            .ok_or_else(|| StoreError::BadRequest(format!("unknown sort field: {field}")))?;
        let order = SortOrder::parse(order)
            .ok_or_else(|| StoreError::BadRequest(format!("invalid sort order: {order}")))?;
        Ok(SortSpec { column, order })
    }

    pub fn order_by(&self) -> String {
        format!(" ORDER BY {} {}", self.column, self.order.as_sql())
    }
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Lenient parse: absent or unparsable values fall back to page 1,
    /// limit 10; page is clamped to >= 1 and limit to 1..=500.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        PageParams { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Raw pagination/sort parameters for `GET /cards`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

impl PageQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::from_raw(self.page.as_deref(), self.limit.as_deref())
    }

    /// Sorting applies only when an order was supplied; the field
    /// defaults to `id`.
    pub fn sort(&self) -> Result<Option<SortSpec>> {
        match self.sort_order.as_deref().filter(|o| !o.trim().is_empty()) {
            Some(order) => {
                let field = self.sort_field.as_deref().unwrap_or("id");
                SortSpec::parse(field, order).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Raw filter parameters for `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    pub year: Option<String>,
    pub player: Option<String>,
    pub added_date: Option<String>,
    pub manufacturer: Option<String>,
    pub card_set: Option<String>,
    pub subset: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub on_card_code: Option<String>,
    pub sport: Option<String>,
    pub tags: Option<String>,
    pub grade: Option<String>,
    pub price_paid: Option<String>,
    pub market_price: Option<String>,
    pub quantity: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

impl SearchParams {
    pub fn page_params(&self) -> PageParams {
        PageParams::from_raw(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn sort(&self) -> Result<Option<SortSpec>> {
        match self.sort_order.as_deref().filter(|o| !o.trim().is_empty()) {
            Some(order) => {
                let field = self.sort_field.as_deref().unwrap_or("id");
                SortSpec::parse(field, order).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Build the typed filter. Empty parameters impose no constraint;
    /// numeric parameters that fail to parse are rejected.
    pub fn filter(&self) -> Result<CardFilter> {
        Ok(CardFilter {
            year: parse_int_param("year", &self.year)?,
            player: non_empty(&self.player),
            added_date: parse_date_param("addedDate", &self.added_date)?,
            manufacturer: non_empty(&self.manufacturer),
            card_set: non_empty(&self.card_set),
            subset: non_empty(&self.subset),
            card_type: non_empty(&self.card_type),
            on_card_code: non_empty(&self.on_card_code),
            sport: non_empty(&self.sport),
            tags: self
                .tags
                .as_deref()
                .and_then(card_common::validation::parse_tags),
            grade: non_empty(&self.grade),
            price_paid: parse_float_param("pricePaid", &self.price_paid)?,
            market_price: parse_float_param("marketPrice", &self.market_price)?,
            quantity: parse_int_param("quantity", &self.quantity)?,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_int_param(name: &str, value: &Option<String>) -> Result<Option<i64>> {
    match non_empty(value) {
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| StoreError::BadRequest(format!("{name} must be an integer: {raw}"))),
        None => Ok(None),
    }
}

/// Accepts `YYYY-MM-DD` or a full timestamp; keeps the day prefix.
fn parse_date_param(name: &str, value: &Option<String>) -> Result<Option<String>> {
    match non_empty(value) {
        Some(raw) => {
            let day: String = raw.chars().take(10).collect();
            chrono::NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|_| StoreError::BadRequest(format!("{name} must be a date: {raw}")))?;
            Ok(Some(day))
        }
        None => Ok(None),
    }
}

fn parse_float_param(name: &str, value: &Option<String>) -> Result<Option<f64>> {
    match non_empty(value) {
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| StoreError::BadRequest(format!("{name} must be a number: {raw}"))),
        None => Ok(None),
    }
}

/// Typed filter specification: one optional predicate per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardFilter {
    pub year: Option<i64>,
    pub player: Option<String>,
    pub added_date: Option<String>,
    pub manufacturer: Option<String>,
    pub card_set: Option<String>,
    pub subset: Option<String>,
    pub card_type: Option<String>,
    pub on_card_code: Option<String>,
    pub sport: Option<String>,
    pub tags: Option<Vec<String>>,
    pub grade: Option<String>,
    pub price_paid: Option<f64>,
    pub market_price: Option<f64>,
    pub quantity: Option<i64>,
}

impl CardFilter {
    /// Assemble the WHERE clause body and its bound parameters.
    ///
    /// Returns an empty string when no filter is set.
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(year) = self.year {
            clauses.push("year = ?".to_string());
            params.push(Value::Integer(year));
        }
        if let Some(quantity) = self.quantity {
            clauses.push("quantity = ?".to_string());
            params.push(Value::Integer(quantity));
        }
        if let Some(price) = self.price_paid {
            clauses.push("price_paid = ?".to_string());
            params.push(Value::Real(price));
        }
        if let Some(price) = self.market_price {
            clauses.push("market_price = ?".to_string());
            params.push(Value::Real(price));
        }

        substring_clause(&mut clauses, &mut params, "player", &self.player);
        substring_clause(&mut clauses, &mut params, "manufacturer", &self.manufacturer);
        substring_clause(&mut clauses, &mut params, "card_set", &self.card_set);
        substring_clause(&mut clauses, &mut params, "subset", &self.subset);
        substring_clause(&mut clauses, &mut params, "card_type", &self.card_type);
        substring_clause(&mut clauses, &mut params, "on_card_code", &self.on_card_code);
        substring_clause(&mut clauses, &mut params, "sport", &self.sport);
        substring_clause(&mut clauses, &mut params, "grade", &self.grade);

        if let Some(date) = &self.added_date {
            // Calendar-day match: compare the YYYY-MM-DD prefix of the
            // stored timestamp against the supplied date's prefix.
            clauses.push("substr(added_date, 1, 10) = ?".to_string());
            params.push(Value::Text(date.chars().take(10).collect()));
        }

        if let Some(tags) = &self.tags {
            let placeholders = vec!["?"; tags.len()].join(", ");
            clauses.push(format!(
                "(tags IS NOT NULL AND EXISTS (SELECT 1 FROM json_each(cards.tags) \
                 WHERE json_each.value IN ({placeholders})))"
            ));
            for tag in tags {
                params.push(Value::Text(tag.clone()));
            }
        }

        (clauses.join(" AND "), params)
    }

    pub fn is_empty(&self) -> bool {
        *self == CardFilter::default()
    }
}

fn substring_clause(
    clauses: &mut Vec<String>,
    params: &mut Vec<Value>,
    column: &str,
    value: &Option<String>,
) {
    if let Some(value) = value {
        clauses.push(format!("{column} LIKE ? COLLATE NOCASE"));
        params.push(Value::Text(format!("%{value}%")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_on_garbage() {
        let params = PageParams::from_raw(Some("abc"), Some("xyz"));
        assert_eq!(params, PageParams { page: 1, limit: 10 });

        let params = PageParams::from_raw(None, None);
        assert_eq!(params, PageParams { page: 1, limit: 10 });
    }

    #[test]
    fn page_params_clamp_out_of_range() {
        let params = PageParams::from_raw(Some("-2"), Some("0"));
        assert_eq!(params, PageParams { page: 1, limit: 1 });

        let params = PageParams::from_raw(Some("3"), Some("10000"));
        assert_eq!(params.page, 3);
        assert_eq!(params.limit, MAX_LIMIT);
    }

    #[test]
    fn offset_is_zero_based() {
        let params = PageParams::from_raw(Some("2"), Some("10"));
        assert_eq!(params.offset(), 10);
        assert_eq!(PageParams::default().offset(), 0);
    }

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("sideways"), None);
    }

    #[test]
    fn sort_spec_rejects_unknown_field() {
        assert!(SortSpec::parse("player", "ASC").is_ok());
        assert!(SortSpec::parse("addedDate", "desc").is_ok());
        assert!(SortSpec::parse("player; DROP TABLE cards", "ASC").is_err());
        assert!(SortSpec::parse("player", "UP").is_err());
    }

    #[test]
    fn sort_spec_maps_wire_names_to_columns() {
        let spec = SortSpec::parse("onCardCode", "ASC").unwrap();
        assert_eq!(spec.column, "on_card_code");
        assert_eq!(spec.order_by(), " ORDER BY on_card_code ASC");
    }

    #[test]
    fn page_query_without_order_does_not_sort() {
        let query = PageQuery {
            sort_field: Some("year".to_string()),
            ..PageQuery::default()
        };
        assert_eq!(query.sort().unwrap(), None);

        let query = PageQuery {
            sort_field: Some("year".to_string()),
            sort_order: Some("DESC".to_string()),
            ..PageQuery::default()
        };
        let spec = query.sort().unwrap().unwrap();
        assert_eq!(spec.column, "year");
        assert_eq!(spec.order, SortOrder::Desc);
    }

    #[test]
    fn empty_filter_produces_no_clause() {
        let (sql, params) = CardFilter::default().where_clause();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn substring_filters_use_like_nocase() {
        let filter = CardFilter {
            player: Some("Jordan".to_string()),
            ..CardFilter::default()
        };
        let (sql, params) = filter.where_clause();
        assert_eq!(sql, "player LIKE ? COLLATE NOCASE");
        assert_eq!(params, vec![Value::Text("%Jordan%".to_string())]);
    }

    #[test]
    fn tags_filter_binds_one_placeholder_per_tag() {
        let filter = CardFilter {
            tags: Some(vec!["Rookie".to_string(), "Auto".to_string()]),
            ..CardFilter::default()
        };
        let (sql, params) = filter.where_clause();
        assert!(sql.contains("json_each"));
        assert!(sql.contains("IN (?, ?)"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn added_date_filter_truncates_to_day() {
        let filter = CardFilter {
            added_date: Some("2024-06-08T15:30:00.000Z".to_string()),
            ..CardFilter::default()
        };
        let (sql, params) = filter.where_clause();
        assert_eq!(sql, "substr(added_date, 1, 10) = ?");
        assert_eq!(params, vec![Value::Text("2024-06-08".to_string())]);
    }

    #[test]
    fn search_params_reject_bad_numbers() {
        let params = SearchParams {
            year: Some("199x".to_string()),
            ..SearchParams::default()
        };
        assert!(params.filter().is_err());

        let params = SearchParams {
            price_paid: Some("cheap".to_string()),
            ..SearchParams::default()
        };
        assert!(params.filter().is_err());
    }

    #[test]
    fn search_params_reject_bad_dates() {
        let params = SearchParams {
            added_date: Some("last tuesday".to_string()),
            ..SearchParams::default()
        };
        assert!(params.filter().is_err());

        let params = SearchParams {
            added_date: Some("2024-06-08T15:30:00.000Z".to_string()),
            ..SearchParams::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(filter.added_date.as_deref(), Some("2024-06-08"));
    }

    #[test]
    fn search_params_treat_empty_as_absent() {
        let params = SearchParams {
            year: Some("".to_string()),
            player: Some("  ".to_string()),
            tags: Some("".to_string()),
            ..SearchParams::default()
        };
        let filter = params.filter().unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn search_params_split_tags() {
        let params = SearchParams {
            tags: Some("Rookie, Auto".to_string()),
            ..SearchParams::default()
        };
        let filter = params.filter().unwrap();
        assert_eq!(
            filter.tags,
            Some(vec!["Rookie".to_string(), "Auto".to_string()])
        );
    }
}
