//! Database operations for the card ledger.
//!
//! Uses parameterized queries exclusively (no SQL string concatenation
//! of values). Tags are stored as a JSON array in a TEXT column and
//! matched with `json_each`.

use std::collections::HashSet;

use rusqlite::{params, params_from_iter, types::Value, Connection, Row};

use card_common::models::now_rfc3339;
use card_common::validation::validate_input;
use card_common::{Card, CardInput, CardPage};

use crate::error::{Result, StoreError};
use crate::query::{CardFilter, PageParams, SortSpec};

/// Column list shared by every SELECT, in `row_to_card` order.
const CARD_COLUMNS: &str = "id, year, player, added_date, manufacturer, card_set, subset, \
     card_type, on_card_code, sport, tags, notes, grade, price_paid, market_price, quantity";

/// Initialize the database schema
///
/// Creates the `cards` table if it doesn't exist, plus indexes on the
/// columns the client sorts and filters by most.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER NOT NULL,
            player TEXT NOT NULL,
            added_date TEXT NOT NULL,
            manufacturer TEXT NOT NULL,
            card_set TEXT,
            subset TEXT,
            card_type TEXT NOT NULL,
            on_card_code TEXT NOT NULL,
            sport TEXT NOT NULL,
            tags TEXT,
            notes TEXT,
            grade TEXT,
            price_paid REAL,
            market_price REAL,
            quantity INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_cards_player ON cards(player);
        CREATE INDEX IF NOT EXISTS idx_cards_added_date ON cards(added_date);
        ",
    )?;

    log::info!("Database schema initialized");
    Ok(())
}

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    let tags_json: Option<String> = row.get(10)?;
    Ok(Card {
        id: row.get(0)?,
        year: row.get(1)?,
        player: row.get(2)?,
        added_date: row.get(3)?,
        manufacturer: row.get(4)?,
        card_set: row.get(5)?,
        subset: row.get(6)?,
        card_type: row.get(7)?,
        on_card_code: row.get(8)?,
        sport: row.get(9)?,
        tags: tags_json.and_then(|json| serde_json::from_str(&json).ok()),
        notes: row.get(11)?,
        grade: row.get(12)?,
        price_paid: row.get(13)?,
        market_price: row.get(14)?,
        quantity: row.get(15)?,
    })
}

fn tags_to_json(tags: &Option<Vec<String>>) -> Option<String> {
    tags.as_ref()
        .map(|tags| serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string()))
}

/// Insert a new card.
///
/// Required fields are validated up front (per-field error map, nothing
/// written on failure); `quantity` defaults to 1 and `added_date` to
/// the current time. Returns the stored record with its generated id.
pub fn insert_card(conn: &Connection, input: &CardInput) -> Result<Card> {
    validate_input(input).into_result()?;

    let added_date = input
        .added_date
        .clone()
        .unwrap_or_else(now_rfc3339);
    let quantity = input.quantity.unwrap_or(1);

    conn.execute(
        "INSERT INTO cards
         (year, player, added_date, manufacturer, card_set, subset, card_type,
          on_card_code, sport, tags, notes, grade, price_paid, market_price, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            input.year,
            input.player,
            added_date,
            input.manufacturer,
            input.card_set,
            input.subset,
            input.card_type,
            input.on_card_code,
            input.sport,
            tags_to_json(&input.tags),
            input.notes,
            input.grade,
            input.price_paid,
            input.market_price,
            quantity,
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::debug!("Inserted card {} ({})", id, input.player.as_deref().unwrap_or(""));
    get_card(conn, id)?.ok_or(StoreError::NotFound(id))
}

/// Fetch a single card by id.
pub fn get_card(conn: &Connection, id: i64) -> Result<Option<Card>> {
    let sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_card(row)?)),
        None => Ok(None),
    }
}

/// List a page of cards with no filter applied.
pub fn list_cards(conn: &Connection, page: &PageParams, sort: Option<&SortSpec>) -> Result<CardPage> {
    search_cards(conn, &CardFilter::default(), page, sort)
}

/// Search cards with the given filter, returning one page plus the
/// pre-pagination match count.
pub fn search_cards(
    conn: &Connection,
    filter: &CardFilter,
    page: &PageParams,
    sort: Option<&SortSpec>,
) -> Result<CardPage> {
    let (where_body, params) = filter.where_clause();
    let where_frag = if where_body.is_empty() {
        String::new()
    } else {
        format!(" WHERE {where_body}")
    };

    let count_sql = format!("SELECT COUNT(*) FROM cards{where_frag}");
    let total: i64 = conn.query_row(&count_sql, params_from_iter(params.iter()), |row| row.get(0))?;

    // Insertion order when no sort is requested, so pages are stable
    let order_frag = sort
        .map(SortSpec::order_by)
        .unwrap_or_else(|| " ORDER BY id".to_string());
    let select_sql =
        format!("SELECT {CARD_COLUMNS} FROM cards{where_frag}{order_frag} LIMIT ? OFFSET ?");

    let mut select_params = params;
    select_params.push(Value::Integer(page.limit));
    select_params.push(Value::Integer(page.offset()));

    let mut stmt = conn.prepare(&select_sql)?;
    let data = stmt
        .query_map(params_from_iter(select_params.iter()), row_to_card)?
        .collect::<rusqlite::Result<Vec<Card>>>()?;

    Ok(CardPage {
        data,
        total,
        page: page.page,
        limit: page.limit,
    })
}

/// Apply a partial update: only supplied fields change, everything else
/// keeps its stored value. Fails with `NotFound` when the id does not
/// exist.
pub fn update_card(conn: &Connection, id: i64, input: &CardInput) -> Result<Card> {
    let existing = get_card(conn, id)?.ok_or(StoreError::NotFound(id))?;

    let mut sets: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    fn set(column: &str, value: Value, params: &mut Vec<Value>, sets: &mut Vec<String>) {
        sets.push(format!("{column} = ?"));
        params.push(value);
    }

    if let Some(year) = input.year {
        set("year", Value::Integer(year), &mut params, &mut sets);
    }
    if let Some(player) = &input.player {
        set("player", Value::Text(player.clone()), &mut params, &mut sets);
    }
    if let Some(date) = &input.added_date {
        set("added_date", Value::Text(date.clone()), &mut params, &mut sets);
    }
    if let Some(manufacturer) = &input.manufacturer {
        set("manufacturer", Value::Text(manufacturer.clone()), &mut params, &mut sets);
    }
    if let Some(card_set) = &input.card_set {
        set("card_set", Value::Text(card_set.clone()), &mut params, &mut sets);
    }
    if let Some(subset) = &input.subset {
        set("subset", Value::Text(subset.clone()), &mut params, &mut sets);
    }
    if let Some(card_type) = &input.card_type {
        set("card_type", Value::Text(card_type.clone()), &mut params, &mut sets);
    }
    if let Some(code) = &input.on_card_code {
        set("on_card_code", Value::Text(code.clone()), &mut params, &mut sets);
    }
    if let Some(sport) = &input.sport {
        set("sport", Value::Text(sport.clone()), &mut params, &mut sets);
    }
    if let Some(json) = tags_to_json(&input.tags) {
        set("tags", Value::Text(json), &mut params, &mut sets);
    }
    if let Some(notes) = &input.notes {
        set("notes", Value::Text(notes.clone()), &mut params, &mut sets);
    }
    if let Some(grade) = &input.grade {
        set("grade", Value::Text(grade.clone()), &mut params, &mut sets);
    }
    if let Some(price) = input.price_paid {
        set("price_paid", Value::Real(price), &mut params, &mut sets);
    }
    if let Some(price) = input.market_price {
        set("market_price", Value::Real(price), &mut params, &mut sets);
    }
    if let Some(quantity) = input.quantity {
        set("quantity", Value::Integer(quantity), &mut params, &mut sets);
    }

    if sets.is_empty() {
        return Ok(existing);
    }

    let sql = format!("UPDATE cards SET {} WHERE id = ?", sets.join(", "));
    params.push(Value::Integer(id));
    conn.execute(&sql, params_from_iter(params.iter()))?;

    log::debug!("Updated card {} ({} fields)", id, sets.len());
    get_card(conn, id)?.ok_or(StoreError::NotFound(id))
}

/// Delete a card by id.
///
/// Deleting a missing id is a silent success (idempotent delete).
pub fn delete_card(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
    if affected == 0 {
        log::debug!("Delete of card {} matched no row", id);
    }
    Ok(())
}

/// Up to 5 distinct player names, most recently added first.
///
/// Deduplicated by first occurrence while scanning in `added_date`
/// descending order.
pub fn recent_players(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT player FROM cards ORDER BY added_date DESC, id DESC")?;
    let mut rows = stmt.query([])?;

    let mut seen = HashSet::new();
    let mut players = Vec::new();
    while let Some(row) = rows.next()? {
        let player: String = row.get(0)?;
        if seen.insert(player.clone()) {
            players.push(player);
            if players.len() == 5 {
                break;
            }
        }
    }
    Ok(players)
}

/// Total number of cards in the store.
pub fn count_cards(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
    Ok(count)
}
