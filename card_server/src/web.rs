//! REST API for the card ledger.
//!
//! CRUD, search, and the recent-players lookup over a shared SQLite
//! connection. List and search respond with the
//! `{ data, total, page, limit }` envelope; failures respond with
//! `{ error }` and a 400/404/500 status.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use card_common::{Card, CardInput, CardPage};

use crate::database;
use crate::error::StoreError;
use crate::query::{PageQuery, SearchParams};

/// Shared application state (thread-safe database connection)
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

/// Error envelope for failed requests
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Wrapper mapping store errors onto HTTP responses
struct ApiFailure(StoreError);

impl From<StoreError> for ApiFailure {
    fn from(err: StoreError) -> Self {
        ApiFailure(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::Validation(_) | StoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Database(e) => {
                log::error!("Database error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// GET /cards?page=&limit=&sortField=&sortOrder=
async fn list_cards_handler(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<CardPage>, ApiFailure> {
    let sort = params.sort()?;
    let page = params.page_params();
    let conn = state.db.lock().unwrap();
    let result = database::list_cards(&conn, &page, sort.as_ref())?;
    Ok(Json(result))
}

/// GET /search?player=&tags=&...&page=&limit=&sortField=&sortOrder=
async fn search_cards_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CardPage>, ApiFailure> {
    let filter = params.filter()?;
    let sort = params.sort()?;
    let page = params.page_params();
    let conn = state.db.lock().unwrap();
    let result = database::search_cards(&conn, &filter, &page, sort.as_ref())?;
    Ok(Json(result))
}

/// POST /cards - create a card, 201 with the stored record
async fn create_card_handler(
    State(state): State<AppState>,
    Json(input): Json<CardInput>,
) -> Result<(StatusCode, Json<Card>), ApiFailure> {
    let conn = state.db.lock().unwrap();
    let card = database::insert_card(&conn, &input)?;
    log::info!("Created card {} ({})", card.id, card.player);
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /cards/{id} - partial update, 200 with the updated record
async fn update_card_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CardInput>,
) -> Result<Json<Card>, ApiFailure> {
    let conn = state.db.lock().unwrap();
    let card = database::update_card(&conn, id, &input)?;
    log::info!("Updated card {}", id);
    Ok(Json(card))
}

/// DELETE /cards/{id} - 204 whether or not a row matched
async fn delete_card_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    let conn = state.db.lock().unwrap();
    database::delete_card(&conn, id)?;
    log::info!("Deleted card {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /cards/recent-players - up to 5 distinct players, newest first
async fn recent_players_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiFailure> {
    let conn = state.db.lock().unwrap();
    let players = database::recent_players(&conn)?;
    Ok(Json(players))
}

/// Build the API router
pub fn create_router(db: Arc<Mutex<Connection>>) -> Router {
    let state = AppState { db };

    Router::new()
        .route("/cards", get(list_cards_handler).post(create_card_handler))
        .route("/cards/recent-players", get(recent_players_handler))
        .route(
            "/cards/{id}",
            put(update_card_handler).delete(delete_card_handler),
        )
        .route("/search", get(search_cards_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server (async)
///
/// Binds to 0.0.0.0 so the desktop client can reach it from another
/// machine on the network; restrict exposure with firewall rules.
pub async fn serve(db: Arc<Mutex<Connection>>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(db);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Card ledger API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
