//! HTTP client for the card ledger API.
//!
//! Thin blocking wrapper over reqwest; every method maps one endpoint.
//! Error responses carry the server's `{ "error": ... }` message.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use card_common::{Card, CardInput, CardPage};

use crate::error::{ApiError, ApiResult};

/// Default server address when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the card ledger REST API
pub struct CardApi {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl CardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /cards - one page of the whole collection
    pub fn list_cards(
        &self,
        page: i64,
        limit: i64,
        sort: Option<(&str, &str)>,
    ) -> ApiResult<CardPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some((field, order)) = sort {
            query.push(("sortField", field.to_string()));
            query.push(("sortOrder", order.to_string()));
        }

        debug!("GET /cards page={page} limit={limit}");
        let response = self
            .client
            .get(format!("{}/cards", self.base_url))
            .query(&query)
            .send()?;
        read_json(response)
    }

    /// GET /search - one page matching the given filter pairs
    ///
    /// `filters` holds (wire field name, value) pairs; empty values are
    /// skipped so they impose no constraint.
    pub fn search_cards(
        &self,
        filters: &[(&str, String)],
        page: i64,
        limit: i64,
        sort: Option<(&str, &str)>,
    ) -> ApiResult<CardPage> {
        let mut query: Vec<(&str, String)> = filters
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (*name, value.clone()))
            .collect();
        query.push(("page", page.to_string()));
        query.push(("limit", limit.to_string()));
        if let Some((field, order)) = sort {
            query.push(("sortField", field.to_string()));
            query.push(("sortOrder", order.to_string()));
        }

        debug!("GET /search with {} filter(s)", filters.len());
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&query)
            .send()?;
        read_json(response)
    }

    /// POST /cards - create a card
    pub fn create_card(&self, input: &CardInput) -> ApiResult<Card> {
        let response = self
            .client
            .post(format!("{}/cards", self.base_url))
            .json(input)
            .send()?;
        read_json(response)
    }

    /// PUT /cards/{id} - partial update
    pub fn update_card(&self, id: i64, input: &CardInput) -> ApiResult<Card> {
        let response = self
            .client
            .put(format!("{}/cards/{}", self.base_url, id))
            .json(input)
            .send()?;
        read_json(response)
    }

    /// DELETE /cards/{id}
    pub fn delete_card(&self, id: i64) -> ApiResult<()> {
        let response = self
            .client
            .delete(format!("{}/cards/{}", self.base_url, id))
            .send()?;
        expect_success(response)?;
        Ok(())
    }

    /// GET /cards/recent-players - up to 5 distinct recent player names
    pub fn recent_players(&self) -> ApiResult<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/cards/recent-players", self.base_url))
            .send()?;
        read_json(response)
    }
}

/// Turn a non-success response into `ApiError::Server`, extracting the
/// `{ "error": ... }` message when the body carries one.
fn expect_success(
    response: reqwest::blocking::Response,
) -> ApiResult<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

fn read_json<T: DeserializeOwned>(response: reqwest::blocking::Response) -> ApiResult<T> {
    let response = expect_success(response)?;
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}
