//! Supabase (PostgREST) client for the book table.
//!
//! Every request carries the project's anon key both as `apikey` and as a
//! bearer token. Lists are ordered by `created_at` descending on the server.

use futures::future::BoxFuture;
use reqwest::{header, Client, Method, Url};
use std::time::Duration;

use tbm_core::{BookId, BookRecord, SearchField, SearchFilters, StoreError, StoreSection};

use crate::store::{BooksFuture, RecordStore};

const ORDER_NEWEST_FIRST: &str = "created_at.desc";

/// REST client for one table.
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    endpoint: Url,
    anon_key: String,
}

impl PostgrestStore {
    /// Build a client from the `[store]` section.
    pub fn from_config(config: &StoreSection) -> Result<Self, StoreError> {
        let (Some(url), Some(key)) = (config.url.as_deref(), config.anon_key.as_deref()) else {
            return Err(StoreError::NotConfigured);
        };
        if !config.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        Self::new(url, key, &config.table, config.timeout())
    }

    /// Create a client for `{base_url}/rest/v1/{table}`.
    pub fn new(
        base_url: &str,
        anon_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let endpoint = Url::parse(&format!(
            "{}/rest/v1/{}",
            base_url.trim_end_matches('/'),
            table
        ))
        .map_err(|e| StoreError::Transport(format!("invalid store URL: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            anon_key: anon_key.to_string(),
        })
    }

    /// The table URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method, params: &[(String, String)]) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint.clone())
            .query(params)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn rows(&self, params: Vec<(String, String)>) -> BooksFuture {
        let request = self.request(Method::GET, &params);
        Box::pin(async move {
            tracing::debug!("GET rows with {:?}", params);
            let response = request.send().await.map_err(transport_error)?;
            let response = check_status(response).await?;
            response
                .json::<Vec<BookRecord>>()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))
        })
    }
}

impl RecordStore for PostgrestStore {
    fn fetch_all(&self) -> BooksFuture {
        self.rows(list_params())
    }

    fn fetch_by_location(&self, location: &str) -> BooksFuture {
        let mut params = list_params();
        params.push(eq_param(SearchField::Location.column(), location));
        self.rows(params)
    }

    fn fetch_by_id(
        &self,
        id: &BookId,
    ) -> BoxFuture<'static, Result<Option<BookRecord>, StoreError>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            eq_param("id", &id.as_text()),
            ("limit".to_string(), "1".to_string()),
        ];
        let rows = self.rows(params);
        Box::pin(async move { rows.await.map(first_row) })
    }

    fn search(&self, term: &str, filters: &SearchFilters) -> BooksFuture {
        self.rows(search_params(term, filters))
    }

    fn count(&self) -> BoxFuture<'static, Result<u64, StoreError>> {
        let params = vec![("select".to_string(), "*".to_string())];
        let request = self
            .request(Method::HEAD, &params)
            .header("Prefer", "count=exact");

        Box::pin(async move {
            let response = request.send().await.map_err(transport_error)?;
            let response = check_status(response).await?;
            let range = response
                .headers()
                .get(header::CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| StoreError::Decode("missing Content-Range header".to_string()))?;
            parse_content_range_total(range)
        })
    }
}

// =============================================================================
// Query Building
// =============================================================================

fn list_params() -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "*".to_string()),
        ("order".to_string(), ORDER_NEWEST_FIRST.to_string()),
    ]
}

fn eq_param(column: &str, value: &str) -> (String, String) {
    (column.to_string(), format!("eq.{value}"))
}

/// Quote a value for use inside a PostgREST logic tree.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Parameters for a filtered search.
fn search_params(term: &str, filters: &SearchFilters) -> Vec<(String, String)> {
    let mut params = list_params();

    if !term.is_empty() {
        let pattern = quote(&format!("*{term}*"));
        let clauses: Vec<String> = SearchField::ALL
            .iter()
            .map(|field| format!("{}.ilike.{}", field.column(), pattern))
            .collect();
        params.push(("or".to_string(), format!("({})", clauses.join(","))));
    }
    if let Some(genre) = &filters.genre {
        params.push(eq_param(SearchField::Genre.column(), genre));
    }
    if let Some(kind) = &filters.kind {
        params.push(eq_param(SearchField::Type.column(), kind));
    }
    if let Some(site) = filters.location.site() {
        params.push(eq_param(SearchField::Location.column(), site));
    }

    params
}

/// The single row of a by-id lookup. An empty array means no such book.
fn first_row(rows: Vec<BookRecord>) -> Option<BookRecord> {
    rows.into_iter().next()
}

/// Total from a `Content-Range` value such as `0-24/738` or `*/0`.
fn parse_content_range_total(value: &str) -> Result<u64, StoreError> {
    value
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .ok_or_else(|| StoreError::Decode(format!("unreadable Content-Range: {value}")))
}

// =============================================================================
// Response Handling
// =============================================================================

fn transport_error(error: reqwest::Error) -> StoreError {
    StoreError::Transport(error.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Store returned {}: {}", status, body);
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}
