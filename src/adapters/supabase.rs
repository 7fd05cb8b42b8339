//! PostgREST client for a Supabase project.
//!
//! Every call is a single round trip. Nothing is retried or cached, and the
//! client is immutable once built.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

const REST_PATH: &str = "rest/v1/";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid supabase configuration: {0}")]
    Config(String),
    #[error("request to supabase failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("supabase responded with {status}: {message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },
    #[error("failed to decode supabase response: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Error body as PostgREST renders it.
#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl StoreError {
    fn from_response_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(api_error) => StoreError::Api {
                status,
                code: api_error.code,
                message: api_error
                    .message
                    .unwrap_or_else(|| fallback_message(status, body)),
                details: api_error.details,
                hint: api_error.hint,
            },
            Err(_) => StoreError::Api {
                status,
                code: None,
                message: fallback_message(status, body),
                details: None,
                hint: None,
            },
        }
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
        body => body.to_owned(),
    }
}

/// `select` query for a single table.
#[derive(Clone, Debug)]
pub struct Select<'a> {
    columns: &'a str,
    order_desc: Option<&'a str>,
    limit: Option<usize>,
}

impl<'a> Select<'a> {
    pub fn all() -> Self {
        Self {
            columns: "*",
            order_desc: None,
            limit: None,
        }
    }

    /// Largest values of `column` first.
    pub fn order_desc(mut self, column: &'a str) -> Self {
        self.order_desc = Some(column);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("select", self.columns.to_owned())];
        if let Some(column) = self.order_desc {
            pairs.push(("order", format!("{column}.desc")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Copy, Clone)]
enum Returning {
    Minimal,
    Representation,
}

impl Returning {
    const fn prefer_header(self) -> &'static str {
        match self {
            Returning::Minimal => "return=minimal",
            Returning::Representation => "return=representation",
        }
    }
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: Url,
}

impl SupabaseClient {
    pub fn new(project_url: &str, service_role_key: &str) -> StoreResult<Self> {
        let mut base = Url::parse(project_url)
            .map_err(|e| StoreError::Config(format!("invalid project url: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join(REST_PATH)
            .map_err(|e| StoreError::Config(format!("invalid project url: {e}")))?;

        let mut apikey = HeaderValue::from_str(service_role_key)
            .map_err(|_| StoreError::Config("service role key is not a valid header".into()))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {service_role_key}"))
            .map_err(|_| StoreError::Config("service role key is not a valid header".into()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { http, rest_url })
    }

    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    fn table_url(&self, table: &str) -> StoreResult<Url> {
        self.rest_url
            .join(table)
            .map_err(|e| StoreError::Config(format!("invalid table name {table:?}: {e}")))
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Select<'_>,
    ) -> StoreResult<Vec<T>> {
        let url = self.table_url(table)?;
        let request = self.http.get(url).query(&query.query_pairs());
        let response = execute(request).await?;
        response.json().await.map_err(StoreError::Decode)
    }

    pub async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> StoreResult<()> {
        self.send_insert(table, rows, Returning::Minimal).await?;
        Ok(())
    }

    pub async fn insert_returning<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        rows: &[T],
    ) -> StoreResult<Vec<R>> {
        let response = self
            .send_insert(table, rows, Returning::Representation)
            .await?;
        response.json().await.map_err(StoreError::Decode)
    }

    async fn send_insert<T: Serialize>(
        &self,
        table: &str,
        rows: &[T],
        returning: Returning,
    ) -> StoreResult<Response> {
        let url = self.table_url(table)?;
        let request = self
            .http
            .post(url)
            .header("Prefer", returning.prefer_header())
            .json(rows);
        execute(request).await
    }
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rest_url", &self.rest_url.as_str())
            .finish_non_exhaustive()
    }
}

async fn execute(request: RequestBuilder) -> StoreResult<Response> {
    let response = request.send().await.map_err(StoreError::Transport)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::from_response_body(status, &body))
}
