//! In-process stand-in for a Supabase PostgREST endpoint.
#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tradesai_relay::adapters::supabase::SupabaseClient;
use tradesai_relay::common::state::AppState;

pub const SERVICE_KEY: &str = "test-service-role-key";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Healthy,
    /// Every request fails with a PostgREST error body.
    Failing,
    /// Successful status with a body that is not JSON.
    Garbage,
    /// Serves every row regardless of the `limit` parameter.
    IgnoresLimit,
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub query: HashMap<String, String>,
    pub prefer: Option<String>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Map<String, Value>>,
    next_id: i64,
    mode: Mode,
    requests: Vec<RecordedRequest>,
}

impl Inner {
    fn store(&mut self, mut row: Map<String, Value>) -> Map<String, Value> {
        self.next_id += 1;
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(self.next_id);
        row.insert("id".into(), json!(self.next_id));
        row.insert(
            "created_at".into(),
            json!(created_at.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()),
        );
        self.rows.push(row.clone());
        row
    }

    fn record(&mut self, method: &'static str, headers: &HeaderMap, query: HashMap<String, String>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        self.requests.push(RecordedRequest {
            method,
            query,
            prefer: header("prefer"),
            apikey: header("apikey"),
            authorization: header("authorization"),
        });
    }

    fn reject(&self, headers: &HeaderMap) -> Option<Response> {
        let expected_bearer = format!("Bearer {SERVICE_KEY}");
        let authorized = headers.get("apikey").is_some_and(|v| v == SERVICE_KEY)
            && headers
                .get("authorization")
                .is_some_and(|v| v == expected_bearer.as_str());
        if !authorized {
            let body = json!({ "message": "Invalid API key", "hint": "Double check your Supabase `anon` or `service_role` API key." });
            return Some((StatusCode::UNAUTHORIZED, Json(body)).into_response());
        }
        match self.mode {
            Mode::Failing => {
                let body = json!({
                    "code": "XX000",
                    "details": null,
                    "hint": null,
                    "message": "database is on fire",
                });
                Some((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
            }
            Mode::Garbage => Some((StatusCode::OK, "<html>maintenance</html>").into_response()),
            Mode::Healthy | Mode::IgnoresLimit => None,
        }
    }
}

#[derive(Clone)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
    pub base_url: String,
}

impl MockStore {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let store = Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            base_url,
        };
        let app = Router::new()
            .route("/rest/v1/messages", get(select_rows).post(insert_rows))
            .with_state(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        store
    }

    pub fn set_mode(&self, mode: Mode) {
        self.inner.lock().unwrap().mode = mode;
    }

    pub fn seed(&self, from: &str, text: &str) {
        let mut row = Map::new();
        row.insert("from".into(), json!(from));
        row.insert("text".into(), json!(text));
        self.inner.lock().unwrap().store(row);
    }

    /// Stores an arbitrary row, bypassing the not-null checks of the insert route.
    pub fn seed_row(&self, row: Value) {
        let Value::Object(row) = row else {
            panic!("rows must be objects");
        };
        self.inner.lock().unwrap().store(row);
    }

    pub fn rows(&self) -> Vec<Map<String, Value>> {
        self.inner.lock().unwrap().rows.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn client(&self) -> SupabaseClient {
        SupabaseClient::new(&self.base_url, SERVICE_KEY).unwrap()
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            supabase: self.client(),
        }
    }
}

/// Address nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn select_rows(
    State(store): State<MockStore>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut inner = store.inner.lock().unwrap();
    inner.record("GET", &headers, query.clone());
    if let Some(response) = inner.reject(&headers) {
        return response;
    }

    let mut rows = inner.rows.clone();
    // Fixed-width timestamps, so string order is time order.
    rows.sort_by(|a, b| a["created_at"].as_str().cmp(&b["created_at"].as_str()));
    if query.get("order").map(String::as_str) == Some("created_at.desc") {
        rows.reverse();
    }
    if inner.mode != Mode::IgnoresLimit {
        if let Some(limit) = query.get("limit").and_then(|l| l.parse().ok()) {
            rows.truncate(limit);
        }
    }
    Json(rows).into_response()
}

async fn insert_rows(
    State(store): State<MockStore>,
    headers: HeaderMap,
    Json(rows): Json<Vec<Map<String, Value>>>,
) -> Response {
    let mut inner = store.inner.lock().unwrap();
    inner.record("POST", &headers, HashMap::new());
    if let Some(response) = inner.reject(&headers) {
        return response;
    }

    for row in &rows {
        for column in ["from", "text"] {
            if row.get(column).is_none_or(Value::is_null) {
                let body = json!({
                    "code": "23502",
                    "details": null,
                    "hint": null,
                    "message": format!("null value in column \"{column}\" of relation \"messages\" violates not-null constraint"),
                });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        }
    }
    let inserted: Vec<_> = rows.into_iter().map(|row| inner.store(row)).collect();

    let wants_rows = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("return=representation"));
    if wants_rows {
        (StatusCode::CREATED, Json(inserted)).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}
