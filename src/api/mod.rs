use crate::adapters::supabase::SupabaseClient;
use crate::common::context::Context;
use crate::common::error;
use crate::common::state::AppState;
use crate::settings::AppSettings;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{get, post};
use std::convert::Infallible;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod messages;

pub struct RequestContext {
    pub supabase: SupabaseClient,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/messages", get(messages::list_recent))
        .route("/add-test", get(messages::add_test))
        .route("/message", post(messages::create))
}

pub fn with_layers(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
}

pub fn app(state: AppState) -> Router {
    with_layers(router()).with_state(state)
}

pub async fn serve(settings: &AppSettings, state: AppState) -> anyhow::Result<()> {
    info!(supabase = %state.supabase.rest_url(), "Supabase client ready");

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    info!("Server started on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

pub async fn index() -> &'static str {
    "TradesAI + Supabase server is running ✅"
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            supabase: state.supabase.clone(),
        })
    }
}

impl Context for RequestContext {
    fn supabase(&self) -> &SupabaseClient {
        &self.supabase
    }
}
