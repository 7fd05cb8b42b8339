use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::models::messages::{MessagesResponse, NewMessage, SavedResponse};
use crate::usecases::messages::{self, RECENT_MESSAGES_LIMIT};
use axum::Json;
use tracing::info;

pub async fn list_recent(ctx: RequestContext) -> ServiceResponse<MessagesResponse> {
    let messages = messages::fetch_recent(&ctx, RECENT_MESSAGES_LIMIT).await?;
    info!(count = messages.len(), "Fetched recent messages");
    Ok(Json(MessagesResponse::new(messages)))
}

pub async fn add_test(ctx: RequestContext) -> ServiceResponse<SavedResponse> {
    let saved = messages::save_test_message(&ctx).await?;
    info!("✅ Saved test message");
    Ok(Json(SavedResponse::new(saved)))
}

pub async fn create(ctx: RequestContext, message: NewMessage) -> ServiceResponse<SavedResponse> {
    let saved = messages::save(&ctx, &message).await?;
    Ok(Json(SavedResponse::new(saved)))
}
