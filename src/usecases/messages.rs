use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::entities::messages::Message;
use crate::models::messages::NewMessage;
use crate::repositories::messages;
use tracing::{error, info};

/// Upper bound on how many messages a single read returns.
pub const RECENT_MESSAGES_LIMIT: usize = 20;

pub async fn fetch_recent<C: Context>(ctx: &C, limit: usize) -> ServiceResult<Vec<Message>> {
    let limit = limit.min(RECENT_MESSAGES_LIMIT);
    match messages::fetch_recent(ctx, limit).await {
        Ok(mut messages) => {
            messages.truncate(limit);
            Ok(messages)
        }
        Err(e) => {
            error!(error = ?e, "Supabase select error");
            Err(AppError::MessagesFetchFailed)
        }
    }
}

/// Writes the message and returns the rows the store created.
pub async fn save<C: Context>(ctx: &C, message: &NewMessage) -> ServiceResult<Vec<Message>> {
    match messages::create_returning(ctx, &message.from, &message.text).await {
        Ok(saved) => {
            info!(from = %message.from, saved = saved.len(), "Saved message");
            Ok(saved)
        }
        Err(e) => {
            error!(error = ?e, "Supabase insert error");
            Err(AppError::MessagesSaveFailed)
        }
    }
}

/// Writes the message without asking the store to echo it back.
pub async fn save_quietly<C: Context>(ctx: &C, message: &NewMessage) -> ServiceResult<()> {
    match messages::create(ctx, &message.from, &message.text).await {
        Ok(()) => {
            info!(from = %message.from, "Saved message");
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "Supabase insert error");
            Err(AppError::MessagesSaveFailed)
        }
    }
}

pub async fn save_test_message<C: Context>(ctx: &C) -> ServiceResult<Vec<Message>> {
    save(ctx, &NewMessage::test_message()).await
}
