use crate::common::error::{AppError, ServiceResult};
use crate::entities::messages::Message;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

pub const TEST_MESSAGE_SENDER: &str = "Andy";
pub const TEST_MESSAGE_TEXT: &str = "Test message from /add-test";

#[derive(Debug, Default, Deserialize)]
pub struct NewMessageArgs {
    pub from: Option<String>,
    pub text: Option<String>,
}

/// A message that passed validation and may be written to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub from: String,
    pub text: String,
}

impl NewMessage {
    pub fn test_message() -> Self {
        Self {
            from: TEST_MESSAGE_SENDER.to_owned(),
            text: TEST_MESSAGE_TEXT.to_owned(),
        }
    }
}

impl TryFrom<NewMessageArgs> for NewMessage {
    type Error = AppError;

    fn try_from(args: NewMessageArgs) -> ServiceResult<Self> {
        match (args.from, args.text) {
            (Some(from), Some(text)) if !from.is_empty() && !text.is_empty() => {
                Ok(Self { from, text })
            }
            _ => Err(AppError::MessagesMissingFields),
        }
    }
}

impl<S: Send + Sync> FromRequest<S> for NewMessage {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Only objects are accepted; serde would otherwise map arrays by position.
        let body = match Json::<Map<String, Value>>::from_request(req, state).await {
            Ok(Json(body)) => body,
            // Bodies sent without a JSON content type are treated as empty.
            Err(JsonRejection::MissingJsonContentType(_)) => Map::new(),
            Err(rejection) => {
                warn!(reason = %rejection.body_text(), "Rejected message body");
                return Err(AppError::DecodingRequestFailed);
            }
        };
        let args: NewMessageArgs = match serde_json::from_value(Value::Object(body)) {
            Ok(args) => args,
            Err(e) => {
                warn!(reason = %e, "Rejected message body");
                return Err(AppError::DecodingRequestFailed);
            }
        };
        match NewMessage::try_from(args) {
            Ok(message) => Ok(message),
            Err(e) => {
                warn!("Rejected message without 'from' or 'text'");
                Err(e)
            }
        }
    }
}

#[derive(Serialize)]
pub struct MessagesResponse {
    pub ok: bool,
    pub messages: Vec<Message>,
}

impl MessagesResponse {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { ok: true, messages }
    }
}

#[derive(Serialize)]
pub struct SavedResponse {
    pub ok: bool,
    pub saved: Vec<Message>,
}

impl SavedResponse {
    pub fn new(saved: Vec<Message>) -> Self {
        Self { ok: true, saved }
    }
}
