use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    let e = e.into();
    error!("An unexpected error has occurred at {caller}: {e:#}");
    Err(AppError::Unexpected(e.to_string()))
}

#[derive(Debug)]
pub enum AppError {
    /// Carries the error text, which is surfaced to the client as is.
    Unexpected(String),
    DecodingRequestFailed,

    MessagesMissingFields,
    MessagesFetchFailed,
    MessagesSaveFailed,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected(_) => "unexpected",
            AppError::DecodingRequestFailed => "decoding_request_failed",

            AppError::MessagesMissingFields => "messages.missing_fields",
            AppError::MessagesFetchFailed => "messages.fetch_failed",
            AppError::MessagesSaveFailed => "messages.save_failed",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Unexpected(message) => message,
            AppError::DecodingRequestFailed => "Failed to decode request",

            AppError::MessagesMissingFields => "Missing 'from' or 'text'",
            AppError::MessagesFetchFailed => "Failed to fetch messages",
            AppError::MessagesSaveFailed => "Failed to save message",
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed | AppError::MessagesMissingFields => {
                StatusCode::BAD_REQUEST
            }

            AppError::Unexpected(_)
            | AppError::MessagesFetchFailed
            | AppError::MessagesSaveFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn response_parts(&self) -> (StatusCode, Json<ErrorResponse<'_>>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            ok: false,
            error: self.message(),
        };
        (status, Json(response))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub ok: bool,
    pub error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}

/// Turns a handler panic into the regular error envelope.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic message".to_owned()
    };
    error!(detail = %detail, "A request handler panicked");
    AppError::Unexpected(detail).into_response()
}
