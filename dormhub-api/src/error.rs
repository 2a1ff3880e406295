use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dormhub_assistant::AssistantError;
use dormhub_booking::BookingError;
use dormhub_core::FieldError;
use dormhub_listing::model::ListingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Authentication(String),
    Authorization(String),
    Validation(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    Upstream(AssistantError),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg })))
            }
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, Json(json!({ "error": msg }))),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation failed", "fields": fields })),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, Json(json!({ "error": msg }))),
            AppError::Upstream(err) => {
                // Upstream detail is logged, never shown to the end user.
                tracing::error!("Assistant upstream failure: {:?}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "could not get a response" })),
                )
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
            }
        };

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotAuthorized(msg) => AppError::Authorization(msg),
            BookingError::BookingNotFound(id) => AppError::NotFound(format!("booking {}", id)),
            BookingError::ListingNotFound(id) => AppError::NotFound(format!("hostel {}", id)),
            err @ BookingError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            err @ BookingError::DuplicateRequest => AppError::Conflict(err.to_string()),
            BookingError::Storage(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<ListingError> for AppError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::NotAuthorized(msg) => AppError::Authorization(msg),
            ListingError::NotFound(id) => AppError::NotFound(format!("hostel {}", id)),
            ListingError::Validation(fields) => AppError::Validation(fields),
            ListingError::Storage(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        AppError::Upstream(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
