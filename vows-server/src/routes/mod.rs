pub mod admin;
pub mod events;
pub mod photos;
pub mod registry;
pub mod rsvp;
pub mod site;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use vows_core::{FieldError, VowsError};

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            details: None,
            retryable: None,
        }
    }
}

/// Convert anyhow errors to HTTP responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0.downcast_ref::<VowsError>() {
            Some(VowsError::Validation(fields)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: Some(fields.clone()),
                    ..ErrorResponse::new("Invalid form data")
                },
            ),
            Some(VowsError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(format!("{what} not found")))
            }
            Some(err @ VowsError::Conflict(_)) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    retryable: Some(err.is_retryable()),
                    ..ErrorResponse::new("The request conflicted with another change, please retry")
                },
            ),
            Some(VowsError::Payment(reason)) => {
                error!("Payment provider request failed: {}", reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Cash gifts are unavailable right now"),
                )
            }
            Some(VowsError::Encoding(reason)) => {
                error!("Calendar generation failed: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Failed to generate calendar file"),
                )
            }
            _ => {
                error!("Request failed: {:#}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// `{ "success": true }` with optional extra fields flattened in.
#[derive(Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Success {
            success: true,
            data,
        })
    }
}
