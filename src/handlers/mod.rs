use axum::{http::Method, Json};

use crate::dto::MessageResponse;
use crate::error::AppError;

pub mod auth;
pub mod entries;
pub mod health;

/// OPTIONS acknowledgement, also used to answer browser pre-flights.
pub async fn acknowledge_options() -> Json<MessageResponse> {
    Json(MessageResponse::new("OK"))
}

/// Method fallback for `/auth` and `/entries`: 400 rather than 405.
pub async fn unsupported_method(method: Method) -> AppError {
    tracing::debug!(method = %method, "Rejected unsupported method");
    AppError::InvalidMethod
}
