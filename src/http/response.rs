//! Error responses.
//!
//! Every failure leaves the service as a JSON object with an `error` field.
//! Client faults are 400, everything else is 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::ServiceError;
use crate::transfer::Amount;

/// JSON error body. Optional fields are omitted when unset.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_transaction_hash: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let mut body = ErrorBody::new(self.to_string());
        body.details = self.details();

        match self {
            ServiceError::InsufficientBalance {
                available,
                requested,
            } => {
                body.available = Some(available);
                body.requested = Some(requested);
            }
            ServiceError::Transaction {
                token_tx: Some(hash),
                ..
            } => {
                body.token_transaction_hash = Some(hash.to_string());
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

/// 404 for unmatched routes.
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("endpoint not found")),
    )
        .into_response()
}

/// 408 when a bounded route runs past the request timeout.
pub fn request_timeout() -> Response {
    let mut body = ErrorBody::new("request timeout");
    body.details = Some("request exceeded the configured time limit".into());
    (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
}

/// 500 for failures outside the service error model.
pub fn internal_error(message: impl Into<String>) -> Response {
    let mut body = ErrorBody::new("internal server error");
    body.message = Some(message.into());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
