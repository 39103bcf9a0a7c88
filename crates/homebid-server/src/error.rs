//! API error type and HTTP status mapping
//!
//! Every failure surfaced to a client carries a JSON `{error}` body and is
//! logged before the response is built; nothing is silently swallowed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use homebid_agent::AgentError;
use homebid_extractor::ExtractError;
use homebid_rewriter::RewriteError;
use homebid_store::StoreError;
use serde::Serialize;
use tracing::{error, warn};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// No valid session token on an authenticated route
    Unauthenticated,
    /// Missing required fields or malformed ids
    Validation(String),
    /// Referenced offer does not exist
    NotFound(String),
    /// File validation or extraction failure
    Extract(ExtractError),
    /// Document rewrite failure
    Rewrite(RewriteError),
    /// Conversational agent failure
    Agent(AgentError),
    /// Storage failure
    Store(StoreError),
    /// Session token machinery failure
    Session(crate::session::SessionError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "User not authenticated".to_string())
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Extract(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Rewrite(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            ApiError::Agent(AgentError::TurnInFlight) => {
                (StatusCode::CONFLICT, AgentError::TurnInFlight.to_string())
            }
            ApiError::Agent(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            ApiError::Store(StoreError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("Offer not found: {}", id))
            }
            ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Session(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!("{}: {}", status, message);
        } else {
            warn!("{}: {}", status, message);
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        ApiError::Extract(e)
    }
}

impl From<RewriteError> for ApiError {
    fn from(e: RewriteError) -> Self {
        ApiError::Rewrite(e)
    }
}

impl From<AgentError> for ApiError {
    fn from(e: AgentError) -> Self {
        ApiError::Agent(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl From<crate::session::SessionError> for ApiError {
    fn from(e: crate::session::SessionError) -> Self {
        ApiError::Session(e)
    }
}
