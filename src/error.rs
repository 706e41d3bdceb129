//! Error types for the Lectern web client

use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message shown whenever the real failure is not something the user can act on.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Local rule violations. Never reaches the network layer.
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Missing or rejected session credential. Always surfaced as a
    /// redirect to the login page, never as an in-page message.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-2xx response from the catalog API, carrying its `message` field.
    #[error("Remote rejection ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    /// Messages suitable for in-page display. Transport and internal
    /// failures collapse to a generic message; remote messages are split
    /// into their sub-errors.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            AppError::Validation(messages) => messages.clone(),
            AppError::Remote { message, .. } => split_messages(message),
            AppError::Authentication(_) | AppError::Transport(_) | AppError::Internal(_) => {
                vec![GENERIC_FAILURE.to_string()]
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("Malformed API response: {}", e))
    }
}

/// The API reports multiple sub-errors as one comma-separated `message`.
/// Split it so the UI can render a list.
pub fn split_messages(message: &str) -> Vec<String> {
    message
        .split(", ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Error response body for in-page failures
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub messages: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            AppError::Authentication(msg) => {
                // Failing open toward login: drop the (possibly corrupt)
                // credential and send the user back to re-authenticate.
                tracing::debug!("Session rejected: {}", msg);
                let mut response = Redirect::to("/login").into_response();
                let removal = crate::web::session::expired_session_cookie();
                let value = HeaderValue::from_str(&removal.to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("token=; Max-Age=0; Path=/"));
                response.headers_mut().append(SET_COOKIE, value);
                return response;
            }
            AppError::Remote { status, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "remote",
            ),
            AppError::Transport(e) => {
                tracing::error!("Transport error: {:?}", e);
                (StatusCode::BAD_GATEWAY, "transport")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            messages: self.user_messages(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
