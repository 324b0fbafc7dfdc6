//! HTTP error responses.
//!
//! Every failure is rendered as `{"error": ..., "details": ...}` with a
//! status chosen by the variant.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use cutoday_core::{EventSource, TimeError};
use cutoday_providers::{AggregateError, ProviderErrorKind};
use cutoday_store::StoreError;

/// An error returned by a request handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input (400).
    #[error("invalid request: {0}")]
    Validation(String),

    /// Unknown record or unconfigured source (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// An upstream source failed (500).
    #[error("{message}: {details}")]
    Upstream { message: String, details: String },

    /// Anything else that went wrong on our side (500).
    #[error("{message}: {details}")]
    Internal { message: String, details: String },

    /// Database failure; a missing record maps to 404.
    #[error("database error: {0}")]
    Database(#[from] StoreError),
}

impl ApiError {
    pub fn validation(details: impl Into<String>) -> Self {
        Self::Validation(details.into())
    }

    /// Maps a per-source fetch failure.
    pub fn from_source(source: EventSource, err: AggregateError) -> Self {
        let message = format!("Failed to fetch {} events", source);
        match err {
            AggregateError::NotConfigured(source) => {
                Self::NotFound(format!("source '{}' is not configured", source))
            }
            AggregateError::Provider(e) => match e.kind() {
                ProviderErrorKind::ValidationError => Self::Validation(e.to_string()),
                ProviderErrorKind::NotFound => Self::NotFound(e.to_string()),
                ProviderErrorKind::SourceUnavailable | ProviderErrorKind::ConfigurationMissing => {
                    Self::Upstream {
                        message,
                        details: e.message().to_string(),
                    }
                }
            },
            other => Self::Internal {
                message,
                details: other.to_string(),
            },
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Database(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::Internal { .. } | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> (String, String) {
        match self {
            Self::Validation(details) => ("Invalid request".to_string(), details.clone()),
            Self::NotFound(details) => ("Not found".to_string(), details.clone()),
            Self::Upstream { message, details } | Self::Internal { message, details } => {
                (message.clone(), details.clone())
            }
            Self::Database(StoreError::NotFound(what)) => {
                ("Not found".to_string(), format!("{} not found", what))
            }
            Self::Database(e) => ("Database error".to_string(), e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        let (message, details) = self.body();
        (status, Json(json!({ "error": message, "details": details }))).into_response()
    }
}

impl From<TimeError> for ApiError {
    fn from(err: TimeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::Validation(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::Validation(err.body_text())
    }
}
