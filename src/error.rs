//! Structured errors for dashboard requests.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    InvalidParameter,

    // Not found errors
    PageNotFound,

    // Internal errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter => StatusCode::BAD_REQUEST,
            ErrorCode::PageNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error raised while loading or rendering a page.
#[derive(Debug, thiserror::Error, Serialize)]
#[error("{message}")]
pub struct DashboardError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl DashboardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidParameter, reason).with_field(field)
    }

    pub fn page_not_found(name: &str) -> Self {
        Self::new(ErrorCode::PageNotFound, format!("Unknown page: {}", name))
    }

    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl From<rusqlite::Error> for DashboardError {
    fn from(err: rusqlite::Error) -> Self {
        DashboardError::database(err)
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DashboardError>() {
            Ok(dashboard_err) => dashboard_err,
            Err(err) => match err.downcast::<rusqlite::Error>() {
                Ok(db_err) => DashboardError::database(db_err),
                Err(err) => DashboardError::internal(err),
            },
        }
    }
}

impl From<tokio::task::JoinError> for DashboardError {
    fn from(err: tokio::task::JoinError) -> Self {
        DashboardError::internal(err)
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, "Request failed: {}", self.message);
        } else {
            tracing::debug!(code = ?self.code, "Request rejected: {}", self.message);
        }
        let body = format!(
            r#"<div class="error-message"><strong>{}</strong> {}</div>"#,
            status,
            crate::dashboard::html_escape(&self.message)
        );
        (status, Html(body)).into_response()
    }
}

/// Result type for dashboard operations.
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
