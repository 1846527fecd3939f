//! Settings Error Types
//!
//! Centralized error handling for settings persistence. Validation is not
//! represented here: sanitizer findings are advisories, reported alongside
//! a successful write rather than raised as errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Settings persistence errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Plugin is not active")]
    NotActive,
}

impl IntoResponse for SettingsError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            SettingsError::NotActive => (
                StatusCode::SERVICE_UNAVAILABLE,
                "plugin_not_active",
                self.to_string(),
            ),
            SettingsError::Storage(_)
            | SettingsError::Serialization(_)
            | SettingsError::Migration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "error": error_code,
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for SettingsError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        SettingsError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Serialization error: {:?}", err);
        SettingsError::Serialization(err.to_string())
    }
}
