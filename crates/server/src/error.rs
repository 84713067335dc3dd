//! Error types for the Terraplane server.
//!
//! This module provides custom error types that implement `IntoResponse`
//! for seamless integration with Axum handlers. The invoking layer never
//! exposes raw internals: the taxonomy collapses into a small fixed set of
//! response categories (conflict, bad request, not found, server error).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use terraplane_core::CoreError;
use thiserror::Error;

/// Application-level errors for the execution orchestrator.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Validation error (bad command or tenant id, rejected before any
    /// side effect)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A live lock already exists for the requested (tenant, template) key
    #[error("Lock held: {0}")]
    LockHeld(String),

    /// Local filesystem failure in the tenant workspace
    #[error("Workspace I/O error: {0}")]
    Workspace(String),

    /// Command exited with a non-zero code; carries the captured output
    #[error("Command failed with exit code {code}")]
    Process {
        /// Exit code reported by the subprocess.
        code: i32,
        /// Combined output captured for diagnostics.
        output: String,
    },

    /// Command or operation exceeded its time bound
    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    /// Execution ledger write failed (logged, never rolls back a run)
    #[error("Ledger write failed: {0}")]
    Ledger(String),

    /// Object storage error
    #[error("Object storage error: {0}")]
    ObjectStore(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::LockHeld(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Workspace(msg) => {
                tracing::error!(error = %msg, "Workspace I/O error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Process { code, output } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Command failed with exit code {}: {}", code, output),
            ),
            AppError::Timeout(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("Operation timed out after {} seconds", secs),
            ),
            AppError::Ledger(msg) => {
                tracing::error!(error = %msg, "Ledger write error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ObjectStore(msg) => {
                tracing::warn!(error = %msg, "Object storage error");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTenant(msg) => AppError::Validation(msg),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::Io(msg) => AppError::Workspace(msg),
            CoreError::Process(msg) => AppError::Internal(msg),
            CoreError::NonZeroExit { code, output } => AppError::Process { code, output },
            CoreError::Timeout(secs) => AppError::Timeout(secs),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_held_display() {
        let err = AppError::LockHeld("tenant t1, template x".to_string());
        assert_eq!(err.to_string(), "Lock held: tenant t1, template x");
    }

    #[test]
    fn test_validation_display() {
        let err = AppError::Validation("Command not allowed: fmt".to_string());
        assert_eq!(err.to_string(), "Validation error: Command not allowed: fmt");
    }

    #[test]
    fn test_core_error_mapping() {
        let err: AppError = CoreError::InvalidTenant("..".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = CoreError::Io("disk full".to_string()).into();
        assert!(matches!(err, AppError::Workspace(_)));

        let err: AppError = CoreError::NonZeroExit {
            code: 1,
            output: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Process { code: 1, .. }));

        let err: AppError = CoreError::Timeout(10).into();
        assert!(matches!(err, AppError::Timeout(10)));
    }
}
