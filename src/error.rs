//! Error types for the behavior group repository.
//!
//! Repository operations return [`BehaviorGroupError`]; the upstream HTTP layer
//! converts it into [`ApiError`], which knows how to render itself as a response.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for repository operations.
#[derive(Error, Debug)]
pub enum BehaviorGroupError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// A referenced row does not exist or belongs to another tenant
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Payload rejected before reaching the database
    #[error("Validation error: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl BehaviorGroupError {
    pub fn not_found(message: impl Into<String>) -> Self {
        BehaviorGroupError::NotFound {
            message: message.into(),
        }
    }

    /// Whether this is a validation failure on the given field.
    pub fn violates(&self, field: &str) -> bool {
        match self {
            BehaviorGroupError::Validation(errors) => errors.iter().any(|e| e.field == field),
            _ => false,
        }
    }
}

impl From<Vec<ValidationError>> for BehaviorGroupError {
    fn from(errors: Vec<ValidationError>) -> Self {
        BehaviorGroupError::Validation(errors)
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for BehaviorGroupError {
    fn from(err: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        BehaviorGroupError::Pool(err.to_string())
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error type for API operations (converts to HTTP responses).
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }))
    }
}

impl From<BehaviorGroupError> for ApiError {
    fn from(err: BehaviorGroupError) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match err {
            BehaviorGroupError::NotFound { message } => ApiError::NotFound(message),
            BehaviorGroupError::Validation(errors) => ApiError::BadRequest(join_errors(&errors)),
            BehaviorGroupError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => ApiError::Conflict(info.message().to_string()),
            BehaviorGroupError::Database(e) => {
                log::error!("Database error: {}", e);
                ApiError::InternalServerError("Database error".to_string())
            }
            BehaviorGroupError::Pool(e) => {
                log::error!("Pool error: {}", e);
                ApiError::InternalServerError("Connection pool error".to_string())
            }
        }
    }
}
