use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Reset token missing")]
    TokenMissing,

    #[error("Invalid reset token")]
    TokenInvalid,

    #[error("Reset token expired")]
    TokenExpired,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("New password must differ from the previous one")]
    PasswordReused,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Attempt log error: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            AppError::TokenMissing => StatusCode::BAD_REQUEST,
            AppError::TokenInvalid => StatusCode::BAD_REQUEST,
            AppError::TokenExpired => StatusCode::BAD_REQUEST,
            AppError::WeakPassword(_) => StatusCode::BAD_REQUEST,
            AppError::PasswordReused => StatusCode::BAD_REQUEST,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Email(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_type = match self {
            AppError::InvalidEmail(_) => "INVALID_EMAIL",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::WeakPassword(_) => "WEAK_PASSWORD",
            AppError::PasswordReused => "PASSWORD_REUSED",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Email(_) => "EMAIL_ERROR",
            AppError::StoreIo(_) => "STORE_IO_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        let message = self.to_string();
        let details = match self {
            AppError::Database(e) => Some(e.to_string()),
            AppError::StoreIo(e) => Some(e.to_string()),
            _ => None,
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

// Convert validator errors to AppError
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

// Convert lettre errors to AppError
impl From<lettre::error::Error> for AppError {
    fn from(error: lettre::error::Error) -> Self {
        AppError::Email(error.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        AppError::Email(error.to_string())
    }
}
