use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use salary_ml::InvokeError;
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::error;

/// JSON body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Username already registered")]
    DuplicateUsername,
    #[error("Email already registered")]
    DuplicateEmail,
    /// Bad credentials or a missing/invalid/expired token. Callers only
    /// ever see the detail, never which check failed.
    #[error("{0}")]
    AuthenticationFailed(&'static str),
    #[error("Prediction not found")]
    NotFound,
    #[error("Model not loaded")]
    ModelUnavailable,
    #[error("prediction failed: {0}")]
    Prediction(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_credentials() -> Self {
        Self::AuthenticationFailed("Incorrect username or password")
    }

    pub fn unauthenticated() -> Self {
        Self::AuthenticationFailed("Could not validate credentials")
    }

    /// Map an insert failure, turning unique violations into the matching
    /// duplicate outcome.
    pub fn from_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("email") => {
                Self::DuplicateEmail
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::DuplicateUsername,
            _ => err.into(),
        }
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            Self::DuplicateUsername => (StatusCode::BAD_REQUEST, "duplicate_username"),
            Self::DuplicateEmail => (StatusCode::BAD_REQUEST, "duplicate_email"),
            Self::AuthenticationFailed(_) => (StatusCode::UNAUTHORIZED, "authentication_failed"),
            Self::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            Self::ModelUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable"),
            Self::Prediction(_) => (StatusCode::INTERNAL_SERVER_ERROR, "prediction_error"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        Self::Internal(e.into())
    }
}

impl From<InvokeError> for AppError {
    fn from(e: InvokeError) -> Self {
        match e {
            InvokeError::Unavailable => Self::ModelUnavailable,
            InvokeError::Prediction(inner) => Self::Prediction(inner.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let detail = match &self {
            Self::Prediction(cause) => {
                error!(%cause, "prediction error");
                "Prediction failed".to_string()
            }
            Self::Internal(cause) => {
                error!(cause = %format!("{cause:#}"), "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut resp = (
            status,
            Json(ApiError {
                error: code.into(),
                detail,
            }),
        )
            .into_response();
        if status == StatusCode::UNAUTHORIZED {
            resp.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}
