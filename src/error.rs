use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors raised while reading or writing the JSON document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced to API callers. Every variant renders as
/// `{"message": "..."}` with the matching HTTP status.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("{0}")]
    Validation(String),

    /// Bad email/password pair on login. Reported as a 400, like any other
    /// rejected form submission.
    #[error("Invalid Credentials")]
    InvalidCredentials,

    /// Missing, malformed or expired bearer token.
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for CrmError {
    fn status_code(&self) -> StatusCode {
        match self {
            CrmError::Validation(_) | CrmError::InvalidCredentials => StatusCode::BAD_REQUEST,
            CrmError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            CrmError::Forbidden(_) => StatusCode::FORBIDDEN,
            CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            CrmError::Storage(_) | CrmError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            CrmError::Storage(_) | CrmError::Internal(_) => {
                log::error!("{}", self);
                "Server Error".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "message": message }))
    }
}
