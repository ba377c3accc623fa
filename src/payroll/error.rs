use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for payroll generation.
///
/// `Validation` and `InvalidPeriod` are operator-recoverable (fix the
/// request and resubmit); `NotFound` aborts with nothing written;
/// `Store` propagates the underlying I/O failure untouched.
#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("{0}")]
    Validation(String),

    #[error("employee has no salary profile")]
    NotFound,

    #[error("working day count must be positive")]
    InvalidPeriod,

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl actix_web::ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Validation(_) => StatusCode::BAD_REQUEST,
            PayrollError::NotFound => StatusCode::NOT_FOUND,
            PayrollError::InvalidPeriod => StatusCode::UNPROCESSABLE_ENTITY,
            PayrollError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Store failures are logged where they happen; the client
            // only learns that the write did not succeed.
            PayrollError::Store(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
