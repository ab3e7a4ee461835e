use analyzer::AnalyzerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// The status code and client-facing message for this error.
    /// Internal failures are logged here and reported with a generic message.
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::Database(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Stock not found".to_string())
            }
            AppError::Database(err @ DbError::Duplicate(_)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            AppError::Database(err @ DbError::InvalidRecord(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Analyzer(err @ AnalyzerError::NoData { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::Analyzer(
                err @ (AnalyzerError::InsufficientHistory { .. }
                | AnalyzerError::NoTradingDays { .. }),
            ) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Analyzer(err @ AnalyzerError::InvalidDirection(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Analyzer(analyzer_err) => {
                tracing::error!(error = ?analyzer_err, "Analyzer error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during analysis".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
