// src/errors.rs
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::impact::ImpactError;
use crate::pagination::PaginationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Błąd SQLx: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Nie znaleziono zasobu: {0}")]
    NotFound(String),

    #[error("Błędy walidacji")]
    ValidationError(#[from] ValidationErrors),

    #[error("Nieprawidłowe żądanie: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Kod błędu w treści odpowiedzi, zgodny z rozszerzeniami błędów GraphQL.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) | AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::SqlxError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_message) = match self {
            AppError::SqlxError(sqlx_error) => {
                tracing::error!("Błąd SQLx: {:?}", sqlx_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Wystąpił wewnętrzny błąd serwera (baza danych)".to_string(),
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::ValidationError(errors) => {
                let mut messages = Vec::new();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let msg = error.message.as_ref().map_or_else(
                            || format!("Pole '{}' jest nieprawidłowe", field),
                            |m| format!("Pole '{}': {}", field, m),
                        );
                        messages.push(msg);
                    }
                }
                messages.sort();
                (StatusCode::BAD_REQUEST, messages.join("; "))
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message, "code": code }));
        (status, body).into_response()
    }
}

impl From<PaginationError> for AppError {
    fn from(err: PaginationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ImpactError> for AppError {
    fn from(err: ImpactError) -> Self {
        tracing::warn!("Odrzucono dane do obliczenia wpływu: {}", err);
        AppError::BadRequest(err.to_string())
    }
}
