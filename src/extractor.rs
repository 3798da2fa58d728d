// src/extractor.rs
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// `Query` z odrzuceniem w postaci `AppError`, żeby błędny query string
/// dawał tę samą odpowiedź JSON `{ error, code }` co reszta API.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::warn!(
                    "Nieprawidłowe parametry zapytania {:?}: {}",
                    parts.uri.query(),
                    rejection.body_text()
                );
                AppError::from(rejection)
            })?;

        Ok(AppQuery(params))
    }
}
