// src/filters.rs
use serde::Deserialize;
use std::str::FromStr;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{ProductSortField, SortDirection};
use crate::pagination::{PageRequest, PaginationError};

/// Rozmiar strony domyślny dla danego miejsca wywołania oraz górny limit.
#[derive(Debug, Clone, Copy)]
pub struct PageSizePolicy {
    pub default: i64,
    pub max: i64,
}

impl PageSizePolicy {
    /// Brak `pageSize` oznacza wartość domyślną, za duży jest przycinany do
    /// limitu, a `pageSize <= 0` to błąd.
    pub fn resolve(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PageRequest, PaginationError> {
        let page_size = match page_size {
            Some(size) if size > self.max => self.max,
            Some(size) => size,
            None => self.default,
        };
        PageRequest::new(page, page_size)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn page_request(&self, policy: PageSizePolicy) -> Result<PageRequest, PaginationError> {
        policy.resolve(self.page, self.page_size)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListingParams {
    // Paginacja
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    page_size: Option<i64>,

    // Filtry
    #[serde(default)]
    is_active: Option<bool>,

    // Sortowanie
    #[serde(default)]
    order_by: Option<String>,
    #[serde(default)]
    direction: Option<String>,
}

impl ProductListingParams {
    pub fn page_request(&self, policy: PageSizePolicy) -> Result<PageRequest, PaginationError> {
        policy.resolve(self.page, self.page_size)
    }

    pub fn is_active(&self) -> Option<bool> {
        self.is_active
    }

    // Nieznane wartości wracają do domyślnych
    pub fn order_by(&self) -> ProductSortField {
        self.order_by
            .as_deref()
            .and_then(|field| ProductSortField::from_str(field).ok())
            .unwrap_or_default()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
            .as_deref()
            .and_then(|d| SortDirection::from_str(d).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProductListingParams {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    page_size: Option<i64>,
    #[serde(default)]
    is_active: Option<bool>,
}

impl StoreProductListingParams {
    pub fn page_request(&self, policy: PageSizePolicy) -> Result<PageRequest, PaginationError> {
        policy.resolve(self.page, self.page_size)
    }

    pub fn is_active(&self) -> Option<bool> {
        self.is_active
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImpactValueParams {
    #[validate(range(min = 0.0, message = "Wartość nie może być ujemna"))]
    pub value: f64,
}

impl ImpactValueParams {
    // Walidator przepuszcza NaN, więc skończoność sprawdzamy osobno
    pub fn checked_value(&self) -> Result<f64, AppError> {
        self.validate()?;
        if !self.value.is_finite() {
            return Err(AppError::BadRequest(
                "Wartość musi być liczbą skończoną".to_string(),
            ));
        }
        Ok(self.value)
    }
}
