// src/pagination.rs
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Rozmiar strony musi być większy od zera (otrzymano {0})")]
    InvalidPageSize(i64),
}

/// Numer strony (liczony od 1) i rozmiar strony dla pojedynczego zapytania.
///
/// Tworzony per wywołanie, nigdy nie jest przechowywany. Konstruktor
/// gwarantuje `page >= 1` oraz `page_size >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Numer strony < 1 jest traktowany jak strona 1, błędny rozmiar strony
    /// kończy się błędem.
    pub fn new(page: Option<i64>, page_size: i64) -> Result<Self, PaginationError> {
        Ok(Self {
            page: clamp_page(page),
            page_size: validate_page_size(page_size)?,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset_params(&self) -> OffsetParams {
        OffsetParams {
            skip: (self.page - 1).saturating_mul(self.page_size),
            take: self.page_size,
        }
    }

    pub fn page_info(&self, total_count: i64) -> PageInfo {
        page_info_for(total_count, self.page, self.page_size)
    }

    pub fn wrap<T>(&self, items: Vec<T>, total_count: i64) -> Connection<T> {
        Connection {
            nodes: items,
            page_info: self.page_info(total_count),
        }
    }
}

/// Parametry przesunięcia dla warstwy bazy danych (OFFSET / LIMIT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetParams {
    pub skip: i64,
    pub take: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

/// Koperta odpowiedzi listowej: strona wyników + metadane paginacji.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

/// Argumenty `wrap` przekazywane po nazwie, żeby kolejność nie mogła się pomylić.
#[derive(Debug)]
pub struct ConnectionParts<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: Option<i64>,
    pub page_size: i64,
}

fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

fn validate_page_size(page_size: i64) -> Result<i64, PaginationError> {
    if page_size <= 0 {
        return Err(PaginationError::InvalidPageSize(page_size));
    }
    Ok(page_size)
}

// Wymaga page >= 1 i page_size >= 1
fn page_info_for(total_count: i64, current_page: i64, page_size: i64) -> PageInfo {
    let total_count = total_count.max(0);
    let total_pages = total_count / page_size + i64::from(total_count % page_size != 0);
    let cursor = (total_count > 0).then(|| current_page.to_string());

    PageInfo {
        has_next_page: current_page < total_pages,
        has_previous_page: current_page > 1,
        start_cursor: cursor.clone(),
        end_cursor: cursor,
        total_count,
        total_pages,
        current_page,
        page_size,
    }
}

/// Zamienia numer strony i rozmiar strony na `skip`/`take`.
pub fn to_offset_params(page: Option<i64>, page_size: i64) -> Result<OffsetParams, PaginationError> {
    Ok(PageRequest::new(page, page_size)?.offset_params())
}

pub fn build_page_info(
    total_count: i64,
    page: Option<i64>,
    page_size: i64,
) -> Result<PageInfo, PaginationError> {
    Ok(PageRequest::new(page, page_size)?.page_info(total_count))
}

pub fn wrap<T>(parts: ConnectionParts<T>) -> Result<Connection<T>, PaginationError> {
    let request = PageRequest::new(parts.page, parts.page_size)?;
    Ok(request.wrap(parts.items, parts.total_count))
}
