use serde::Serialize;

pub const ITEMS_PER_PAGE: i64 = 10;

/// Highest page whose offset still fits in an `i64`.
const MAX_PAGE: i64 = i64::MAX / ITEMS_PER_PAGE;

/// One-based page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
}

impl PageRequest {
    /// Missing or non-positive page numbers fall back to the first page;
    /// oversized ones are capped at `MAX_PAGE`.
    pub fn new(page: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        ITEMS_PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * ITEMS_PER_PAGE
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: i64) -> Self {
        let total_pages = (total_items + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE;
        Self {
            items,
            page: request.page,
            per_page: ITEMS_PER_PAGE,
            total_items,
            total_pages,
            has_previous: request.page > 1,
            has_next: request.page < total_pages,
        }
    }
}
