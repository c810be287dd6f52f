//! Pagination utilities for service layer
//!
//! `PageRequest` normalizes raw query input; `Page` is the response envelope.

use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::ProductDto;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: i64,
    /// items per page
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
        .normalize()
    }

    /// Replace non-positive values with the defaults.
    pub fn normalize(self) -> Self {
        let page = if self.page <= 0 { DEFAULT_PAGE } else { self.page };
        let page_size = if self.page_size <= 0 { DEFAULT_PAGE_SIZE } else { self.page_size };
        Self { page, page_size }
    }

    /// Rows to skip, capped at `i64::MAX` so every backend can bind it.
    pub fn offset(&self) -> u64 {
        ((self.page - 1) as u64)
            .saturating_mul(self.page_size as u64)
            .min(i64::MAX as u64)
    }

    pub fn limit(&self) -> u64 { self.page_size as u64 }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit())
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE } }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(ProductPage = Page<ProductDto>)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: i64,
    pub page_size: i64,
    pub total_items: u64,
    pub total_pages: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(req: PageRequest, total_items: u64, items: Vec<T>) -> Self {
        Self {
            page: req.page,
            page_size: req.page_size,
            total_items,
            total_pages: req.total_pages(total_items),
            items,
        }
    }
}
