/// Pagination types
use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};

/// A 1-based page number and a page size, both non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a page request
    ///
    /// # Errors
    /// Returns `InvalidInput` if `page` or `per_page` is zero
    pub fn new(page: u32, per_page: u32) -> Result<Self> {
        if page == 0 {
            return Err(RosterError::invalid_input("page must be at least 1"));
        }
        if per_page == 0 {
            return Err(RosterError::invalid_input("page size must be at least 1"));
        }
        Ok(Self { page, per_page })
    }

    /// The first page of the given size
    pub fn first(per_page: u32) -> Result<Self> {
        Self::new(1, per_page)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Row limit for SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// One page of an ordered listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    /// Rows across all pages
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: i64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total_count,
        }
    }

    /// Number of pages needed to show every row; zero for an empty listing
    pub fn total_pages(&self) -> u32 {
        let total = self.total_count.max(0) as u64;
        total.div_ceil(u64::from(self.per_page)) as u32
    }

    /// Whether a pagination control should be shown
    pub fn is_paginated(&self) -> bool {
        self.total_count > i64::from(self.per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_count: self.total_count,
        }
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            page: self.page,
            per_page: self.per_page,
            total_count: self.total_count,
            total_pages: self.total_pages(),
            paginated: self.is_paginated(),
        }
    }
}

/// Serializable pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub total_pages: u32,
    pub paginated: bool,
}
