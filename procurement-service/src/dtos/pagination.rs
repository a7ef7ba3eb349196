use crate::config::PaginationConfig;
use serde::Serialize;
use service_core::error::AppError;

/// A resolved, in-bounds page of a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Apply defaults and bounds to the raw `page` / `page_size` parameters.
    ///
    /// A `page_size` above the maximum is clamped; zero or negative values of
    /// either parameter are rejected.
    pub fn resolve(
        page: Option<i64>,
        page_size: Option<i64>,
        config: &PaginationConfig,
    ) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::invalid_field(
                "page",
                "range",
                "page must be 1 or greater",
            ));
        }

        let max = i64::from(config.max_page_size);
        let page_size = page_size.unwrap_or_else(|| i64::from(config.default_page_size));
        if page_size < 1 {
            return Err(AppError::invalid_field(
                "page_size",
                "range",
                "page_size must be 1 or greater",
            ));
        }

        Ok(Self {
            page,
            page_size: page_size.min(max),
        })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Envelope returned by every list endpoint.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, request: PageRequest) -> Self {
        let total_pages = (count + request.page_size - 1) / request.page_size;
        Self {
            count,
            page: request.page,
            page_size: request.page_size,
            total_pages,
            results,
        }
    }
}
