//! Domain models for the spreadsheet store.

use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

pub mod upload;
pub mod user;

// Re-export commonly used types
pub use upload::{
    UploadData, UploadJsonResponse, UploadListResponse, UploadResponse, UploadSummary,
};
pub use user::{LoginRequest, LoginResponse, LoginUser};

/// Fixed number of uploads per listing page.
pub const PAGE_SIZE: u64 = 5;

/// Page selection for listings.
///
/// `page` is kept as raw text so that a non-numeric value can be reported as a
/// client error instead of being replaced by a default.
#[derive(Debug, Clone, Default, serde::Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1; values below 1 are treated as 1)
    pub page: Option<String>,
}

fn default_page() -> u64 {
    1
}

impl PageQuery {
    /// Resolve the requested page, clamped to a minimum of 1.
    pub fn page(&self) -> AppResult<u64> {
        let raw = match self.page.as_deref().map(str::trim) {
            None | Some("") => return Ok(default_page()),
            Some(raw) => raw,
        };

        let page = raw
            .parse::<i128>()
            .map_err(|_| AppError::invalid_input("Invalid page", "page must be an integer"))?;

        Ok(page.clamp(1, i128::from(u64::MAX)) as u64)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Pagination {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        }
    }
}
