//! Response types for HTTP handlers.

use std::borrow::Cow;

use rawuh_postgres::types::Page;
use schemars::JsonSchema;
use serde::Serialize;

mod authentication;
mod error_response;
mod events;
mod guests;
mod monitors;
mod projects;
mod session_error;
mod users;

pub use authentication::*;
pub use error_response::*;
pub use events::*;
pub use guests::*;
pub use monitors::*;
pub use projects::*;
pub use session_error::*;
pub use users::*;

/// Message carried by every successful envelope.
const SUCCESS: &str = "Success";

/// Success envelope for single-item and empty responses.
///
/// Serializes as `{"Error": false, "Code": 200, "Message": "Success", "Data": ...}`.
/// `Data` is omitted when there is nothing to return.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[schemars(rename = "{T}Response")]
pub struct ApiResponse<T> {
    #[serde(rename = "Error")]
    pub error: bool,
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Message")]
    pub message: Cow<'static, str>,
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` in a success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            error: false,
            code: 200,
            message: Cow::Borrowed(SUCCESS),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope without data.
    pub fn empty() -> Self {
        Self {
            error: false,
            code: 200,
            message: Cow::Borrowed(SUCCESS),
            data: None,
        }
    }
}

/// Paging metadata of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PaginationInfo {
    /// Requested page, `-1` when paging is disabled.
    pub page: i64,
    /// Page size, `-1` when paging is disabled.
    pub limit: i64,
    /// Rows matching the query across all pages.
    pub total_rows: i64,
    /// Number of pages.
    pub total_pages: i64,
}

/// Success envelope for list endpoints.
#[must_use]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[schemars(rename = "{T}ListResponse")]
pub struct ListResponse<T> {
    #[serde(rename = "Error")]
    pub error: bool,
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Message")]
    pub message: Cow<'static, str>,
    #[serde(rename = "Data")]
    pub data: Vec<T>,
    #[serde(rename = "Pagination")]
    pub pagination: PaginationInfo,
}

impl<T> ListResponse<T> {
    /// Builds the envelope from a page of storage rows.
    pub fn from_page<M>(page: Page<M>, f: impl FnMut(M) -> T) -> Self {
        let pagination = PaginationInfo {
            page: page.pagination.page,
            limit: page.pagination.limit,
            total_rows: page.total_rows,
            total_pages: page.total_pages(),
        };

        Self {
            error: false,
            code: 200,
            message: Cow::Borrowed(SUCCESS),
            data: page.items.into_iter().map(f).collect(),
            pagination,
        }
    }
}
