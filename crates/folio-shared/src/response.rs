//! Standardized API response envelope.
//!
//! Every response, success or error, carries a numeric `status` mirroring the
//! HTTP code and a human-readable `message`. Errors leave `data` out.

use serde::{Deserialize, Serialize};

/// Response envelope wrapping an optional payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = ()> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationSummary>,
    /// Request ID for debugging purposes.
    #[serde(
        rename = "requestId",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data: Some(data),
            pagination: None,
            request_id: None,
        }
    }

    pub fn page(message: impl Into<String>, data: T, pagination: PaginationSummary) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(200, message, data)
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl ApiResponse {
    /// Envelope without a payload, used for deletes and errors.
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
            pagination: None,
            request_id: None,
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::message(400, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(401, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::message(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::message(409, message)
    }

    pub fn internal_error() -> Self {
        Self::message(500, "Internal server error")
    }
}

/// Pagination summary echoed with every search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub total_records: u64,
    pub start: u64,
    pub record_size: u64,
    pub order_type: i32,
    pub order_param: String,
}
