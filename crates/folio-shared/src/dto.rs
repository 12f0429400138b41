//! Data Transfer Objects - request types for the API.
//!
//! Fields are optional so that missing values reach validation (400) instead of
//! failing deserialization.

use serde::{Deserialize, Serialize};

/// Body for creating or partially updating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

/// Body of every search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search: String,
}

/// Raw pagination query string. Values are kept as text and coerced by the
/// server, so `?start=abc` falls back to the default instead of a 400.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub start: Option<String>,
    pub record_size: Option<String>,
    pub order_type: Option<String>,
    pub order_param: Option<String>,
}

/// Multipart field names accepted by the post create/update endpoints.
pub mod post_fields {
    pub const TITLE: &str = "title";
    pub const CATEGORY_ID: &str = "categoryId";
    pub const POSTED_BY: &str = "postedBy";
    pub const BLOG_CONTENT: &str = "blogContent";
    pub const KEYWORDS: &str = "keywords";
    pub const DESCRIPTION: &str = "description";
    pub const IMAGE: &str = "image";
}
