//! Registries - the application services behind every endpoint.
//!
//! Each mutating operation validates input, checks existence and uniqueness,
//! and only then touches storage. Uniqueness is also enforced by the storage
//! layer; a constraint violation surfaces as [`DomainError::Duplicate`].
//!
//! [`DomainError::Duplicate`]: crate::error::DomainError::Duplicate

mod category;
mod post;

pub use category::CategoryService;
pub use post::{PostService, ReplacedImagePolicy};
