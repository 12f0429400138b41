//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//! This crate contains database, attachment store, and identity integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT identity verification
//! - `cloudinary` - Cloudinary attachment store via reqwest

pub mod attachment;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use attachment::InMemoryAttachmentStore;
pub use database::{InMemoryCategoryRepository, InMemoryPostRepository};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "cloudinary")]
pub use attachment::{CloudinaryAttachmentStore, CloudinaryConfig};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresCategoryRepository, PostgresPostRepository};
