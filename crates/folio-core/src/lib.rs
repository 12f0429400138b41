//! # Folio Core
//!
//! The domain layer of the Folio content backend: categories, posts, the
//! shared search/pagination engine and the registries that enforce per-owner
//! uniqueness and coordinate attachment lifecycles.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod search;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{CategoryService, PostService, ReplacedImagePolicy};
