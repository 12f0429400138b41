//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod attachment;
mod auth;
mod repository;

pub use attachment::{
    ALLOWED_IMAGE_TYPES, Attachment, AttachmentError, AttachmentStore, StoredAttachment,
    storage_key_from_url,
};
pub use auth::{AuthError, TokenClaims, TokenService};
pub use repository::{BaseRepository, CategoryRepository, PostRepository};
