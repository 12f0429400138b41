//! Attachment store implementations - Cloudinary and in-memory fallback.

mod memory;

#[cfg(feature = "cloudinary")]
mod cloudinary;

pub use memory::InMemoryAttachmentStore;

#[cfg(feature = "cloudinary")]
pub use cloudinary::{CloudinaryAttachmentStore, CloudinaryConfig};
