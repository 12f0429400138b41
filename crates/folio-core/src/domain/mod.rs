//! Domain entities - the core business objects.

mod category;
mod post;

pub use category::{Category, CategoryDraft, CategoryPatch, CategorySummary};
pub use post::{NewPost, Post, PostDraft, PostPatch, PostView};
