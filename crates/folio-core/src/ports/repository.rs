use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, CategorySummary, Post, PostView};
use crate::error::RepoError;
use crate::search::{CategorySortField, Page, PostSortField, SearchQuery};

/// Generic repository trait defining standard CRUD operations.
///
/// `insert` and `update` report a violated uniqueness constraint as
/// [`RepoError::Constraint`]; `update` and `delete` report a missing row as
/// [`RepoError::NotFound`].
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Category repository. Storage must enforce uniqueness of `(owner_id, name)`.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Find a category by id, only if it belongs to `owner`.
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Category>, RepoError>;

    /// Find an owner's category by exact name.
    async fn find_by_name(&self, owner: Uuid, name: &str) -> Result<Option<Category>, RepoError>;

    /// All of an owner's categories as `{id, name}`, ascending by name.
    async fn list_summaries(&self, owner: Uuid) -> Result<Vec<CategorySummary>, RepoError>;

    /// Owner-scoped search on `name`.
    async fn search(
        &self,
        owner: Uuid,
        query: &SearchQuery<CategorySortField>,
    ) -> Result<Page<Category>, RepoError>;
}

/// Post repository. Storage must enforce uniqueness of `(owner_id, title)`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find a post by id, only if it belongs to `owner`.
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Find an owner's post by exact title, optionally ignoring one post.
    async fn find_by_title(
        &self,
        owner: Uuid,
        title: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<Post>, RepoError>;

    /// Search on `title`, joined with category names. `owner = None` searches
    /// every owner's posts.
    async fn search(
        &self,
        owner: Option<Uuid>,
        query: &SearchQuery<PostSortField>,
    ) -> Result<Page<PostView>, RepoError>;

    /// A single post by id regardless of owner, joined with its category name.
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError>;
}
