//! Post registry - owner-scoped posts with attachment coordination.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostPatch, PostView};
use crate::error::{DomainError, RepoError};
use crate::ports::{Attachment, AttachmentStore, PostRepository, storage_key_from_url};
use crate::search::{Page, PostSortField, SearchQuery};

const ENTITY: &str = "Post";
const DUPLICATE_TITLE: &str = "Post with this title already exists";

/// What to do with a post's previous image once a replacement is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacedImagePolicy {
    /// Leave the old blob in the store.
    #[default]
    Retain,
    /// Best-effort delete of the old blob after the post is saved.
    DeletePrevious,
}

/// Owner-scoped post operations plus the public read paths.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    attachments: Arc<dyn AttachmentStore>,
    replaced_images: ReplacedImagePolicy,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self {
            posts,
            attachments,
            replaced_images: ReplacedImagePolicy::default(),
        }
    }

    pub fn with_replaced_image_policy(mut self, policy: ReplacedImagePolicy) -> Self {
        self.replaced_images = policy;
        self
    }

    /// Create a post. The attachment, if any, is uploaded before the post is
    /// written; a failed write deletes the fresh upload again.
    pub async fn create(
        &self,
        owner: Uuid,
        draft: PostDraft,
        attachment: Option<Attachment>,
    ) -> Result<Post, DomainError> {
        let fields = draft.validate().map_err(|missing| {
            DomainError::Validation(format!("All fields are required: {}", missing.join(", ")))
        })?;

        let title = fields.title.trim();
        if self.posts.find_by_title(owner, title, None).await?.is_some() {
            return Err(DomainError::Duplicate(DUPLICATE_TITLE.to_string()));
        }

        let image = match &attachment {
            Some(attachment) => Some(self.upload(attachment).await?),
            None => None,
        };

        let post = Post::new(owner, fields, image.clone());
        let saved = match self.posts.insert(post).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(url) = image.as_deref() {
                    self.discard_blob(url).await;
                }
                return Err(duplicate_title(e));
            }
        };

        tracing::info!(owner = %owner, post_id = %saved.id, "Post created");
        Ok(saved)
    }

    /// Apply the present fields of `patch` and optionally replace the image.
    /// A failed write deletes the replacement upload again.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: PostPatch,
        attachment: Option<Attachment>,
    ) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_owned(owner, id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        let new_title = patch.title_change(&post.title);
        if let Some(title) = &new_title {
            if self
                .posts
                .find_by_title(owner, title, Some(id))
                .await?
                .is_some()
            {
                return Err(DomainError::Duplicate(DUPLICATE_TITLE.to_string()));
            }
        }

        if let Some(attachment) = &attachment {
            if !attachment.is_allowed_image() {
                return Err(invalid_image(attachment));
            }
        }

        if let Some(title) = new_title {
            post.title = title;
        }
        patch.apply_fields(&mut post);

        let mut uploaded = None;
        let mut replaced = None;
        if let Some(attachment) = &attachment {
            let url = self.upload(attachment).await?;
            uploaded = Some(url.clone());
            replaced = post.image.replace(url);
        }
        post.updated_at = chrono::Utc::now();

        let saved = match self.posts.update(post).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(url) = uploaded.as_deref() {
                    self.discard_blob(url).await;
                }
                return Err(match e {
                    RepoError::NotFound => DomainError::not_found(ENTITY, id),
                    other => duplicate_title(other),
                });
            }
        };

        if let Some(previous) = replaced {
            match self.replaced_images {
                ReplacedImagePolicy::Retain => {
                    tracing::debug!(post_id = %id, url = %previous, "Retaining replaced image");
                }
                ReplacedImagePolicy::DeletePrevious => self.discard_blob(&previous).await,
            }
        }

        tracing::info!(owner = %owner, post_id = %id, "Post updated");
        Ok(saved)
    }

    /// Delete an owned post, then make one best-effort attempt to remove its
    /// image. Attachment failures never fail the delete.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_owned(owner, id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => other.into(),
        })?;

        if let Some(url) = post.image.as_deref() {
            self.discard_blob(url).await;
        }

        tracing::info!(owner = %owner, post_id = %id, "Post deleted");
        Ok(())
    }

    /// Search the caller's own posts by title.
    pub async fn search(
        &self,
        owner: Uuid,
        query: &SearchQuery<PostSortField>,
    ) -> Result<Page<PostView>, DomainError> {
        Ok(self.posts.search(Some(owner), query).await?)
    }

    /// Search every owner's posts by title.
    pub async fn public_search(
        &self,
        query: &SearchQuery<PostSortField>,
    ) -> Result<Page<PostView>, DomainError> {
        Ok(self.posts.search(None, query).await?)
    }

    pub async fn public_view(&self, id: Uuid) -> Result<PostView, DomainError> {
        self.posts
            .find_view(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    async fn upload(&self, attachment: &Attachment) -> Result<String, DomainError> {
        if !attachment.is_allowed_image() {
            return Err(invalid_image(attachment));
        }
        let stored = self.attachments.upload(attachment).await?;
        tracing::debug!(url = %stored.url, size = attachment.bytes.len(), "Attachment uploaded");
        Ok(stored.url)
    }

    /// Best-effort blob removal; failures are logged and swallowed.
    async fn discard_blob(&self, url: &str) {
        let Some(key) = storage_key_from_url(url) else {
            tracing::warn!(url = %url, "Cannot derive attachment key, skipping delete");
            return;
        };

        if let Err(e) = self.attachments.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "Attachment delete failed");
        }
    }
}

fn invalid_image(attachment: &Attachment) -> DomainError {
    DomainError::Validation(format!(
        "Unsupported image type '{}'; allowed: jpeg, png, webp",
        attachment.content_type
    ))
}

fn duplicate_title(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Duplicate(DUPLICATE_TITLE.to_string()),
        other => other.into(),
    }
}
