//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{AttachmentStore, CategoryRepository, PostRepository};
use folio_core::{CategoryService, PostService};
use folio_infra::{InMemoryAttachmentStore, InMemoryCategoryRepository, InMemoryPostRepository};

#[cfg(feature = "cloudinary")]
use folio_infra::CloudinaryAttachmentStore;
#[cfg(feature = "postgres")]
use folio_infra::{PostgresCategoryRepository, PostgresPostRepository};

use crate::config::{AppConfig, AttachmentConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub posts: Arc<PostService>,
    /// Upper bound for a single multipart file part.
    pub max_upload_bytes: usize,
}

type Repositories = (Arc<dyn CategoryRepository>, Arc<dyn PostRepository>);

fn in_memory_repositories() -> Repositories {
    let categories = Arc::new(InMemoryCategoryRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new(categories.clone()));
    (categories, posts)
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (category_repo, post_repo) = Self::repositories(config).await;
        let attachments = Self::attachment_store(config);

        tracing::info!("Application state initialized");
        Self::assemble(category_repo, post_repo, attachments, &config.attachments)
    }

    /// State backed entirely by in-memory stores.
    pub fn in_memory(attachments: &AttachmentConfig) -> Self {
        let (category_repo, post_repo) = in_memory_repositories();
        let store = Arc::new(InMemoryAttachmentStore::new(
            "memory://attachments",
            attachments.folder.clone(),
        ));
        Self::assemble(category_repo, post_repo, store, attachments)
    }

    fn assemble(
        category_repo: Arc<dyn CategoryRepository>,
        post_repo: Arc<dyn PostRepository>,
        store: Arc<dyn AttachmentStore>,
        attachments: &AttachmentConfig,
    ) -> Self {
        let posts = PostService::new(post_repo, store)
            .with_replaced_image_policy(attachments.replaced_images);

        Self {
            categories: Arc::new(CategoryService::new(category_repo)),
            posts: Arc::new(posts),
            max_upload_bytes: attachments.max_bytes,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return in_memory_repositories();
        };

        match db_config.connect().await {
            Ok(conn) => (
                Arc::new(PostgresCategoryRepository::new(conn.clone())),
                Arc::new(PostgresPostRepository::new(conn)),
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                in_memory_repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        in_memory_repositories()
    }

    #[cfg(feature = "cloudinary")]
    fn attachment_store(config: &AppConfig) -> Arc<dyn AttachmentStore> {
        match &config.cloudinary {
            Some(cloudinary) => {
                tracing::info!(cloud = %cloudinary.cloud_name, "Using Cloudinary attachment store");
                Arc::new(CloudinaryAttachmentStore::new(cloudinary.clone()))
            }
            None => {
                tracing::warn!("Cloudinary not configured. Attachments are kept in memory.");
                Arc::new(InMemoryAttachmentStore::new(
                    "memory://attachments",
                    config.attachments.folder.clone(),
                ))
            }
        }
    }

    #[cfg(not(feature = "cloudinary"))]
    fn attachment_store(config: &AppConfig) -> Arc<dyn AttachmentStore> {
        tracing::info!("Running without cloudinary feature - attachments are kept in memory");
        Arc::new(InMemoryAttachmentStore::new(
            "memory://attachments",
            config.attachments.folder.clone(),
        ))
    }
}
