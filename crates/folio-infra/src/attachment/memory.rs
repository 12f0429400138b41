//! In-memory attachment store - used when no blob service is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::ports::{
    Attachment, AttachmentError, AttachmentStore, StoredAttachment, storage_key_from_url,
};

/// Blob store backed by a HashMap keyed the same way the remote store is.
///
/// URLs look like `{base_url}/{folder}/{uuid}.{ext}`, so
/// [`storage_key_from_url`] maps them back to `{folder}/{uuid}`.
/// Note: Data is lost on process restart.
pub struct InMemoryAttachmentStore {
    base_url: String,
    folder: String,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAttachmentStore {
    pub fn new(base_url: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            folder: folder.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.blobs.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

impl Default for InMemoryAttachmentStore {
    fn default() -> Self {
        Self::new("memory://attachments", "posts")
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn upload(&self, attachment: &Attachment) -> Result<StoredAttachment, AttachmentError> {
        let url = format!(
            "{}/{}/{}.{}",
            self.base_url,
            self.folder,
            Uuid::new_v4().simple(),
            attachment.extension()
        );
        let key = storage_key_from_url(&url)
            .ok_or_else(|| AttachmentError::Configuration(format!("unusable base url: {url}")))?;

        self.blobs
            .write()
            .await
            .insert(key, attachment.bytes.clone());

        Ok(StoredAttachment { url })
    }

    async fn delete(&self, key: &str) -> Result<(), AttachmentError> {
        if self.blobs.write().await.remove(key).is_none() {
            tracing::debug!(key = %key, "Attachment not found for deletion");
        }
        Ok(())
    }
}
