//! Attachment store port - abstraction over the external blob service.

use async_trait::async_trait;

/// Media types accepted for post images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// A binary upload as received from the caller.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Whether the declared media type is an allowed image type.
    pub fn is_allowed_image(&self) -> bool {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        ALLOWED_IMAGE_TYPES.contains(&essence.as_str())
    }

    /// File extension to use for the stored blob.
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or("bin")
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    /// Durable public URL of the blob.
    pub url: String,
}

/// Attachment store trait - uploads blobs and deletes them by key.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Upload a blob and return its durable URL.
    async fn upload(&self, attachment: &Attachment) -> Result<StoredAttachment, AttachmentError>;

    /// Delete a blob by the key derived with [`storage_key_from_url`].
    async fn delete(&self, key: &str) -> Result<(), AttachmentError>;
}

/// Attachment store errors.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Store misconfigured: {0}")]
    Configuration(String),
}

/// Derive the store key from a blob URL: the last two path segments, i.e. the
/// folder and the file name without its extension.
///
/// `https://res.cloudinary.com/demo/image/upload/v17/posts/abc.png` yields
/// `posts/abc`. Returns `None` when the path has fewer than two segments.
pub fn storage_key_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    let path = match without_query.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => without_query,
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty()).rev();
    let file_name = segments.next()?;
    let folder = segments.next()?;

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    if stem.is_empty() {
        return None;
    }

    Some(format!("{folder}/{stem}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_cloudinary_url() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1712/posts/abc123.jpg";
        assert_eq!(storage_key_from_url(url).as_deref(), Some("posts/abc123"));
    }

    #[test]
    fn test_key_ignores_query_and_fragment() {
        let url = "https://cdn.example.com/blogs/cover.final.webp?w=300#top";
        assert_eq!(storage_key_from_url(url).as_deref(), Some("blogs/cover.final"));
    }

    #[test]
    fn test_key_requires_two_segments() {
        assert_eq!(storage_key_from_url("https://cdn.example.com/cover.png"), None);
        assert_eq!(storage_key_from_url("https://cdn.example.com/"), None);
        assert_eq!(storage_key_from_url("posts/.png"), None);
    }

    #[test]
    fn test_key_without_extension() {
        assert_eq!(
            storage_key_from_url("memory://attachments/posts/42").as_deref(),
            Some("posts/42")
        );
    }

    #[test]
    fn test_allowed_image_types() {
        let png = Attachment::new("a.png", "image/png", vec![1]);
        let jpeg = Attachment::new("a.jpg", "IMAGE/JPEG; charset=binary", vec![1]);
        let gif = Attachment::new("a.gif", "image/gif", vec![1]);
        assert!(png.is_allowed_image());
        assert!(jpeg.is_allowed_image());
        assert!(!gif.is_allowed_image());
        assert_eq!(gif.extension(), "gif");
        assert_eq!(Attachment::new("noext", "image/png", vec![]).extension(), "bin");
    }
}
