//! Cloudinary attachment store.
//!
//! Uses the signed upload API: every request carries `api_key`, `timestamp`
//! and a SHA-1 `signature` over the alphabetically sorted parameters followed
//! by the API secret.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use folio_core::ports::{Attachment, AttachmentError, AttachmentStore, StoredAttachment};

/// Cloudinary account configuration.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Remote folder uploads land in; also the first half of every key.
    pub folder: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Load from `CLOUDINARY_*` variables. `None` unless all credentials are set.
    pub fn from_env() -> Option<Self> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").ok()?;
        let api_key = std::env::var("CLOUDINARY_API_KEY").ok()?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET").ok()?;

        Some(Self {
            cloud_name,
            api_key,
            api_secret,
            folder: std::env::var("ATTACHMENT_FOLDER").unwrap_or_else(|_| "posts".to_string()),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Attachment store backed by Cloudinary's image API.
pub struct CloudinaryAttachmentStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryAttachmentStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }

    /// Signature over `params`, which must already be sorted by name.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => format!("{status}: {}", body.error.message),
            Err(_) => status.to_string(),
        }
    }
}

#[async_trait]
impl AttachmentStore for CloudinaryAttachmentStore {
    async fn upload(&self, attachment: &Attachment) -> Result<StoredAttachment, AttachmentError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", self.config.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);

        let file = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.content_type)
            .map_err(|e| AttachmentError::Upload(e.to_string()))?;

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AttachmentError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AttachmentError::Upload(Self::error_message(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AttachmentError::Upload(e.to_string()))?;

        tracing::debug!(url = %body.secure_url, "Uploaded to Cloudinary");
        Ok(StoredAttachment {
            url: body.secure_url,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), AttachmentError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", key), ("timestamp", timestamp.as_str())]);

        let params = [
            ("public_id", key),
            ("api_key", self.config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| AttachmentError::Delete(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AttachmentError::Delete(Self::error_message(response).await));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| AttachmentError::Delete(e.to_string()))?;

        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                tracing::debug!(key = %key, "Attachment already absent from Cloudinary");
                Ok(())
            }
            other => Err(AttachmentError::Delete(format!("unexpected result: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CloudinaryAttachmentStore {
        CloudinaryAttachmentStore::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "abcd".to_string(),
            folder: "posts".to_string(),
            api_base: "https://api.cloudinary.com/v1_1/".to_string(),
        })
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            store().endpoint("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }

    #[test]
    fn test_signature_is_sha1_of_params_and_secret() {
        let signature = store().sign(&[("public_id", "posts/x"), ("timestamp", "1700000000")]);

        let mut hasher = Sha1::new();
        hasher.update(b"public_id=posts/x&timestamp=1700000000abcd");
        assert_eq!(signature, hex::encode(hasher.finalize()));
        assert_eq!(signature.len(), 40);
    }
}
