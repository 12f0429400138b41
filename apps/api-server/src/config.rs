//! Application configuration loaded from environment variables.

use std::env;

use folio_core::ReplacedImagePolicy;
use folio_infra::JwtConfig;

#[cfg(feature = "cloudinary")]
use folio_infra::CloudinaryConfig;
#[cfg(feature = "postgres")]
use folio_infra::DatabaseConfig;

/// Default upload limit for post images (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Attachment handling settings.
#[derive(Debug, Clone)]
pub struct AttachmentConfig {
    pub folder: String,
    pub max_bytes: usize,
    pub replaced_images: ReplacedImagePolicy,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            folder: "posts".to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            replaced_images: ReplacedImagePolicy::Retain,
        }
    }
}

impl AttachmentConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        let delete_replaced = env::var("ATTACHMENT_DELETE_REPLACED")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Self {
            folder: env::var("ATTACHMENT_FOLDER").unwrap_or(defaults.folder),
            max_bytes: env::var("ATTACHMENT_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_bytes),
            replaced_images: if delete_replaced {
                ReplacedImagePolicy::DeletePrevious
            } else {
                ReplacedImagePolicy::Retain
            },
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub attachments: AttachmentConfig,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "cloudinary")]
    pub cloudinary: Option<CloudinaryConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt: JwtConfig::from_env(),
            attachments: AttachmentConfig::from_env(),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| vec!["*".to_string()]),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "cloudinary")]
            cloudinary: CloudinaryConfig::from_env(),
        }
    }
}
