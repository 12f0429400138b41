//! Multipart form parsing for the post create/update endpoints.

use actix_multipart::{Field, Multipart};
use futures::StreamExt;
use uuid::Uuid;

use folio_core::domain::{PostDraft, PostPatch};
use folio_core::ports::Attachment;
use folio_shared::dto::post_fields;

use crate::middleware::error::AppError;

/// Upper bound for a single text field; blog bodies live here.
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// Raw post form: every text field as sent, plus the optional image part.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub posted_by: Option<String>,
    pub blog_content: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub image: Option<Attachment>,
}

fn category_id(raw: Option<String>) -> Result<Option<Uuid>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid categoryId '{}'", value))),
    }
}

impl PostForm {
    pub fn into_draft(self) -> Result<(PostDraft, Option<Attachment>), AppError> {
        let draft = PostDraft {
            title: self.title,
            category_id: category_id(self.category_id)?,
            posted_by: self.posted_by,
            blog_content: self.blog_content,
            keywords: self.keywords,
            description: self.description,
        };
        Ok((draft, self.image))
    }

    pub fn into_patch(self) -> Result<(PostPatch, Option<Attachment>), AppError> {
        let patch = PostPatch {
            title: self.title,
            category_id: category_id(self.category_id)?,
            posted_by: self.posted_by,
            blog_content: self.blog_content,
            keywords: self.keywords,
            description: self.description,
        };
        Ok((patch, self.image))
    }
}

async fn read_field(field: &mut Field, name: &str, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk =
            chunk.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;
        if buf.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "Field '{}' exceeds the {} byte limit",
                name, limit
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Drain the multipart payload into a [`PostForm`]. File parts larger than
/// `max_upload_bytes` are rejected; unknown fields are skipped.
pub async fn read_post_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;
        let name = field.name().unwrap_or_default().to_string();

        if name == post_fields::IMAGE {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("upload")
                .to_string();
            let content_type = field
                .content_type()
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let bytes = read_field(&mut field, &name, max_upload_bytes).await?;
            // Browsers send an empty part for an untouched file input.
            if !bytes.is_empty() {
                form.image = Some(Attachment::new(file_name, content_type, bytes));
            }
            continue;
        }

        let bytes = read_field(&mut field, &name, MAX_TEXT_FIELD_BYTES).await?;
        let value = String::from_utf8(bytes)
            .map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name)))?;

        match name.as_str() {
            post_fields::TITLE => form.title = Some(value),
            post_fields::CATEGORY_ID => form.category_id = Some(value),
            post_fields::POSTED_BY => form.posted_by = Some(value),
            post_fields::BLOG_CONTENT => form.blog_content = Some(value),
            post_fields::KEYWORDS => form.keywords = Some(value),
            post_fields::DESCRIPTION => form.description = Some(value),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}
