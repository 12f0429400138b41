use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by a single owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    /// Soft reference; the category may no longer exist.
    pub category_id: Uuid,
    pub posted_by: String,
    pub posted_on: DateTime<Utc>,
    pub blog_content: String,
    pub keywords: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub category_id: Uuid,
    pub posted_by: String,
    pub blog_content: String,
    pub keywords: String,
    pub description: String,
}

impl Post {
    /// Create a new post. `postedOn` is the creation time.
    pub fn new(owner_id: Uuid, fields: NewPost, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: fields.title.trim().to_string(),
            category_id: fields.category_id,
            posted_by: fields.posted_by,
            posted_on: now,
            blog_content: fields.blog_content,
            keywords: fields.keywords,
            description: fields.description,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A post joined with the name of its category, if it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub category_name: Option<String>,
}

/// Unvalidated input for post creation.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
    pub posted_by: Option<String>,
    pub blog_content: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PostDraft {
    /// Check that every required field is present and non-blank.
    ///
    /// On failure returns the camelCase names of the missing fields.
    pub fn validate(self) -> Result<NewPost, Vec<&'static str>> {
        let title = present(self.title);
        let posted_by = present(self.posted_by);
        let blog_content = present(self.blog_content);
        let keywords = present(self.keywords);
        let description = present(self.description);

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if self.category_id.is_none() {
            missing.push("categoryId");
        }
        if posted_by.is_none() {
            missing.push("postedBy");
        }
        if blog_content.is_none() {
            missing.push("blogContent");
        }
        if keywords.is_none() {
            missing.push("keywords");
        }
        if description.is_none() {
            missing.push("description");
        }

        match (
            title,
            self.category_id,
            posted_by,
            blog_content,
            keywords,
            description,
        ) {
            (
                Some(title),
                Some(category_id),
                Some(posted_by),
                Some(blog_content),
                Some(keywords),
                Some(description),
            ) => Ok(NewPost {
                title,
                category_id,
                posted_by,
                blog_content,
                keywords,
                description,
            }),
            _ => Err(missing),
        }
    }
}

/// Partial post update. Absent or blank fields leave the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
    pub posted_by: Option<String>,
    pub blog_content: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

impl PostPatch {
    /// The trimmed title, if one was supplied and differs from `current`.
    pub fn title_change(&self, current: &str) -> Option<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != current)
            .map(str::to_string)
    }

    /// Apply every present field except the title, which the registry checks
    /// for uniqueness first.
    pub fn apply_fields(self, post: &mut Post) {
        if let Some(category_id) = self.category_id {
            post.category_id = category_id;
        }
        if let Some(posted_by) = present(self.posted_by) {
            post.posted_by = posted_by;
        }
        if let Some(blog_content) = present(self.blog_content) {
            post.blog_content = blog_content;
        }
        if let Some(keywords) = present(self.keywords) {
            post.keywords = keywords;
        }
        if let Some(description) = present(self.description) {
            post.description = description;
        }
    }
}
