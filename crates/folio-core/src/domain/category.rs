use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - an owner-scoped grouping for posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub title: String,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category. `name` is stored trimmed.
    pub fn new(
        owner_id: Uuid,
        name: &str,
        title: String,
        keywords: Option<String>,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.trim().to_string(),
            title,
            keywords,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `{id, name}` projection returned by the category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

/// Unvalidated input for category creation.
#[derive(Debug, Clone, Default)]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

/// Partial category update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    /// Apply the present fields. Returns `true` if anything changed.
    pub fn apply(self, category: &mut Category) -> bool {
        let mut changed = false;
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
            changed = true;
        }
        if let Some(title) = self.title {
            category.title = title;
            changed = true;
        }
        if let Some(keywords) = self.keywords {
            category.keywords = Some(keywords);
            changed = true;
        }
        if let Some(description) = self.description {
            category.description = Some(description);
            changed = true;
        }
        if changed {
            category.updated_at = Utc::now();
        }
        changed
    }
}
