//! Category registry.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Category, CategoryDraft, CategoryPatch, CategorySummary};
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;
use crate::search::{CategorySortField, Page, SearchQuery};

const ENTITY: &str = "Category";
const DUPLICATE_NAME: &str = "Category name already exists";

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Owner-scoped category operations.
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, owner: Uuid, draft: CategoryDraft) -> Result<Category, DomainError> {
        let (Some(name), Some(title)) = (required(draft.name), required(draft.title)) else {
            return Err(DomainError::Validation(
                "Name and Title are required".to_string(),
            ));
        };

        let name = name.trim();
        if self.repo.find_by_name(owner, name).await?.is_some() {
            return Err(DomainError::Duplicate(DUPLICATE_NAME.to_string()));
        }

        let category = Category::new(owner, name, title, draft.keywords, draft.description);
        let saved = self.repo.insert(category).await.map_err(duplicate_name)?;

        tracing::info!(owner = %owner, category_id = %saved.id, "Category created");
        Ok(saved)
    }

    /// Apply the present fields of `patch`. Renaming onto an existing name is
    /// rejected by the storage constraint rather than a pre-check.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Category, DomainError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty())
            || patch.title.as_deref().is_some_and(|t| t.trim().is_empty())
        {
            return Err(DomainError::Validation(
                "Name and Title cannot be empty".to_string(),
            ));
        }

        let mut category = self
            .repo
            .find_owned(owner, id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        if !patch.apply(&mut category) {
            return Ok(category);
        }

        let saved = self.repo.update(category).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => duplicate_name(other),
        })?;

        tracing::info!(owner = %owner, category_id = %id, "Category updated");
        Ok(saved)
    }

    /// Delete an owned category. Posts referencing it are left untouched.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        if self.repo.find_owned(owner, id).await?.is_none() {
            return Err(DomainError::not_found(ENTITY, id));
        }

        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => other.into(),
        })?;

        tracing::info!(owner = %owner, category_id = %id, "Category deleted");
        Ok(())
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<CategorySummary>, DomainError> {
        Ok(self.repo.list_summaries(owner).await?)
    }

    pub async fn search(
        &self,
        owner: Uuid,
        query: &SearchQuery<CategorySortField>,
    ) -> Result<Page<Category>, DomainError> {
        Ok(self.repo.search(owner, query).await?)
    }
}

fn duplicate_name(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Duplicate(DUPLICATE_NAME.to_string()),
        other => other.into(),
    }
}
