//! In-memory repositories - used when `DATABASE_URL` is not set, and in tests.
//!
//! Both stores enforce the same per-owner uniqueness the PostgreSQL indexes do,
//! checked under the write lock so concurrent inserts cannot both succeed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{Category, CategorySummary, Post, PostView};
use folio_core::error::RepoError;
use folio_core::ports::{BaseRepository, CategoryRepository, PostRepository};
use folio_core::search::{CategorySortField, Page, PostSortField, SearchQuery, paginate};

/// In-memory category store.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn name_of(&self, id: Uuid) -> Option<String> {
        self.store.read().await.get(&id).map(|c| c.name.clone())
    }
}

fn name_taken(store: &HashMap<Uuid, Category>, candidate: &Category) -> bool {
    store.values().any(|c| {
        c.id != candidate.id && c.owner_id == candidate.owner_id && c.name == candidate.name
    })
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn insert(&self, entity: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&entity.id) {
            return Err(RepoError::Constraint("categories_pkey".to_string()));
        }
        if name_taken(&store, &entity) {
            return Err(RepoError::Constraint("idx_categories_owner_name".to_string()));
        }
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        if name_taken(&store, &entity) {
            return Err(RepoError::Constraint("idx_categories_owner_name".to_string()));
        }
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .get(&id)
            .filter(|c| c.owner_id == owner)
            .cloned())
    }

    async fn find_by_name(&self, owner: Uuid, name: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|c| c.owner_id == owner && c.name == name)
            .cloned())
    }

    async fn list_summaries(&self, owner: Uuid) -> Result<Vec<CategorySummary>, RepoError> {
        let mut summaries: Vec<CategorySummary> = self
            .store
            .read()
            .await
            .values()
            .filter(|c| c.owner_id == owner)
            .map(CategorySummary::from)
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    async fn search(
        &self,
        owner: Uuid,
        query: &SearchQuery<CategorySortField>,
    ) -> Result<Page<Category>, RepoError> {
        let store = self.store.read().await;
        let owned = store.values().filter(|c| c.owner_id == owner).cloned();
        Ok(paginate(owned, query))
    }
}

/// In-memory post store. Category names for joins are read from the category
/// repository it was built with.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
    categories: Arc<InMemoryCategoryRepository>,
}

impl InMemoryPostRepository {
    pub fn new(categories: Arc<InMemoryCategoryRepository>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            categories,
        }
    }

    async fn view(&self, post: Post) -> PostView {
        let category_name = self.categories.name_of(post.category_id).await;
        PostView {
            post,
            category_name,
        }
    }
}

fn title_taken(store: &HashMap<Uuid, Post>, candidate: &Post) -> bool {
    store.values().any(|p| {
        p.id != candidate.id && p.owner_id == candidate.owner_id && p.title == candidate.title
    })
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&entity.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        if title_taken(&store, &entity) {
            return Err(RepoError::Constraint("idx_posts_owner_title".to_string()));
        }
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        if title_taken(&store, &entity) {
            return Err(RepoError::Constraint("idx_posts_owner_title".to_string()));
        }
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .get(&id)
            .filter(|p| p.owner_id == owner)
            .cloned())
    }

    async fn find_by_title(
        &self,
        owner: Uuid,
        title: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|p| p.owner_id == owner && p.title == title && Some(p.id) != excluding)
            .cloned())
    }

    async fn search(
        &self,
        owner: Option<Uuid>,
        query: &SearchQuery<PostSortField>,
    ) -> Result<Page<PostView>, RepoError> {
        let scoped: Vec<Post> = self
            .store
            .read()
            .await
            .values()
            .filter(|p| owner.is_none_or(|o| p.owner_id == o))
            .cloned()
            .collect();

        let page = paginate(scoped, query);
        let mut records = Vec::with_capacity(page.records.len());
        for post in page.records {
            records.push(self.view(post).await);
        }

        Ok(Page {
            records,
            total_records: page.total_records,
        })
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let post = self.store.read().await.get(&id).cloned();
        match post {
            Some(post) => Ok(Some(self.view(post).await)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::domain::NewPost;

    fn post(owner: Uuid, title: &str, category_id: Uuid) -> Post {
        Post::new(
            owner,
            NewPost {
                title: title.to_string(),
                category_id,
                posted_by: "tester".to_string(),
                blog_content: "body".to_string(),
                keywords: "k".to_string(),
                description: "d".to_string(),
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_category_name_constraint_is_per_owner() {
        let repo = InMemoryCategoryRepository::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        repo.insert(Category::new(a, "tech", "Tech".into(), None, None))
            .await
            .unwrap();
        let dup = repo
            .insert(Category::new(a, "tech", "Again".into(), None, None))
            .await;
        assert!(matches!(dup, Err(RepoError::Constraint(_))));

        repo.insert(Category::new(b, "tech", "Tech".into(), None, None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_summaries_sorted_by_name() {
        let repo = InMemoryCategoryRepository::new();
        let owner = Uuid::new_v4();
        for name in ["zeta", "alpha", "mid"] {
            repo.insert(Category::new(owner, name, name.into(), None, None))
                .await
                .unwrap();
        }
        repo.insert(Category::new(Uuid::new_v4(), "other", "o".into(), None, None))
            .await
            .unwrap();

        let names: Vec<_> = repo
            .list_summaries(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_post_view_tolerates_dangling_category() {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let owner = Uuid::new_v4();
        let tech = categories
            .insert(Category::new(owner, "tech", "Tech".into(), None, None))
            .await
            .unwrap();
        let repo = InMemoryPostRepository::new(categories.clone());

        let joined = repo.insert(post(owner, "Joined", tech.id)).await.unwrap();
        let dangling = repo
            .insert(post(owner, "Dangling", Uuid::new_v4()))
            .await
            .unwrap();

        let view = repo.find_view(joined.id).await.unwrap().unwrap();
        assert_eq!(view.category_name.as_deref(), Some("tech"));

        let view = repo.find_view(dangling.id).await.unwrap().unwrap();
        assert_eq!(view.category_name, None);
    }

    #[tokio::test]
    async fn test_post_update_rejects_title_collision() {
        let repo = InMemoryPostRepository::new(Arc::new(InMemoryCategoryRepository::new()));
        let owner = Uuid::new_v4();
        let category = Uuid::new_v4();
        repo.insert(post(owner, "First", category)).await.unwrap();
        let mut second = repo.insert(post(owner, "Second", category)).await.unwrap();

        second.title = "First".to_string();
        assert!(matches!(
            repo.update(second).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_rows() {
        let repo = InMemoryPostRepository::new(Arc::new(InMemoryCategoryRepository::new()));
        let ghost = post(Uuid::new_v4(), "Ghost", Uuid::new_v4());

        assert!(matches!(
            repo.update(ghost.clone()).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(repo.delete(ghost.id).await, Err(RepoError::NotFound)));
    }
}
