//! PostgreSQL repository implementations.
//!
//! Searches push the engine's contract down into SQL: `LOWER(col) LIKE` for the
//! substring filter, `COUNT(*)` before paging, and an `id` tie-break after the
//! requested ordering.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use folio_core::domain::{Category, CategorySummary, Post, PostView};
use folio_core::error::RepoError;
use folio_core::ports::{CategoryRepository, PostRepository};
use folio_core::search::{
    CategorySortField, Page, PostSortField, SearchQuery, SortDirection, SortKey,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

fn escaped_like(pattern: String) -> LikeExpr {
    LikeExpr::new(pattern).escape('\\')
}

fn category_sort_column(field: CategorySortField) -> category::Column {
    match field {
        CategorySortField::Name => category::Column::Name,
        CategorySortField::Title => category::Column::Title,
        CategorySortField::CreatedAt => category::Column::CreatedAt,
        CategorySortField::UpdatedAt => category::Column::UpdatedAt,
    }
}

fn post_sort_column(field: PostSortField) -> post::Column {
    match field {
        PostSortField::Title => post::Column::Title,
        PostSortField::PostedBy => post::Column::PostedBy,
        PostSortField::PostedOn => post::Column::PostedOn,
        PostSortField::CreatedAt => post::Column::CreatedAt,
        PostSortField::UpdatedAt => post::Column::UpdatedAt,
    }
}

impl PostgresCategoryRepository {
    fn search_filter(
        owner: Uuid,
        query: &SearchQuery<CategorySortField>,
    ) -> Select<CategoryEntity> {
        let mut select = CategoryEntity::find().filter(category::Column::OwnerId.eq(owner));
        if let Some(pattern) = query.like_pattern() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((
                    CategoryEntity,
                    category::Column::Name,
                ))))
                .like(escaped_like(pattern)),
            );
        }
        select
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(id)
            .filter(category::Column::OwnerId.eq(owner))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, owner: Uuid, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::OwnerId.eq(owner))
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_summaries(&self, owner: Uuid) -> Result<Vec<CategorySummary>, RepoError> {
        let rows: Vec<(Uuid, String)> = CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::Name)
            .filter(category::Column::OwnerId.eq(owner))
            .order_by_asc(category::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CategorySummary { id, name })
            .collect())
    }

    async fn search(
        &self,
        owner: Uuid,
        query: &SearchQuery<CategorySortField>,
    ) -> Result<Page<Category>, RepoError> {
        let select = Self::search_filter(owner, query);

        let total_records = select
            .clone()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        let direction = order(query.direction);
        let rows = select
            .order_by(category_sort_column(query.sort), direction.clone())
            .order_by(category::Column::Id, direction)
            .offset(query.start)
            .limit(query.record_size)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(
            owner = %owner,
            total = total_records,
            order_param = query.sort.param(),
            "Category search"
        );

        Ok(Page {
            records: rows.into_iter().map(Into::into).collect(),
            total_records,
        })
    }
}

impl PostgresPostRepository {
    fn search_filter(
        owner: Option<Uuid>,
        query: &SearchQuery<PostSortField>,
    ) -> Select<PostEntity> {
        let mut select = PostEntity::find();
        if let Some(owner) = owner {
            select = select.filter(post::Column::OwnerId.eq(owner));
        }
        if let Some(pattern) = query.like_pattern() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((PostEntity, post::Column::Title))))
                    .like(escaped_like(pattern)),
            );
        }
        select
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::OwnerId.eq(owner))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_title(
        &self,
        owner: Uuid,
        title: &str,
        excluding: Option<Uuid>,
    ) -> Result<Option<Post>, RepoError> {
        let mut select = PostEntity::find()
            .filter(post::Column::OwnerId.eq(owner))
            .filter(post::Column::Title.eq(title));
        if let Some(id) = excluding {
            select = select.filter(post::Column::Id.ne(id));
        }

        let result = select.one(&self.db).await.map_err(map_db_err)?;
        Ok(result.map(Into::into))
    }

    async fn search(
        &self,
        owner: Option<Uuid>,
        query: &SearchQuery<PostSortField>,
    ) -> Result<Page<PostView>, RepoError> {
        let select = Self::search_filter(owner, query);

        let total_records = select
            .clone()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        let direction = order(query.direction);
        let rows = select
            .find_also_related(CategoryEntity)
            .order_by(post_sort_column(query.sort), direction.clone())
            .order_by(post::Column::Id, direction)
            .offset(query.start)
            .limit(query.record_size)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(
            owner = ?owner,
            total = total_records,
            order_param = query.sort.param(),
            "Post search"
        );

        Ok(Page {
            records: rows.into_iter().map(post::into_view).collect(),
            total_records,
        })
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(post::into_view))
    }
}
