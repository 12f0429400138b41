//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub category_id: Uuid,
    pub posted_by: String,
    pub posted_on: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub blog_content: String,
    pub keywords: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Join path only: `category_id` is a soft reference with no foreign key, so
/// the category may be gone.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for folio_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            category_id: model.category_id,
            posted_by: model.posted_by,
            posted_on: model.posted_on.into(),
            blog_content: model.blog_content,
            keywords: model.keywords,
            description: model.description,
            image: model.image,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<folio_core::domain::Post> for ActiveModel {
    fn from(post: folio_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            owner_id: Set(post.owner_id),
            title: Set(post.title),
            category_id: Set(post.category_id),
            posted_by: Set(post.posted_by),
            posted_on: Set(post.posted_on.into()),
            blog_content: Set(post.blog_content),
            keywords: Set(post.keywords),
            description: Set(post.description),
            image: Set(post.image),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

/// Join a post row with its (possibly missing) category.
pub(crate) fn into_view(
    (post, category): (Model, Option<super::category::Model>),
) -> folio_core::domain::PostView {
    folio_core::domain::PostView {
        post: post.into(),
        category_name: category.map(|c| c.name),
    }
}
