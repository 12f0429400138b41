//! Category handlers. Every route here requires an authenticated owner.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::domain::{CategoryDraft, CategoryPatch};
use folio_core::search::CategorySortField;
use folio_shared::ApiResponse;
use folio_shared::dto::{CategoryRequest, PageParams};

use super::search::{build_query, search_body, summary};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = CategoryDraft {
        name: req.name,
        title: req.title,
        keywords: req.keywords,
        description: req.description,
    };

    let category = state.categories.create(identity.owner_id, draft).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        201,
        "Category created successfully",
        category,
    )))
}

/// POST /api/categories/search
pub async fn search(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<PageParams>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let query = build_query::<CategorySortField>(&params, search_body(&body)?)?;
    let page = state.categories.search(identity.owner_id, &query).await?;
    let pagination = summary(&query, page.total_records);

    Ok(HttpResponse::Ok().json(ApiResponse::page(
        "Categories fetched successfully",
        page.records,
        pagination,
    )))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = CategoryPatch {
        name: req.name,
        title: req.title,
        keywords: req.keywords,
        description: req.description,
    };

    let category = state
        .categories
        .update(identity.owner_id, path.into_inner(), patch)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        200,
        "Category updated successfully",
        category,
    )))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .categories
        .delete(identity.owner_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(200, "Category deleted successfully")))
}

/// GET /api/categories/list
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let summaries = state.categories.list(identity.owner_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        200,
        "Category list fetched successfully",
        summaries,
    )))
}
