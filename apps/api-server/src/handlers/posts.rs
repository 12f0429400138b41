//! Post handlers. Create, update, delete and search are owner-scoped; the
//! `public` routes need no token.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::search::PostSortField;
use folio_shared::ApiResponse;
use folio_shared::dto::PageParams;

use super::multipart::read_post_form;
use super::search::{build_query, search_body, summary};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts (multipart)
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload, state.max_upload_bytes).await?;
    let (draft, image) = form.into_draft()?;

    let post = state.posts.create(identity.owner_id, draft, image).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(201, "Post created successfully", post)))
}

/// POST /api/posts/search
pub async fn search(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<PageParams>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let query = build_query::<PostSortField>(&params, search_body(&body)?)?;
    let page = state.posts.search(identity.owner_id, &query).await?;
    let pagination = summary(&query, page.total_records);

    Ok(HttpResponse::Ok().json(ApiResponse::page(
        "Posts fetched successfully",
        page.records,
        pagination,
    )))
}

/// PUT /api/posts/{id} (multipart)
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_post_form(payload, state.max_upload_bytes).await?;
    let (patch, image) = form.into_patch()?;

    let post = state
        .posts
        .update(identity.owner_id, path.into_inner(), patch, image)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(200, "Post updated successfully", post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.owner_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(200, "Post deleted successfully")))
}

/// POST /api/posts/public/search
pub async fn public_search(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let query = build_query::<PostSortField>(&params, search_body(&body)?)?;
    let page = state.posts.public_search(&query).await?;
    let pagination = summary(&query, page.total_records);

    Ok(HttpResponse::Ok().json(ApiResponse::page(
        "Posts fetched successfully",
        page.records,
        pagination,
    )))
}

/// GET /api/posts/public/view/{id}
pub async fn public_view(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state.posts.public_view(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(200, "Post fetched successfully", view)))
}
