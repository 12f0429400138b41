use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use folio_core::ports::TokenService;
use folio_infra::{JwtConfig, JwtTokenService};

use super::{configure_extractors, configure_routes};
use crate::config::AttachmentConfig;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

const BOUNDARY: &str = "folio-test-boundary";

fn tokens() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig::default()))
}

fn bearer(owner: Uuid) -> (actix_web::http::header::HeaderName, String) {
    let token = tokens().generate_token(owner).unwrap();
    (AUTHORIZATION, format!("Bearer {token}"))
}

fn state() -> AppState {
    AppState::in_memory(&AttachmentConfig::default())
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state))
                .app_data(web::Data::new(tokens()))
                .configure(configure_extractors)
                .configure(configure_routes),
        )
        .await
    };
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

/// Encode text fields and an optional `(file name, content type, bytes)` image
/// part as `multipart/form-data`.
fn multipart(fields: &[(&str, &str)], image: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_form(owner: Uuid, uri: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(owner))
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn post_fields<'a>(title: &'a str, category_id: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", title),
        ("categoryId", category_id),
        ("postedBy", "Ada"),
        ("blogContent", "Tracing, metrics and logs."),
        ("keywords", "observability"),
        ("description", "An introduction"),
    ]
}

#[actix_web::test]
async fn test_health_echoes_request_id() {
    let app = app!(state());

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "trace-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-me")
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["requestId"], "trace-me");
}

#[actix_web::test]
async fn test_private_routes_require_token() {
    let app = app!(state());

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/categories/list"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert!(body.get("data").is_none());

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/posts/search")
            .insert_header((AUTHORIZATION, "Bearer not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_category_lifecycle() {
    let app = app!(state());
    let owner = Uuid::new_v4();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(owner))
            .set_json(json!({"name": " tech ", "title": "Tech", "keywords": "rust"}))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category created successfully");
    assert_eq!(body["data"]["name"], "tech");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(owner))
            .set_json(json!({"name": "tech", "title": "Again"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Category name already exists");

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(owner))
            .set_json(json!({"name": "life"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name and Title are required");

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/categories/{id}"))
            .insert_header(bearer(owner))
            .set_json(json!({"title": "Technology"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Technology");
    assert_eq!(body["data"]["keywords"], "rust");

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/categories/list")
            .insert_header(bearer(owner))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{"id": id, "name": "tech"}]));

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/categories/{id}"))
            .insert_header(bearer(Uuid::new_v4()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/categories/{id}"))
            .insert_header(bearer(owner))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data").is_none());

    let (status, body) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/categories/{id}"))
            .insert_header(bearer(owner))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[actix_web::test]
async fn test_rejected_input_uses_envelope() {
    let app = app!(state());
    let owner = Uuid::new_v4();

    let (status, body) = send!(
        app,
        test::TestRequest::put()
            .uri("/api/categories/not-a-uuid")
            .insert_header(bearer(owner))
            .set_json(json!({"title": "x"}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(owner))
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{\"name\": ")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories/search?orderParam=password")
            .insert_header(bearer(owner))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("orderParam"));

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri("/api/posts/public/view/42")
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_per_owner_titles_and_search_scopes() {
    let app = app!(state());
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let category = Uuid::new_v4().to_string();

    let (status, _) = send!(
        app,
        post_form(alice, "/api/posts", multipart(&post_fields("Intro", &category), None))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        post_form(alice, "/api/posts", multipart(&post_fields("Intro", &category), None))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Post with this title already exists");

    let (status, _) = send!(
        app,
        post_form(bob, "/api/posts", multipart(&post_fields("Intro", &category), None))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/posts/public/search?recordSize=1")
            .set_json(json!({"search": "INTRO"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalRecords"], 2);
    assert_eq!(body["pagination"]["recordSize"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/posts/search")
            .insert_header(bearer(alice))
            .set_json(json!({"search": "intro"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalRecords"], 1);
    assert_eq!(body["pagination"]["orderParam"], "createdAt");
    assert_eq!(body["pagination"]["orderType"], 1);
    assert_eq!(body["data"][0]["ownerId"], alice.to_string());
}

#[actix_web::test]
async fn test_post_with_image_lifecycle() {
    let app = app!(state());
    let owner = Uuid::new_v4();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(bearer(owner))
            .set_json(json!({"name": "ops", "title": "Operations"}))
    );
    assert_eq!(status, StatusCode::CREATED);
    let category = body["data"]["id"].as_str().unwrap().to_string();

    let png: &[u8] = &[0x89, b'P', b'N', b'G'];
    let (status, body) = send!(
        app,
        post_form(
            owner,
            "/api/posts",
            multipart(
                &post_fields("Observability Patterns", &category),
                Some(("cover.png", "image/png", png))
            )
        )
    );
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let image = body["data"]["image"].as_str().unwrap().to_string();
    assert!(image.ends_with(".png"));

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/public/view/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categoryName"], "ops");
    assert_eq!(body["data"]["title"], "Observability Patterns");

    let update = test::TestRequest::put()
        .uri(&format!("/api/posts/{id}"))
        .insert_header(bearer(owner))
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart(&[("keywords", "tracing")], None));
    let (status, body) = send!(app, update);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["keywords"], "tracing");
    assert_eq!(body["data"]["description"], "An introduction");
    assert_eq!(body["data"]["image"], image.as_str());

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(owner))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/public/view/{id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
}

#[actix_web::test]
async fn test_post_form_validation() {
    let app = app!(AppState::in_memory(&AttachmentConfig {
        max_bytes: 8,
        ..AttachmentConfig::default()
    }));
    let owner = Uuid::new_v4();
    let category = Uuid::new_v4().to_string();

    let (status, body) = send!(
        app,
        post_form(
            owner,
            "/api/posts",
            multipart(&[("title", "Lonely"), ("categoryId", category.as_str())], None)
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("blogContent"));

    let (status, _) = send!(
        app,
        post_form(
            owner,
            "/api/posts",
            multipart(&post_fields("Intro", "not-a-uuid"), None)
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        post_form(
            owner,
            "/api/posts",
            multipart(
                &post_fields("Intro", &category),
                Some(("anim.gif", "image/gif", &b"GIF89a"[..]))
            )
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        post_form(
            owner,
            "/api/posts",
            multipart(
                &post_fields("Intro", &category),
                Some(("big.png", "image/png", &[0u8; 64][..]))
            )
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("limit"));
}
