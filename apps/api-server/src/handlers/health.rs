//! Health check endpoint.

use actix_web::HttpResponse;
use folio_shared::ApiResponse;
use serde::Serialize;

use crate::observability::RequestId;

#[derive(Serialize)]
pub struct HealthResponse {
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check(request_id: RequestId) -> HttpResponse {
    let response = HealthResponse {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok()
        .json(ApiResponse::ok(200, "ok", response).with_request_id(request_id.as_str()))
}
