//! CORS policy for browser clients.

use actix_cors::Cors;
use actix_web::http::Uri;

/// Build the CORS middleware. A `*` entry allows any origin; otherwise only
/// the listed origins are allowed and unparseable entries are skipped.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins.iter().fold(cors, |cors, origin| {
        if origin.parse::<Uri>().is_ok() {
            cors.allowed_origin(origin)
        } else {
            tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
            cors
        }
    })
}
