use actix_cors::Cors;
use actix_web::http::header;

/// Credentialed CORS for the configured frontend origins
///
/// Each origin is echoed back exactly; `Config` rejects `*`.
pub fn cors_policy(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}
