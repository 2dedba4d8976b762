use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tracing::error;

use crate::db::Store;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl HealthResponse {
    fn new(status: &str, database: &str, error: Option<String>) -> Self {
        Self {
            status: status.to_string(),
            database: database.to_string(),
            error,
        }
    }
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("Marketplace server is running")
}

/// Health check endpoint
///
/// General health check including store connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(store: web::Data<dyn Store>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::new("healthy", "connected", None)),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::new(
                "unhealthy",
                "disconnected",
                Some(format!("Database error: {}", e)),
            ))
        }
    }
}

/// Readiness check endpoint
///
/// Returns 503 while the store is unreachable; the process recovers on its
/// own once it comes back.
#[get("/ready")]
async fn readiness_check(store: web::Data<dyn Store>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::new("ready", "connected", None)),
        Err(e) => {
            error!("Readiness check failed: database unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::new(
                "not_ready",
                "disconnected",
                Some(format!("Database unavailable: {}", e)),
            ))
        }
    }
}

/// Liveness check endpoint; does not touch the store
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::new("alive", "not_checked", None))
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(index)
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
