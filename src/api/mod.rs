pub mod auth;
pub mod bid;
pub mod cors;
pub mod dto;
pub mod error;
pub mod health;
pub mod job;
pub mod policy;
pub mod validation;

#[cfg(test)]
pub mod test_support;

use actix_web::web;
use std::sync::Arc;

use crate::db::Store;
use auth::SessionIssuer;

/// Register shared state, extractor configs and every route
///
/// Used by the server for each worker and by handler tests.
pub fn configure(
    store: Arc<dyn Store>,
    issuer: SessionIssuer,
    max_payload_size: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |config| {
        config
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(job::JobService::new(store.clone())))
            .app_data(web::Data::new(bid::BidService::new(store)))
            .app_data(web::Data::new(issuer))
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config(max_payload_size))
            .app_data(validation::path_config())
            .app_data(validation::query_config())
            .configure(health::health_config)
            .configure(auth::handlers::auth_config)
            .configure(job::handlers::job_config)
            .configure(bid::handlers::bid_config);
    }
}
