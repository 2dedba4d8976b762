use actix_web::{
    HttpResponse, get, post,
    web::{Data, ServiceConfig},
};
use actix_web_validator::Json;
use tracing::info;

use super::session::{Identity, SessionIssuer};
use crate::api::error::ApiError;

/// Mint a session cookie for the posted identity
#[post("/jwt")]
async fn issue_session(
    issuer: Data<SessionIssuer>,
    identity: Json<Identity>,
) -> Result<HttpResponse, ApiError> {
    let identity = identity.into_inner();
    info!("Issuing session for {}", identity.email);

    let cookie = issuer.issue(identity)?;
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "success": true })))
}

#[get("/logout")]
async fn logout(issuer: Data<SessionIssuer>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(issuer.revoke())
        .json(serde_json::json!({ "success": true }))
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(issue_session).service(logout);
}

#[cfg(test)]
mod tests {
    use crate::api;
    use crate::api::auth::session::SESSION_COOKIE;
    use crate::api::test_support::issuer;
    use crate::db::MemoryStore;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[actix_web::test]
    async fn jwt_sets_cookie_that_unlocks_protected_routes() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), 4096)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/jwt")
            .set_json(json!({ "email": "a@x.com", "name": "Ada" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned())
            .unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true }));

        let req = test::TestRequest::get()
            .uri("/jobs/a@x.com")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn jwt_requires_an_email() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), 4096)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/jwt")
            .set_json(json!({ "name": "Ada" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn logout_clears_cookie() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), 4096)),
        )
        .await;

        let req = test::TestRequest::get().uri("/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
    }
}
