use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, Query, ServiceConfig},
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::dto::JobSearchParams;
use super::models::{JobQuery, JobUpdate, NewJob};
use super::service::JobService;
use crate::api::auth::SessionUser;
use crate::api::error::ApiError;

#[post("/add-job")]
async fn create_job(
    service: Data<JobService>,
    session: SessionUser,
    job: Json<NewJob>,
) -> Result<HttpResponse, ApiError> {
    let result = service.create_job(&session, job.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/jobs")]
async fn list_jobs(service: Data<JobService>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(service.list_jobs().await?))
}

#[get("/jobs/{email}")]
async fn list_jobs_by_owner(
    service: Data<JobService>,
    session: SessionUser,
    email: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let jobs = service.list_jobs_by_owner(&email, &session).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/job/{id}")]
async fn get_job(service: Data<JobService>, id: Path<Uuid>) -> Result<HttpResponse, ApiError> {
    // a missing job is an empty result, not an error
    let job = service.get_job(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[put("/update-job/{id}")]
async fn update_job(
    service: Data<JobService>,
    session: SessionUser,
    id: Path<Uuid>,
    update: Json<JobUpdate>,
) -> Result<HttpResponse, ApiError> {
    let result = service
        .update_job(id.into_inner(), update.into_inner(), &session)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[delete("/job/{id}")]
async fn delete_job(
    service: Data<JobService>,
    session: SessionUser,
    id: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let result = service.delete_job(id.into_inner(), &session).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/all-jobs")]
async fn search_jobs(
    service: Data<JobService>,
    params: Query<JobSearchParams>,
) -> Result<HttpResponse, ApiError> {
    let query = JobQuery::from(params.into_inner());
    Ok(HttpResponse::Ok().json(service.search_jobs(&query).await?))
}

pub fn job_config(config: &mut ServiceConfig) {
    config
        .service(create_job)
        .service(list_jobs)
        .service(list_jobs_by_owner)
        .service(get_job)
        .service(update_job)
        .service(delete_job)
        .service(search_jobs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::api::job::models::Job;
    use crate::api::test_support::{issuer, session_cookie};
    use crate::db::MemoryStore;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    const LIMIT: usize = 1024 * 1024;

    fn logo_job() -> Value {
        json!({
            "title": "Logo Design",
            "category": "design",
            "deadline": "2024-06-01",
            "owner": { "email": "a@x.com", "name": "Ada" },
            "minPrice": 50,
            "maxPrice": 200
        })
    }

    #[actix_web::test]
    async fn add_job_requires_session() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/add-job")
            .set_json(logo_job())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn created_job_round_trips_over_http() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/add-job")
            .cookie(session_cookie("a@x.com"))
            .set_json(logo_job())
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["acknowledged"], json!(true));
        let id = created["insertedId"].as_str().unwrap().to_string();

        let req = test::TestRequest::get().uri(&format!("/job/{}", id)).to_request();
        let job: Job = test::call_and_read_body_json(&app, req).await;
        assert_eq!(job.title, "Logo Design");
        assert_eq!(job.bid_count, 0);
        assert_eq!(job.details.get("maxPrice"), Some(&json!(200)));

        let req = test::TestRequest::get().uri("/jobs").to_request();
        let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(jobs.len(), 1);
    }

    #[actix_web::test]
    async fn missing_job_is_null() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/job/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"null");
    }

    #[actix_web::test]
    async fn malformed_id_is_a_bad_request() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let req = test::TestRequest::get().uri("/job/not-an-id").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn owner_listing_rejects_other_sessions() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/add-job")
            .cookie(session_cookie("a@x.com"))
            .set_json(logo_job())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/jobs/a@x.com")
            .cookie(session_cookie("b@y.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "unauthorized access" }));

        let req = test::TestRequest::get()
            .uri("/jobs/a@x.com")
            .cookie(session_cookie("a@x.com"))
            .to_request();
        let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(jobs.len(), 1);
    }

    #[actix_web::test]
    async fn all_jobs_accepts_empty_params_and_any_sort() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/add-job")
            .cookie(session_cookie("a@x.com"))
            .set_json(logo_job())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/all-jobs?filter=&search=&sort=")
            .to_request();
        let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(jobs.len(), 1);

        let req = test::TestRequest::get()
            .uri("/all-jobs?filter=web&search=logo")
            .to_request();
        let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;
        assert!(jobs.is_empty());

        let req = test::TestRequest::get().uri("/all-jobs?sort=up").to_request();
        let jobs: Vec<Job> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(jobs.len(), 1);
    }

    #[actix_web::test]
    async fn update_and_delete_over_http() {
        let app = test::init_service(
            App::new().configure(api::configure(Arc::new(MemoryStore::new()), issuer(), LIMIT)),
        )
        .await;

        let id = Uuid::new_v4();
        let req = test::TestRequest::put()
            .uri(&format!("/update-job/{}", id))
            .cookie(session_cookie("a@x.com"))
            .set_json(logo_job())
            .to_request();
        let result: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(result["upsertedId"], json!(id.to_string()));

        let req = test::TestRequest::delete()
            .uri(&format!("/job/{}", id))
            .cookie(session_cookie("b@y.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete()
            .uri(&format!("/job/{}", id))
            .cookie(session_cookie("a@x.com"))
            .to_request();
        let result: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(result, json!({ "acknowledged": true, "deletedCount": 1 }));
    }
}
