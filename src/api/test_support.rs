//! Fixtures shared by handler and service tests.

use actix_web::cookie::Cookie;
use serde_json::{Map, json};
use uuid::Uuid;

use crate::api::auth::session::{Identity, SessionClaims};
use crate::api::auth::{SessionIssuer, SessionUser};
use crate::api::bid::models::NewBid;
use crate::api::job::models::NewJob;

pub const SECRET: &str = "test-session-secret";

pub fn issuer() -> SessionIssuer {
    SessionIssuer::new(SECRET, false)
}

pub fn session(email: &str) -> SessionUser {
    SessionUser {
        claims: SessionClaims {
            email: email.to_string(),
            profile: Map::new(),
            iat: 0,
            exp: 0,
        },
    }
}

pub fn session_cookie(email: &str) -> Cookie<'static> {
    let identity: Identity = serde_json::from_value(json!({ "email": email })).unwrap();
    issuer().issue(identity).unwrap()
}

pub fn new_job(title: &str, category: &str, deadline: &str, owner: &str) -> NewJob {
    serde_json::from_value(json!({
        "title": title,
        "category": category,
        "deadline": deadline,
        "owner": { "email": owner },
        "description": format!("{} for {}", title, owner)
    }))
    .unwrap()
}

pub fn new_bid(job_id: Uuid, bidder: &str) -> NewBid {
    serde_json::from_value(json!({
        "id": job_id,
        "email": bidder,
        "price": 150,
        "comment": "Can start tomorrow"
    }))
    .unwrap()
}
