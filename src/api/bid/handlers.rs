use actix_web::{
    HttpResponse, get, patch, post,
    web::{Data, Path, Query, ServiceConfig},
};
use actix_web_validator::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::models::{NewBid, StatusUpdate};
use super::service::BidService;
use crate::api::auth::SessionUser;
use crate::api::error::ApiError;

/// Query of `GET /bids/{email}`
#[derive(Debug, Default, Deserialize)]
pub struct BidListParams {
    /// Set to list bids received on the caller's jobs instead of bids placed
    #[serde(rename = "bayerEmail", alias = "asOwner")]
    pub owner_view: Option<String>,
}

impl BidListParams {
    /// Any value except empty, `false` or `0` selects the owner view
    pub fn as_owner(&self) -> bool {
        match self.owner_view.as_deref() {
            None | Some("") | Some("false") | Some("0") => false,
            Some(_) => true,
        }
    }
}

#[post("/add-bid")]
async fn create_bid(
    service: Data<BidService>,
    session: SessionUser,
    bid: Json<NewBid>,
) -> Result<HttpResponse, ApiError> {
    let result = service.create_bid(&session, bid.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/bids/{email}")]
async fn list_bids(
    service: Data<BidService>,
    session: SessionUser,
    email: Path<String>,
    params: Query<BidListParams>,
) -> Result<HttpResponse, ApiError> {
    let bids = service
        .list_bids(&email, params.as_owner(), &session)
        .await?;
    Ok(HttpResponse::Ok().json(bids))
}

#[patch("/status-updated/{id}")]
async fn update_bid_status(
    service: Data<BidService>,
    session: SessionUser,
    id: Path<Uuid>,
    update: Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let result = service
        .update_bid_status(id.into_inner(), update.current_status, &session)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

pub fn bid_config(config: &mut ServiceConfig) {
    config
        .service(create_bid)
        .service(list_bids)
        .service(update_bid_status);
}
