use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use super::session::{SESSION_COOKIE, SessionClaims, SessionIssuer};
use crate::api::error::ApiError;

/// Verified caller identity, extracted from the session cookie
///
/// Taking `SessionUser` as a handler argument makes the route protected:
/// extraction fails with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub claims: SessionClaims,
}

impl SessionUser {
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    fn extract(req: &HttpRequest) -> Result<Self, ApiError> {
        let issuer = req.app_data::<web::Data<SessionIssuer>>().ok_or_else(|| {
            error!("SessionIssuer is not registered as app data");
            ApiError::Unauthorized
        })?;

        let cookie = req.cookie(SESSION_COOKIE).ok_or_else(|| {
            debug!("No session cookie on {} {}", req.method(), req.path());
            ApiError::Unauthorized
        })?;

        let claims = issuer.verify(cookie.value())?;
        Ok(SessionUser { claims })
    }
}

impl FromRequest for SessionUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
