use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::job::models::strip_reserved;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Tokens and cookies live for one day
pub const SESSION_TTL_HOURS: i64 = 24;

const RESERVED_CLAIMS: &[&str] = &["iat", "exp", "nbf", "iss", "aud", "sub", "jti"];

/// Identity payload posted to `/jwt`
///
/// Anything besides `email` is carried into the token untouched.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Identity {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Decoded session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

/// Mints, verifies and clears session cookies
///
/// `secure` mirrors the deployment environment: production cookies are
/// `Secure` + `SameSite=None` so a separately hosted frontend can send them,
/// everything else gets `SameSite=Strict` over plain HTTP.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    secure: bool,
}

impl SessionIssuer {
    pub fn new(secret: &str, secure: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            secure,
        }
    }

    /// Sign a token for `identity` valid from `issued_at` for one day
    pub fn token_at(&self, identity: Identity, issued_at: DateTime<Utc>) -> Result<String, ApiError> {
        let Identity { email, mut profile } = identity;
        strip_reserved(&mut profile, RESERVED_CLAIMS);

        let claims = SessionClaims {
            email,
            profile,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };

        debug!("Issuing session for {}, expires at {}", claims.email, claims.exp);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(ApiError::Session)
    }

    /// Sign a fresh token and wrap it in the session cookie
    pub fn issue(&self, identity: Identity) -> Result<Cookie<'static>, ApiError> {
        let token = self.token_at(identity, Utc::now())?;
        Ok(self.cookie(token))
    }

    /// Removal cookie with the same attributes as the issued one
    pub fn revoke(&self) -> Cookie<'static> {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        cookie
    }

    /// Check signature and expiry; every failure is `Unauthorized`
    pub fn verify(&self, token: &str) -> Result<SessionClaims, ApiError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("Rejected session token: {}", e);
                ApiError::Unauthorized
            })
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        let same_site = if self.secure {
            SameSite::None
        } else {
            SameSite::Strict
        };

        Cookie::build(SESSION_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(same_site)
            .max_age(CookieDuration::hours(SESSION_TTL_HOURS))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(email: &str) -> Identity {
        serde_json::from_value(json!({ "email": email, "name": "Ada", "exp": 1 })).unwrap()
    }

    #[test]
    fn issued_token_verifies_with_identity() {
        let issuer = SessionIssuer::new("test-secret", false);
        let token = issuer.token_at(identity("a@x.com"), Utc::now()).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.profile.get("name"), Some(&json!("Ada")));
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_HOURS * 3600);
    }

    #[test]
    fn token_is_accepted_until_expiry() {
        let issuer = SessionIssuer::new("test-secret", false);

        let almost_expired = Utc::now() - Duration::hours(SESSION_TTL_HOURS) + Duration::minutes(5);
        let token = issuer.token_at(identity("a@x.com"), almost_expired).unwrap();
        assert!(issuer.verify(&token).is_ok());

        let expired = Utc::now() - Duration::hours(SESSION_TTL_HOURS) - Duration::minutes(5);
        let token = issuer.token_at(identity("a@x.com"), expired).unwrap();
        assert!(matches!(issuer.verify(&token), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let ours = SessionIssuer::new("secret-one", false);
        let theirs = SessionIssuer::new("secret-two", false);
        let token = theirs.token_at(identity("a@x.com"), Utc::now()).unwrap();

        assert!(matches!(ours.verify(&token), Err(ApiError::Unauthorized)));
        assert!(matches!(ours.verify("not.a.token"), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn cookie_flags_follow_environment() {
        let dev = SessionIssuer::new("s", false).issue(identity("a@x.com")).unwrap();
        assert_eq!(dev.name(), SESSION_COOKIE);
        assert_eq!(dev.http_only(), Some(true));
        assert_eq!(dev.secure(), Some(false));
        assert_eq!(dev.same_site(), Some(SameSite::Strict));

        let prod = SessionIssuer::new("s", true).issue(identity("a@x.com")).unwrap();
        assert_eq!(prod.secure(), Some(true));
        assert_eq!(prod.same_site(), Some(SameSite::None));
    }

    #[test]
    fn revoke_clears_the_cookie() {
        let cookie = SessionIssuer::new("s", true).revoke();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }
}
