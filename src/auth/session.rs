use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    config::SessionConfig,
    error::{AppError, FormError},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session";
const AUDIENCE: &str = "kwhcast-session";

/// Payload of the signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// Signing material and cookie policy for sessions.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
    cookie_secure: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.session)
    }
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
            cookie_secure: cfg.cookie_secure,
        }
    }

    pub fn sign(&self, username: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: username.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: AUDIENCE.to_owned(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(username, "session token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Associate the client holding `jar` with `username`.
    pub fn start_session(&self, jar: CookieJar, username: &str) -> anyhow::Result<CookieJar> {
        let token = self.sign(username)?;
        Ok(jar.add(
            Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .secure(self.cookie_secure)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::seconds(self.ttl.as_secs() as i64)),
        ))
    }

    /// The logged-in username, or `None` when the cookie is absent or fails verification.
    pub fn current_user(&self, jar: &CookieJar) -> Option<String> {
        let token = jar.get(SESSION_COOKIE)?;
        match self.verify(token.value()) {
            Ok(claims) => Some(claims.sub),
            Err(e) => {
                warn!(error = %e, "rejected session token");
                None
            }
        }
    }
}

pub fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Username of the authenticated caller, placed in request extensions by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = FormError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated.back_to("/login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str, issuer: &str) -> SessionKeys {
        SessionKeys::new(&SessionConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            ttl_minutes: 5,
            cookie_secure: false,
            secret_generated: false,
        })
    }

    fn jar_with(token: &str) -> CookieJar {
        CookieJar::new().add(Cookie::new(SESSION_COOKIE, token.to_owned()))
    }

    #[test]
    fn sign_and_verify() {
        let keys = keys("dev-secret", "test-iss");
        let token = keys.sign("alice").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "test-iss");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn start_session_sets_readable_cookie() {
        let keys = keys("dev-secret", "iss");
        let jar = keys.start_session(CookieJar::new(), "alice").unwrap();
        assert_eq!(keys.current_user(&jar).as_deref(), Some("alice"));
        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn foreign_secret_is_anonymous() {
        let token = keys("one", "iss").sign("alice").unwrap();
        assert!(keys("two", "iss").current_user(&jar_with(&token)).is_none());
    }

    #[test]
    fn wrong_issuer_is_anonymous() {
        let token = keys("same", "good").sign("alice").unwrap();
        assert!(keys("same", "bad").current_user(&jar_with(&token)).is_none());
    }

    #[test]
    fn tampered_token_is_anonymous() {
        let keys = keys("dev-secret", "iss");
        let mut token = keys.sign("alice").unwrap();
        token.push('x');
        assert!(keys.current_user(&jar_with(&token)).is_none());
        assert!(keys.current_user(&jar_with("garbage")).is_none());
    }

    #[test]
    fn no_cookie_is_anonymous() {
        assert!(keys("s", "i").current_user(&CookieJar::new()).is_none());
    }

    #[test]
    fn end_session_drops_cookie() {
        let keys = keys("dev-secret", "iss");
        let jar = keys.start_session(CookieJar::new(), "alice").unwrap();
        let jar = end_session(jar);
        assert!(keys.current_user(&jar).is_none());
    }
}
