//! Session gate and cookie handling.
//!
//! The gate runs ahead of every navigational request, independent of the
//! data flow: unauthenticated requests to protected destinations are
//! redirected to the login page, the application root is redirected to the
//! catalog listing, and a corrupt credential is dropped on the way back to
//! login. The gate fails open toward login, never toward exposing protected
//! content.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{error::AppError, models::SessionToken};

/// Cookie carrying the session credential
pub const SESSION_COOKIE: &str = "token";

/// Destinations reachable without a session credential
fn is_public(path: &str) -> bool {
    matches!(path, "/login" | "/register" | "/health")
}

/// Session cookie set on login success
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Removal cookie used on logout and on credential verification failure
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Middleware gating every route
pub async fn session_gate(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();

    match jar.get(SESSION_COOKIE) {
        None if !is_public(path) => {
            return Redirect::temporary("/login").into_response();
        }
        Some(cookie) if cookie.value().trim().is_empty() => {
            // Corrupt credential: clear it and route to re-authentication.
            let jar = jar.remove(expired_session_cookie());
            return (jar, Redirect::temporary("/login")).into_response();
        }
        _ => {}
    }

    if path == "/" {
        return Redirect::temporary("/library").into_response();
    }

    next.run(request).await
}

/// Extractor for the session credential on protected handlers
pub struct Session(pub SessionToken);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Authentication("Missing session credential".to_string()))?;

        Ok(Session(SessionToken::new(token)))
    }
}
