//! Reading the session token from the request, either from the
//! `Authorization` header or from the session cookie set by the hosted
//! sign-in widget.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

/// The name of the cookie the hosted sign-in widget stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

const BEARER_PREFIX: &str = "Bearer ";

/// Get the session token from the request.
///
/// A bearer token in the `Authorization` header takes precedence over the
/// session cookie. Returns `None` if neither is present or non-empty.
pub(crate) fn get_session_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
}

/// Build a session cookie holding `token`.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build()
}
