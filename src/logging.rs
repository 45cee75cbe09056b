//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{AUTHORIZATION, COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{Error, auth::SESSION_COOKIE};

/// Request and response bodies longer than this many bytes are truncated in
/// the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body the server will read.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Session tokens in the `Authorization` header and the session cookie are
/// redacted before logging. Requests with a body larger than
/// [MAX_BODY_BYTES] are rejected with 413 Payload Too Large.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body for {}: {error}", parts.uri);
            return Error::PayloadTooLarge.into_response();
        }
    };

    let headers = redact_headers(&parts.headers);
    log_body(
        &format!("Received request: {} {}\nheaders: {headers:#?}", parts.method, parts.uri),
        "request",
        &body_bytes,
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };
    log_body(
        &format!(
            "Sending response: {}\nheaders: {:#?}",
            parts.status, parts.headers
        ),
        "response",
        &body_bytes,
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Copy `headers`, hiding the bearer token and the session cookie.
fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut redacted = headers.clone();

    if redacted.contains_key(AUTHORIZATION) {
        redacted.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    let cookies: Vec<HeaderValue> = redacted
        .get_all(COOKIE)
        .iter()
        .map(|value| match value.to_str() {
            Ok(text) => HeaderValue::from_str(&redact_session_cookie(text))
                .unwrap_or(HeaderValue::from_static(REDACTED)),
            Err(_) => HeaderValue::from_static(REDACTED),
        })
        .collect();

    redacted.remove(COOKIE);
    for cookie in cookies {
        redacted.append(COOKIE, cookie);
    }

    redacted
}

fn redact_session_cookie(cookie_header: &str) -> String {
    cookie_header
        .split(';')
        .map(|pair| {
            let pair = pair.trim();
            match pair.split_once('=') {
                Some((name, _)) if name == SESSION_COOKIE => format!("{name}={REDACTED}"),
                _ => pair.to_owned(),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn log_body(message: &str, label: &str, body: &[u8]) {
    let body = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("{message}\nbody: {}...", truncate(&body, LOG_BODY_LENGTH_LIMIT));
        tracing::debug!("Full {label} body: {body:?}");
    } else {
        tracing::info!("{message}\nbody: {body:?}");
    }
}

/// The longest prefix of `text` that fits in `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    let mut end = limit.min(text.len());

    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
