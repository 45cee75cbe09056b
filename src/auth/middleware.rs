//! Identity middleware that verifies the session token and attaches the user to the request.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{AppState, auth::TokenVerifier, auth::cookie::get_session_token};

/// The state needed for the identity middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Verifies the session tokens issued by the identity provider.
    pub token_verifier: TokenVerifier,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_verifier: state.token_verifier.clone(),
        }
    }
}

/// Middleware function that looks for a valid session token.
///
/// If the token verifies, the [UserId](crate::UserId) is placed into the
/// request extensions. The request is executed either way: missing or invalid
/// tokens are not rejected here, route handlers that need a user take a
/// `UserId` argument which rejects the request with a 401.
pub async fn identity_middleware(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match get_session_token(request.headers(), &jar) {
        Some(token) => match state.token_verifier.verify(&token) {
            Ok(user_id) => {
                tracing::debug!("Verified session token for user {user_id}");
                request.extensions_mut().insert(user_id);
            }
            Err(error) => {
                tracing::debug!("Rejected session token: {error}");
            }
        },
        None => {
            tracing::debug!("No session token in request to {}", request.uri().path());
        }
    }

    next.run(request).await
}
