//! Verifies the session tokens issued by the external identity provider.

mod cookie;
mod middleware;
mod token;

pub use cookie::{SESSION_COOKIE, session_cookie};
pub use middleware::{AuthState, identity_middleware};
pub use token::{TokenIssuer, TokenVerifier};
