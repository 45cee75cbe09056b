//! Fintrack is a web app for managing your personal finances.
//!
//! This library provides a JSON REST API for the accounts a user keeps track
//! of. Every account belongs to exactly one user and every query made on
//! behalf of a request is scoped to the user that made it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod response;
mod routing;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId, AccountName, OwnerScope, create_account};
pub use app_state::AppState;
pub use auth::{SESSION_COOKIE, TokenIssuer, TokenVerifier, session_cookie};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_BODY_BYTES, logging_middleware};
pub use routing::build_router;
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request does not carry a verified user.
    ///
    /// Every account route responds with this error before touching the
    /// database when the identity middleware could not attach a user ID.
    #[error("unauthorized")]
    Unauthorized,

    /// The session token could not be verified.
    ///
    /// The string holds the reason for debugging on the server, it is never
    /// sent to the client.
    #[error("invalid session token: {0}")]
    InvalidToken(String),

    /// A session token could not be created.
    #[error("could not issue session token: {0}")]
    TokenIssueError(String),

    /// The account ID in the request path was empty.
    #[error("id is required")]
    MissingId,

    /// The request body or path failed validation.
    ///
    /// The string describes which field failed and why, and is safe to show
    /// to the client.
    #[error("{0}")]
    InvalidRequest(String),

    /// An empty string was used to create an account name.
    #[error("Account name cannot be empty")]
    EmptyAccountName,

    /// The account does not exist or is owned by another user.
    ///
    /// The client cannot tell the two cases apart.
    #[error("Account not found")]
    AccountNotFound,

    /// The requested resource was not found.
    #[error("Not found")]
    NotFound,

    /// The request body was larger than [MAX_BODY_BYTES].
    #[error("Payload too large")]
    PayloadTooLarge,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
const INTERNAL_SERVER_ERROR_MESSAGE: &str =
    "An unexpected error occurred, check the server logs for more details.";

impl Error {
    /// The HTTP status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized | Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::MissingId | Error::InvalidRequest(_) | Error::EmptyAccountName => {
                StatusCode::BAD_REQUEST
            }
            Error::AccountNotFound | Error::NotFound => StatusCode::NOT_FOUND,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::TokenIssueError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Error::Unauthorized | Error::InvalidToken(_) => (
                status,
                Json(ErrorBody {
                    error: "Unauthorized",
                    message: None,
                }),
            )
                .into_response(),
            Error::MissingId
            | Error::InvalidRequest(_)
            | Error::EmptyAccountName
            | Error::AccountNotFound
            | Error::NotFound
            | Error::PayloadTooLarge => {
                let error = self.to_string();
                (
                    status,
                    Json(ErrorBody {
                        error: &error,
                        message: None,
                    }),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    status,
                    Json(ErrorBody {
                        error: INTERNAL_SERVER_ERROR,
                        message: Some(INTERNAL_SERVER_ERROR_MESSAGE),
                    }),
                )
                    .into_response()
            }
        }
    }
}
