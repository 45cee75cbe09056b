//! The identity of the user making a request.

use std::fmt::Display;

use axum::{extract::FromRequestParts, http::request::Parts};
use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for the user IDs issued by the identity provider.
///
/// The ID is opaque to this application, it is only ever compared for
/// equality and stored alongside the rows the user owns.
///
/// Route handlers take a `UserId` as their first argument to require a
/// verified user. The extractor rejects with [Error::Unauthorized] when the
/// identity middleware did not attach one to the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthorized] if `id` is empty or only whitespace, since
    /// such an ID cannot identify anyone.
    pub fn new(id: &str) -> Result<Self, Error> {
        if id.trim().is_empty() {
            Err(Error::Unauthorized)
        } else {
            Ok(Self(id.to_owned()))
        }
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserId>()
            .cloned()
            .ok_or(Error::Unauthorized)
    }
}
