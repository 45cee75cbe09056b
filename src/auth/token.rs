//! Defines the session token claims and how tokens are issued and verified.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserId};

/// The claims carried by a session token.
///
/// Only `sub` is used by this application, it holds the user ID assigned by
/// the identity provider.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verifies session tokens signed with a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for HS256 tokens signed with `secret`.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify `token` and return the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidToken] if the signature does not match, the token
    /// has expired or is malformed, or the subject is blank.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| Error::InvalidToken(error.to_string()))?;

        UserId::new(&token_data.claims.sub)
            .map_err(|_| Error::InvalidToken("blank subject".to_owned()))
    }
}

/// Issues session tokens signed with a shared secret.
///
/// In production tokens come from the identity provider. This is used by the
/// `issue_token` utility and the tests.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    /// Create an issuer for HS256 tokens signed with `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `user_id` that expires `valid_for` from now.
    ///
    /// A negative `valid_for` produces an already expired token.
    ///
    /// # Errors
    ///
    /// Returns [Error::TokenIssueError] if the token could not be signed.
    pub fn issue(&self, user_id: &UserId, valid_for: Duration) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id.as_str().to_owned(),
            iat: now.unix_timestamp(),
            exp: (now + valid_for).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| Error::TokenIssueError(error.to_string()))
    }
}
