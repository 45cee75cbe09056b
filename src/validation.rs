//! Schema-described validation of JSON request bodies.
//!
//! Each request type declares a [Schema] listing its fields. The
//! [ValidatedJson] extractor checks the raw JSON body against the schema
//! before deserializing it, so handlers only ever see well-formed input and
//! clients get a message naming the offending field.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Error;

/// The JSON type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    String,
    /// A JSON array where every element is a string.
    StringArray,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::StringArray => "an array of strings",
        }
    }
}

/// An extra check applied to a field once its type is known to be correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// No constraint beyond the field's type.
    None,
    /// The string must contain something other than whitespace.
    NonBlank,
}

/// Describes a single field of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub constraint: Constraint,
}

/// Describes the fields of a JSON object.
///
/// Fields not named in the schema are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub fields: &'static [Field],
}

impl Schema {
    /// Check `value` against the schema.
    ///
    /// Fields are checked in declaration order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRequest] if `value` is not an object, a required
    /// field is missing, or a field has the wrong type or violates its constraint.
    pub fn validate(&self, value: &Value) -> Result<(), Error> {
        let object = value.as_object().ok_or_else(|| {
            Error::InvalidRequest("request body must be a JSON object".to_owned())
        })?;

        self.fields
            .iter()
            .try_for_each(|field| field.validate(object))
    }
}

impl Field {
    fn validate(&self, object: &Map<String, Value>) -> Result<(), Error> {
        let value = match object.get(self.name) {
            None | Some(Value::Null) if self.required => {
                return Err(Error::InvalidRequest(format!("{} is required", self.name)));
            }
            None | Some(Value::Null) => return Ok(()),
            Some(value) => value,
        };

        if !self.kind.matches(value) {
            return Err(Error::InvalidRequest(format!(
                "{} must be {}",
                self.name,
                self.kind.describe()
            )));
        }

        match self.constraint {
            Constraint::None => Ok(()),
            Constraint::NonBlank => match value.as_str() {
                Some(text) if text.trim().is_empty() => Err(Error::InvalidRequest(format!(
                    "{} must not be empty",
                    self.name
                ))),
                _ => Ok(()),
            },
        }
    }
}

/// A request body type with a declared [Schema].
pub trait RequestSchema: DeserializeOwned {
    /// The schema the raw JSON body is checked against.
    const SCHEMA: Schema;
}

/// Extractor for a JSON body that has been checked against `T`'s schema.
///
/// Rejects with [Error::InvalidRequest] if the body is not JSON, fails the
/// schema, or cannot be deserialized into `T`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: RequestSchema + Send,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(request, state).await?;

        T::SCHEMA.validate(&value)?;

        serde_json::from_value(value)
            .map(ValidatedJson)
            .map_err(|error| Error::InvalidRequest(error.to_string()))
    }
}
