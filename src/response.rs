//! The JSON envelope for successful responses.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A successful response, serialized as `{"data": ...}` with status 200 OK.
#[derive(Debug, Serialize, PartialEq)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
