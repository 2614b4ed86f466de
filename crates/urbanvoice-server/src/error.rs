//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error(transparent)]
  Core(#[from] urbanvoice_core::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
  #[error("internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

fn internal(cause: &dyn std::fmt::Display) -> Response {
  // The cause stays in the log; callers only learn that it failed.
  tracing::error!(error = %cause, "request failed");
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "internal server error" })),
  )
    .into_response()
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    use urbanvoice_core::Error as Core;

    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"urbanvoice\""),
        );
        res
      }
      Error::Conflict(msg) => {
        (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
      }
      Error::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
      }
      Error::Core(e) => {
        let message = e.to_string();
        match e {
          Core::Validation { field, .. } => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message, "field": field })),
          )
            .into_response(),
          // Same body whether the complaint is missing or someone else's.
          Core::NotFound => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
              .into_response()
          }
          Core::Store(cause) => internal(&cause),
        }
      }
      Error::Store(e) => internal(&e),
      Error::Internal(msg) => internal(&msg),
    }
  }
}
