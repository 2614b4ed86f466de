//! Error types for `urbanvoice-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A submitted field is missing or not one of the accepted values.
  #[error("invalid {field}: {reason}")]
  Validation {
    field:  &'static str,
    reason: String,
  },

  /// The complaint does not exist, or exists but belongs to another citizen.
  /// Both cases share one variant so callers cannot probe for ownership.
  #[error("complaint not found or you are not authorized")]
  NotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn missing(field: &'static str) -> Self {
    Self::Validation { field, reason: "is required".to_owned() }
  }

  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
