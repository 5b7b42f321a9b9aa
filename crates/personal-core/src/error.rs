//! Error types for `personal-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// An input value failed validation before reaching any store.
  #[error("invalid {field}: {reason}")]
  Validation { field: &'static str, reason: String },

  #[error("a person cannot be related to itself")]
  SelfRelation,

  #[error("cannot {action} while {from}")]
  InvalidTransition {
    from:   &'static str,
    action: &'static str,
  },

  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: i64 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Validation { field, reason: reason.into() }
  }

  /// Box an arbitrary backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
