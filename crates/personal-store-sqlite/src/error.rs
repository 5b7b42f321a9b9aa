//! Error type for `personal-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] personal_core::Error),

  /// A UNIQUE, CHECK, NOT NULL or FOREIGN KEY constraint rejected the write.
  #[error("constraint violated: {0}")]
  Constraint(String),

  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: i64 },

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A stored value could not be mapped back to a domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg))
        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Self::Constraint(msg.unwrap_or_else(|| e.to_string()))
      }
      other => Self::Database(other),
    }
  }
}

impl Error {
  pub fn is_constraint(&self) -> bool { matches!(self, Self::Constraint(_)) }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
