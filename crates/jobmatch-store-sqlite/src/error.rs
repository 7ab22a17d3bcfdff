//! Error type for `jobmatch-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A primary key or unique constraint rejected the write.
  #[error("duplicate row in {0}")]
  Conflict(&'static str),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unexpected column value: {0}")]
  Decode(String),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl Error {
  /// Map a failed write on `table`, turning constraint violations into
  /// [`Error::Conflict`].
  pub(crate) fn on_write(table: &'static str, e: tokio_rusqlite::Error) -> Self {
    match &e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
        if f.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Self::Conflict(table)
      }
      _ => Self::Database(e),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
