//! Error type for `jobmatch-server`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[from] jobmatch_store_sqlite::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("function {name} returned {status}: {body}")]
  FunctionStatus {
    name:   String,
    status: reqwest::StatusCode,
    body:   String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
