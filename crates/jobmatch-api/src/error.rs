//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use jobmatch_core::{Error as CoreError, SignupError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] CoreError),

  #[error(transparent)]
  Signup(#[from] SignupError),
}

fn core_status(e: &CoreError) -> StatusCode {
  match e {
    CoreError::UnknownRole(_) | CoreError::MissingField { .. } => {
      StatusCode::BAD_REQUEST
    }
    CoreError::NotAnAgent(_) => StatusCode::FORBIDDEN,
    CoreError::EmailTaken(_) => StatusCode::CONFLICT,
    CoreError::RemoteProvisioning(_) => StatusCode::BAD_GATEWAY,
    CoreError::Account(_) | CoreError::Persistence { .. } => {
      StatusCode::INTERNAL_SERVER_ERROR
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => core_status(e),
      ApiError::Signup(e) => core_status(&e.source),
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use jobmatch_core::provision::SignupStage;

  use super::*;

  fn status(e: ApiError) -> StatusCode { e.into_response().status() }

  #[test]
  fn only_taken_emails_conflict() {
    let taken = SignupError {
      stage:  SignupStage::Started,
      source: CoreError::EmailTaken("a@x.com".into()),
    };
    assert_eq!(status(taken.into()), StatusCode::CONFLICT);

    let outage = SignupError {
      stage:  SignupStage::Started,
      source: CoreError::Account(Box::new(std::io::Error::other("db down"))),
    };
    assert_eq!(status(outage.into()), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
