//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use moim_core::Error;
use serde_json::json;
use thiserror::Error as ThisError;

/// An error returned by an API handler.
///
/// Everything the engines raise converts in with `?`; `Unauthorized` is the
/// one HTTP-only case, raised by the identity extractors.
#[derive(Debug, ThisError)]
pub enum ApiError {
  #[error("missing or malformed caller identity header")]
  Unauthorized,

  #[error(transparent)]
  Core(#[from] Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Core(error) => match error {
        Error::UserNotFound(_)
        | Error::PartyNotFound(_)
        | Error::JoinRequestNotFound { .. } => StatusCode::NOT_FOUND,
        Error::NotAuthor(_) => StatusCode::FORBIDDEN,
        Error::PartyClosed(_)
        | Error::AlreadyApplied { .. }
        | Error::OwnParty(_) => StatusCode::CONFLICT,
        Error::CategoryNotModifiable
        | Error::RecruitNumberNotIncreasing
        | Error::InvalidClosingDate
        | Error::PageSizeExceeded { .. } => StatusCode::BAD_REQUEST,
        Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
