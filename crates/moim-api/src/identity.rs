//! Caller identity extractors.
//!
//! Sessions and sign-in live upstream; requests arrive with the
//! authenticated user's id in the [`USER_HEADER`] header and the extractors
//! trust it as-is. Whether the id names a real user is checked per
//! operation by the engines, not here.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-moim-user";

/// Required caller identity. Rejects with 401 when the header is missing or
/// does not parse as a UUID.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Uuid);

/// Optional caller identity: `None` when the header is absent. A present
/// but malformed header still rejects, so a typo never silently demotes a
/// caller to anonymous.
#[derive(Debug, Clone, Copy)]
pub struct MaybeCaller(pub Option<Uuid>);

fn header_uuid(parts: &Parts) -> Result<Option<Uuid>, ApiError> {
  let Some(value) = parts.headers.get(USER_HEADER) else {
    return Ok(None);
  };
  let text = value.to_str().map_err(|_| ApiError::Unauthorized)?;
  let id = text.parse().map_err(|_| ApiError::Unauthorized)?;
  Ok(Some(id))
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    header_uuid(parts)?.map(Caller).ok_or(ApiError::Unauthorized)
  }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeCaller {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Ok(MaybeCaller(header_uuid(parts)?))
  }
}
