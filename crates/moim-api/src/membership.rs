//! Handlers for join-request and bookmark endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/parties/{id}/join` | Apply; returns 201 + the waiting request |
//! | `POST`   | `/parties/{id}/join/{user_id}/accept` | Author admits an applicant |
//! | `PUT`    | `/parties/{id}/bookmark` | Idempotent; returns the stored bookmark |
//! | `DELETE` | `/parties/{id}/bookmark` | 204 when removed, 404 when absent |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use moim_core::{bookmark::Bookmark, join::JoinRequest, store::Backend};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, identity::Caller};

/// `POST /parties/{id}/join` — the caller applies and starts out waiting.
pub async fn apply<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  let request = state.membership.apply(caller, id).await?;
  Ok((StatusCode::CREATED, Json(request)))
}

/// `POST /parties/{id}/join/{user_id}/accept` — author-only; idempotent.
pub async fn accept<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<JoinRequest>, ApiError> {
  let request = state.membership.accept(caller, id, user_id).await?;
  Ok(Json(request))
}

/// `PUT /parties/{id}/bookmark` — keeps the first bookmark on repeat calls.
pub async fn add_bookmark<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Bookmark>, ApiError> {
  let bookmark = state.membership.add_bookmark(caller, id).await?;
  Ok(Json(bookmark))
}

/// `DELETE /parties/{id}/bookmark`
pub async fn remove_bookmark<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let removed = state.membership.remove_bookmark(caller, id).await?;
  Ok(if removed {
    StatusCode::NO_CONTENT
  } else {
    StatusCode::NOT_FOUND
  })
}
