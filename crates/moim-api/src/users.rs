//! Handlers for `/users` directory endpoints.
//!
//! Accounts, credentials, and sessions live upstream; this surface only
//! provisions the nickname directory the board reads.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use moim_core::{store::Backend, user::User};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct NewUserBody {
  pub nickname: String,
}

/// `POST /users` — body: `{"nickname": "..."}`; returns 201 + the user.
pub async fn create<S: Backend>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewUserBody>,
) -> Result<impl IntoResponse, ApiError> {
  let user = state.directory.save_user(User::new(body.nickname)).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_one<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
  let user = state
    .directory
    .find_user(id)
    .await?
    .ok_or(moim_core::Error::UserNotFound(id))?;
  Ok(Json(user))
}
