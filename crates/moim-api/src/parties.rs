//! Handlers for `/parties` lifecycle and listing endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/parties` | `?size` required; optional `page`, `category`, `location` |
//! | `POST`   | `/parties` | Body: [`PartyDraft`]; returns 201 + the new id |
//! | `GET`    | `/parties/{id}` | Detail view, shaped by the caller's role |
//! | `PUT`    | `/parties/{id}` | Body: [`PartyDraft`]; author only |
//! | `POST`   | `/parties/{id}/close` | Author only; purges bookmarks |
//! | `DELETE` | `/parties/{id}` | Soft delete; author only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use moim_core::{
  listing::{PartyDetail, PartyListItem},
  party::{ActivityLocation, Category, PartyDraft},
  store::{Backend, BrowseFilter, PageRequest},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  identity::{Caller, MaybeCaller},
};

// ─── Browse ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
  /// Zero-based page index. Defaults to the first page.
  #[serde(default)]
  pub page:     u32,
  /// Requested page size; capped by the server's listing configuration.
  pub size:     u32,
  /// If set, restrict to one category (wire name, e.g. `study`).
  pub category: Option<Category>,
  /// If set, restrict to one activity location.
  pub location: Option<ActivityLocation>,
}

/// `GET /parties?size=20[&page=0][&category=study][&location=seoul]`
///
/// Anonymous callers get plain rows; identified callers additionally get a
/// `bookmarked` flag per row.
pub async fn browse<S: Backend>(
  State(state): State<ApiState<S>>,
  MaybeCaller(viewer): MaybeCaller,
  Query(params): Query<BrowseParams>,
) -> Result<Json<Vec<PartyListItem>>, ApiError> {
  let filter = BrowseFilter {
    category: params.category,
    location: params.location,
  };
  let page = PageRequest { page: params.page, size: params.size };
  let items = state.listing.browse(filter, page, viewer).await?;
  Ok(Json(items))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /parties` — body: [`PartyDraft`]; returns 201 and the new party id.
pub async fn create<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Json(draft): Json<PartyDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let party_id = state.lifecycle.create(caller, draft).await?;
  Ok((StatusCode::CREATED, Json(json!({ "party_id": party_id }))))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// `GET /parties/{id}` — anonymous callers get the public projection only.
pub async fn detail<S: Backend>(
  State(state): State<ApiState<S>>,
  MaybeCaller(viewer): MaybeCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<PartyDetail>, ApiError> {
  let detail = state.listing.detail(id, viewer).await?;
  Ok(Json(detail))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `PUT /parties/{id}` — body: [`PartyDraft`]; returns the edited id.
pub async fn edit<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Uuid>,
  Json(draft): Json<PartyDraft>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let party_id = state.lifecycle.edit(caller, id, draft).await?;
  Ok(Json(json!({ "party_id": party_id })))
}

// ─── Close ────────────────────────────────────────────────────────────────────

/// `POST /parties/{id}/close` — stops recruiting and unlocks the contact for
/// accepted applicants.
pub async fn close<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let party_id = state.lifecycle.close(caller, id).await?;
  Ok(Json(json!({ "party_id": party_id })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /parties/{id}` — soft delete; the id disappears from every list
/// and every follow-up read.
pub async fn delete<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.lifecycle.delete(caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
