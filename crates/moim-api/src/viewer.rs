//! Handler for `GET /me/parties`, the caller's personal party lists.

use axum::{
  Json,
  extract::{Query, State},
};
use moim_core::{
  listing::PartyListItem,
  store::{Backend, ViewerListKind},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, identity::Caller};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Which personal list to return.
  pub kind: ViewerListKind,
}

/// `GET /me/parties?kind=<not_closed_waiting|not_closed_accepted|closed|wrote|bookmarked>`
pub async fn lists<S: Backend>(
  State(state): State<ApiState<S>>,
  Caller(caller): Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PartyListItem>>, ApiError> {
  let items = state.listing.viewer_list(caller, params.kind).await?;
  Ok(Json(items))
}
