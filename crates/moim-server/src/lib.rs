//! HTTP server assembly for the moim party board.
//!
//! Pulls the pieces together: a [`ServerConfig`] loaded from TOML and the
//! environment, a store opened by the binary, and the JSON API from
//! [`moim_api`] mounted under `/api` with request tracing.

use axum::Router;
use moim_api::ApiState;
use moim_core::{listing::ListingConfig, store::Backend};
use serde::Deserialize;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `moim.toml`. Every field
/// has a default, so an absent file yields a working local setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  pub max_page_size: u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8080,
      store_path:    PathBuf::from("moim.db"),
      max_page_size: 30,
    }
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Assemble the full application router over an opened store.
pub fn app<S: Backend>(store: S, config: &ServerConfig) -> Router {
  let listing = ListingConfig { max_page_size: config.max_page_size };
  Router::new()
    .nest("/api", moim_api::api_router(ApiState::new(store, listing)))
    .layer(TraceLayer::new_for_http())
}
