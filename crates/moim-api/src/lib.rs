//! JSON REST API for the moim party board.
//!
//! Exposes an axum [`Router`] backed by any [`moim_core::store::Backend`].
//! Caller identity arrives in the `x-moim-user` header; sessions, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", moim_api::api_router(state.clone()))
//! ```

pub mod catalog;
pub mod error;
pub mod identity;
pub mod membership;
pub mod parties;
pub mod users;
pub mod viewer;

use axum::{
  Router,
  routing::{get, post, put},
};
use moim_core::{
  lifecycle::Lifecycle,
  listing::{Listing, ListingConfig},
  membership::Membership,
  store::Backend,
};

pub use error::ApiError;
pub use identity::{Caller, MaybeCaller, USER_HEADER};

/// The three engines plus the raw store handle, threaded through all
/// handlers. Engines share one store; cloning the state is cheap whenever
/// the store handle is.
#[derive(Clone)]
pub struct ApiState<S> {
  pub lifecycle:  Lifecycle<S>,
  pub listing:    Listing<S>,
  pub membership: Membership<S>,
  pub directory:  S,
}

impl<S: Backend> ApiState<S> {
  /// Wire all engines onto one shared store handle.
  pub fn new(store: S, listing: ListingConfig) -> Self {
    Self {
      lifecycle:  Lifecycle::new(store.clone()),
      listing:    Listing::new(store.clone(), listing),
      membership: Membership::new(store.clone()),
      directory:  store,
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Backend>(state: ApiState<S>) -> Router<()> {
  Router::new()
    // Parties
    .route(
      "/parties",
      get(parties::browse::<S>).post(parties::create::<S>),
    )
    .route(
      "/parties/{id}",
      get(parties::detail::<S>)
        .put(parties::edit::<S>)
        .delete(parties::delete::<S>),
    )
    .route("/parties/{id}/close", post(parties::close::<S>))
    // Membership
    .route("/parties/{id}/join", post(membership::apply::<S>))
    .route(
      "/parties/{id}/join/{user_id}/accept",
      post(membership::accept::<S>),
    )
    .route(
      "/parties/{id}/bookmark",
      put(membership::add_bookmark::<S>)
        .delete(membership::remove_bookmark::<S>),
    )
    // Viewer lists
    .route("/me/parties", get(viewer::lists::<S>))
    // Catalog
    .route("/catalog/categories", get(catalog::categories))
    .route("/catalog/locations", get(catalog::locations))
    .route("/catalog/contact-methods", get(catalog::contact_methods))
    .route("/catalog/duration-units", get(catalog::duration_units))
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .with_state(state)
}
