//! Store traits and supporting query types.
//!
//! The four traits are implemented by storage backends (`moim-store-sqlite`,
//! [`MemoryStore`](crate::memory::MemoryStore)). The engines depend on these
//! abstractions, never on a concrete backend. Backend faults surface as
//! [`Error::Store`](crate::Error::Store) so the engines' own rejection kinds
//! stay distinguishable.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  bookmark::Bookmark,
  join::JoinRequest,
  party::{ActivityLocation, Category, Party},
  user::User,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// One page of a browse query. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: u32,
  pub size: u32,
}

impl PageRequest {
  /// Row offset of this page, widened so large page numbers cannot
  /// overflow.
  pub fn offset(self) -> u64 { u64::from(self.page) * u64::from(self.size) }
}

/// Optional filters for the public browse query.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowseFilter {
  pub category: Option<Category>,
  pub location: Option<ActivityLocation>,
}

/// Which of the viewer's party sets to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerListKind {
  /// Open parties the viewer applied to and is still waiting on.
  NotClosedWaiting,
  /// Open parties the viewer was accepted into.
  NotClosedAccepted,
  /// Closed parties the viewer was accepted into.
  Closed,
  /// Parties the viewer authored, closed ones included.
  Wrote,
  /// Parties the viewer bookmarked.
  Bookmarked,
}

/// An aggregated listing row as the store produces it.
///
/// `bookmarked` and `closed` are filled only by the queries whose list kind
/// calls for them; they stay `None` otherwise.
#[derive(Debug, Clone)]
pub struct PartyRow {
  pub party_id:       Uuid,
  pub title:          String,
  pub category:       Category,
  pub location:       ActivityLocation,
  pub recruit_number: u32,
  pub closes_on:      NaiveDate,
  pub waiting_count:  u32,
  pub accepted_count: u32,
  pub bookmarked:     Option<bool>,
  pub closed:         Option<bool>,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Durable party records plus the two aggregated listing queries.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PartyStore: Send + Sync {
  /// Insert a party, or fully overwrite the row with the same id.
  fn save_party(
    &self,
    party: Party,
  ) -> impl Future<Output = Result<Party>> + Send + '_;

  /// Fetch a party by id. Soft-deleted parties are returned too; liveness
  /// filtering is the engines' concern.
  fn find_party(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Party>>> + Send + '_;

  /// One page of non-deleted parties matching `filter`, newest first with
  /// the id as tiebreak. When `viewer` is given, each row's `bookmarked`
  /// flag is filled.
  fn browse_parties(
    &self,
    page: PageRequest,
    filter: BrowseFilter,
    viewer: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<PartyRow>>> + Send + '_;

  /// The viewer-scoped sets backing [`ViewerListKind`], newest first.
  /// `NotClosedWaiting` and `NotClosedAccepted` rows carry `bookmarked`;
  /// `Wrote` rows carry `closed`.
  fn viewer_parties(
    &self,
    kind: ViewerListKind,
    viewer: Uuid,
  ) -> impl Future<Output = Result<Vec<PartyRow>>> + Send + '_;
}

/// Durable join-request records.
pub trait JoinRequestStore: Send + Sync {
  /// Insert a join request, or overwrite the row with the same id (used to
  /// flip the status on acceptance).
  fn save_join_request(
    &self,
    request: JoinRequest,
  ) -> impl Future<Output = Result<JoinRequest>> + Send + '_;

  /// The unique join request for a (party, user) pair, if any.
  fn find_join_request(
    &self,
    party_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<JoinRequest>>> + Send + '_;

  /// All `Waiting` requests on a party, oldest application first.
  fn waiting_for_party(
    &self,
    party_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JoinRequest>>> + Send + '_;

  /// All `Accepted` requests on a party, oldest application first.
  fn accepted_for_party(
    &self,
    party_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JoinRequest>>> + Send + '_;
}

/// Durable bookmark records.
pub trait BookmarkStore: Send + Sync {
  /// Insert a bookmark. If one already exists for the same (party, user)
  /// pair the existing record is kept and returned.
  fn save_bookmark(
    &self,
    bookmark: Bookmark,
  ) -> impl Future<Output = Result<Bookmark>> + Send + '_;

  /// Remove one user's bookmark on one party. Returns whether a record
  /// existed.
  fn delete_bookmark(
    &self,
    party_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Remove every bookmark referencing `party_id`; the cascade issued when
  /// a party closes or is deleted. Returns the number removed.
  fn delete_bookmarks_for_party(
    &self,
    party_id: Uuid,
  ) -> impl Future<Output = Result<u64>> + Send + '_;
}

/// User identity resolution and provisioning.
pub trait UserDirectory: Send + Sync {
  /// Insert a user, or overwrite the record with the same id.
  fn save_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Look up a user by id.
  fn find_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;
}

/// The full backend bound, named once. Blanket-implemented for anything that
/// implements the four store traits and is cheaply cloneable.
pub trait Backend:
  PartyStore
  + JoinRequestStore
  + BookmarkStore
  + UserDirectory
  + Clone
  + Send
  + Sync
  + 'static
{
}

impl<T> Backend for T where
  T: PartyStore
    + JoinRequestStore
    + BookmarkStore
    + UserDirectory
    + Clone
    + Send
    + Sync
    + 'static
{
}
