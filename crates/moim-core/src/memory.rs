//! In-memory backend.
//!
//! Implements the four store traits over `std::sync::RwLock`-guarded tables.
//! The engine tests run against this store; it is also handy for prototyping
//! without a SQLite file.

use std::{
  collections::HashMap,
  sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use uuid::Uuid;

use crate::{
  Result,
  bookmark::Bookmark,
  join::{JoinRequest, JoinStatus},
  party::Party,
  store::{
    BookmarkStore, BrowseFilter, JoinRequestStore, PageRequest, PartyRow,
    PartyStore, UserDirectory, ViewerListKind,
  },
  user::User,
};

/// Cheaply cloneable in-memory store; clones share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
  users:         HashMap<Uuid, User>,
  parties:       HashMap<Uuid, Party>,
  join_requests: HashMap<Uuid, JoinRequest>,
  /// Keyed by (party, user); one bookmark per pair.
  bookmarks:     HashMap<(Uuid, Uuid), Bookmark>,
}

impl MemoryStore {
  /// Create an empty store.
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> RwLockReadGuard<'_, Tables> {
    self.inner.read().expect("acquire shared read access on store")
  }

  fn write(&self) -> RwLockWriteGuard<'_, Tables> {
    self.inner.write().expect("acquire exclusive write access on store")
  }

  fn requests_with_status(
    &self,
    party_id: Uuid,
    status: JoinStatus,
  ) -> Vec<JoinRequest> {
    let tables = self.read();
    let mut requests: Vec<JoinRequest> = tables
      .join_requests
      .values()
      .filter(|request| request.party_id == party_id && request.status == status)
      .cloned()
      .collect();
    requests.sort_by(|a, b| {
      a.applied_at
        .cmp(&b.applied_at)
        .then(a.request_id.cmp(&b.request_id))
    });
    requests
  }
}

impl Tables {
  fn status_count(&self, party_id: Uuid, status: JoinStatus) -> u32 {
    self
      .join_requests
      .values()
      .filter(|request| request.party_id == party_id && request.status == status)
      .count() as u32
  }

  fn has_request(&self, party_id: Uuid, user_id: Uuid, status: JoinStatus) -> bool {
    self.join_requests.values().any(|request| {
      request.party_id == party_id
        && request.user_id == user_id
        && request.status == status
    })
  }

  fn has_bookmark(&self, party_id: Uuid, user_id: Uuid) -> bool {
    self.bookmarks.contains_key(&(party_id, user_id))
  }

  fn listing_row(
    &self,
    party: &Party,
    bookmarked_for: Option<Uuid>,
    with_closed: bool,
  ) -> PartyRow {
    PartyRow {
      party_id:       party.party_id,
      title:          party.title.clone(),
      category:       party.category,
      location:       party.location,
      recruit_number: party.recruit_number,
      closes_on:      party.closes_on,
      waiting_count:  self.status_count(party.party_id, JoinStatus::Waiting),
      accepted_count: self.status_count(party.party_id, JoinStatus::Accepted),
      bookmarked:     bookmarked_for
        .map(|user_id| self.has_bookmark(party.party_id, user_id)),
      closed:         with_closed.then_some(party.is_closed()),
    }
  }
}

fn sort_newest_first(parties: &mut [&Party]) {
  parties.sort_by(|a, b| {
    b.created_at
      .cmp(&a.created_at)
      .then(b.party_id.cmp(&a.party_id))
  });
}

impl PartyStore for MemoryStore {
  async fn save_party(&self, party: Party) -> Result<Party> {
    let mut tables = self.write();
    tables.parties.insert(party.party_id, party.clone());
    Ok(party)
  }

  async fn find_party(&self, id: Uuid) -> Result<Option<Party>> {
    Ok(self.read().parties.get(&id).cloned())
  }

  async fn browse_parties(
    &self,
    page: PageRequest,
    filter: BrowseFilter,
    viewer: Option<Uuid>,
  ) -> Result<Vec<PartyRow>> {
    let tables = self.read();
    let mut parties: Vec<&Party> = tables
      .parties
      .values()
      .filter(|party| !party.is_deleted())
      .filter(|party| filter.category.is_none_or(|c| party.category == c))
      .filter(|party| filter.location.is_none_or(|l| party.location == l))
      .collect();
    sort_newest_first(&mut parties);
    Ok(
      parties
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .map(|party| tables.listing_row(party, viewer, false))
        .collect(),
    )
  }

  async fn viewer_parties(
    &self,
    kind: ViewerListKind,
    viewer: Uuid,
  ) -> Result<Vec<PartyRow>> {
    let tables = self.read();
    let mut parties: Vec<&Party> = tables
      .parties
      .values()
      .filter(|party| !party.is_deleted())
      .filter(|party| match kind {
        ViewerListKind::NotClosedWaiting => {
          !party.is_closed()
            && tables.has_request(party.party_id, viewer, JoinStatus::Waiting)
        }
        ViewerListKind::NotClosedAccepted => {
          !party.is_closed()
            && tables.has_request(party.party_id, viewer, JoinStatus::Accepted)
        }
        ViewerListKind::Closed => {
          party.is_closed()
            && tables.has_request(party.party_id, viewer, JoinStatus::Accepted)
        }
        ViewerListKind::Wrote => party.author_id == viewer,
        ViewerListKind::Bookmarked => {
          tables.has_bookmark(party.party_id, viewer)
        }
      })
      .collect();
    sort_newest_first(&mut parties);

    let bookmarked_for = matches!(
      kind,
      ViewerListKind::NotClosedWaiting | ViewerListKind::NotClosedAccepted
    )
    .then_some(viewer);
    let with_closed = kind == ViewerListKind::Wrote;
    Ok(
      parties
        .into_iter()
        .map(|party| tables.listing_row(party, bookmarked_for, with_closed))
        .collect(),
    )
  }
}

impl JoinRequestStore for MemoryStore {
  async fn save_join_request(&self, request: JoinRequest) -> Result<JoinRequest> {
    let mut tables = self.write();
    tables.join_requests.insert(request.request_id, request.clone());
    Ok(request)
  }

  async fn find_join_request(
    &self,
    party_id: Uuid,
    user_id: Uuid,
  ) -> Result<Option<JoinRequest>> {
    let tables = self.read();
    Ok(
      tables
        .join_requests
        .values()
        .find(|request| {
          request.party_id == party_id && request.user_id == user_id
        })
        .cloned(),
    )
  }

  async fn waiting_for_party(&self, party_id: Uuid) -> Result<Vec<JoinRequest>> {
    Ok(self.requests_with_status(party_id, JoinStatus::Waiting))
  }

  async fn accepted_for_party(&self, party_id: Uuid) -> Result<Vec<JoinRequest>> {
    Ok(self.requests_with_status(party_id, JoinStatus::Accepted))
  }
}

impl BookmarkStore for MemoryStore {
  async fn save_bookmark(&self, bookmark: Bookmark) -> Result<Bookmark> {
    let mut tables = self.write();
    let kept = tables
      .bookmarks
      .entry((bookmark.party_id, bookmark.user_id))
      .or_insert(bookmark)
      .clone();
    Ok(kept)
  }

  async fn delete_bookmark(&self, party_id: Uuid, user_id: Uuid) -> Result<bool> {
    let mut tables = self.write();
    Ok(tables.bookmarks.remove(&(party_id, user_id)).is_some())
  }

  async fn delete_bookmarks_for_party(&self, party_id: Uuid) -> Result<u64> {
    let mut tables = self.write();
    let before = tables.bookmarks.len();
    tables.bookmarks.retain(|(party, _), _| *party != party_id);
    Ok((before - tables.bookmarks.len()) as u64)
  }
}

impl UserDirectory for MemoryStore {
  async fn save_user(&self, user: User) -> Result<User> {
    let mut tables = self.write();
    tables.users.insert(user.user_id, user.clone());
    Ok(user)
  }

  async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.read().users.get(&id).cloned())
  }
}
