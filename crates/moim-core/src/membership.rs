//! Membership engine: join applications and bookmarks.
//!
//! Thin validation over the store. Applying is only possible while a party
//! is open; accepting stays possible after closing so an author can keep
//! admitting people from the waiting list (acceptance on a closed party is
//! also what unlocks the contact value for that applicant).

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{live_party, resolve_user},
  bookmark::Bookmark,
  join::{JoinRequest, JoinStatus},
  store::{BookmarkStore, JoinRequestStore, PartyStore, UserDirectory},
};

/// Membership engine over a store handle.
#[derive(Debug, Clone)]
pub struct Membership<S> {
  store: S,
}

impl<S> Membership<S> {
  pub fn new(store: S) -> Self { Self { store } }
}

impl<S> Membership<S>
where
  S: PartyStore + JoinRequestStore + BookmarkStore + UserDirectory,
{
  /// Apply to join an open party. One application per (party, user); the
  /// author cannot apply to their own party.
  pub async fn apply(&self, caller: Uuid, party_id: Uuid) -> Result<JoinRequest> {
    resolve_user(&self.store, caller).await?;
    let party = live_party(&self.store, party_id).await?;
    if party.is_closed() {
      return Err(Error::PartyClosed(party_id));
    }
    if party.is_author(caller) {
      return Err(Error::OwnParty(party_id));
    }
    if self
      .store
      .find_join_request(party_id, caller)
      .await?
      .is_some()
    {
      return Err(Error::AlreadyApplied { party: party_id, user: caller });
    }
    self
      .store
      .save_join_request(JoinRequest::new(party_id, caller))
      .await
  }

  /// Accept an applicant. Author-only; repeat acceptance is a no-op that
  /// returns the stored request.
  pub async fn accept(
    &self,
    caller: Uuid,
    party_id: Uuid,
    applicant: Uuid,
  ) -> Result<JoinRequest> {
    let party = live_party(&self.store, party_id).await?;
    if !party.is_author(caller) {
      return Err(Error::NotAuthor(caller));
    }
    let mut request = self
      .store
      .find_join_request(party_id, applicant)
      .await?
      .ok_or(Error::JoinRequestNotFound { party: party_id, user: applicant })?;
    if request.status == JoinStatus::Accepted {
      return Ok(request);
    }
    request.status = JoinStatus::Accepted;
    self.store.save_join_request(request).await
  }

  /// Bookmark an open party. Idempotent per (party, user).
  pub async fn add_bookmark(
    &self,
    caller: Uuid,
    party_id: Uuid,
  ) -> Result<Bookmark> {
    resolve_user(&self.store, caller).await?;
    let party = live_party(&self.store, party_id).await?;
    if party.is_closed() {
      return Err(Error::PartyClosed(party_id));
    }
    self.store.save_bookmark(Bookmark::new(caller, party_id)).await
  }

  /// Drop the caller's bookmark on a party, reporting whether one existed.
  /// Works regardless of party state, so clients can always clean up.
  pub async fn remove_bookmark(
    &self,
    caller: Uuid,
    party_id: Uuid,
  ) -> Result<bool> {
    resolve_user(&self.store, caller).await?;
    self.store.delete_bookmark(party_id, caller).await
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::{
    memory::MemoryStore,
    party::{
      ActivityDuration, ActivityLocation, Category, ContactMethod,
      DurationUnit, Party, PartyDraft,
    },
    user::User,
  };

  fn draft() -> PartyDraft {
    PartyDraft {
      title:          "friday board games".into(),
      body:           "casual table, snacks provided".into(),
      category:       Category::Hobby,
      location:       ActivityLocation::Incheon,
      contact_method: ContactMethod::Email,
      contact_value:  "host@example.com".into(),
      starts_on:      NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
      duration:       ActivityDuration { amount: 1, unit: DurationUnit::Day },
      recruit_number: 6,
      closes_on:      NaiveDate::from_ymd_opt(2025, 7, 25).unwrap(),
    }
  }

  async fn setup() -> (MemoryStore, Membership<MemoryStore>, Uuid, Party) {
    let store = MemoryStore::new();
    let author = store.save_user(User::new("dain".into())).await.unwrap();
    let party = store
      .save_party(draft().into_party(author.user_id))
      .await
      .unwrap();
    (store.clone(), Membership::new(store), author.user_id, party)
  }

  async fn new_user(store: &MemoryStore, nickname: &str) -> Uuid {
    store
      .save_user(User::new(nickname.into()))
      .await
      .unwrap()
      .user_id
  }

  async fn close_party(store: &MemoryStore, mut party: Party) -> Party {
    party.closed_at = Some(Utc::now());
    store.save_party(party).await.unwrap()
  }

  #[tokio::test]
  async fn apply_creates_a_waiting_request() {
    let (store, membership, _, party) = setup().await;
    let user = new_user(&store, "minju").await;

    let request = membership.apply(user, party.party_id).await.unwrap();

    assert_eq!(request.party_id, party.party_id);
    assert_eq!(request.user_id, user);
    assert_eq!(request.status, JoinStatus::Waiting);
  }

  #[tokio::test]
  async fn apply_requires_a_known_caller() {
    let (_, membership, _, party) = setup().await;

    let ghost = Uuid::new_v4();
    let err = membership.apply(ghost, party.party_id).await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(id) if id == ghost));
  }

  #[tokio::test]
  async fn apply_rejects_the_author() {
    let (_, membership, author, party) = setup().await;

    let err = membership.apply(author, party.party_id).await.unwrap_err();
    assert!(matches!(err, Error::OwnParty(id) if id == party.party_id));
  }

  #[tokio::test]
  async fn apply_rejects_closed_parties() {
    let (store, membership, _, party) = setup().await;
    let party = close_party(&store, party).await;
    let user = new_user(&store, "minju").await;

    let err = membership.apply(user, party.party_id).await.unwrap_err();
    assert!(matches!(err, Error::PartyClosed(id) if id == party.party_id));
  }

  #[tokio::test]
  async fn apply_treats_deleted_parties_as_missing() {
    let (store, membership, _, mut party) = setup().await;
    party.deleted_at = Some(Utc::now());
    let party = store.save_party(party).await.unwrap();
    let user = new_user(&store, "minju").await;

    let err = membership.apply(user, party.party_id).await.unwrap_err();
    assert!(matches!(err, Error::PartyNotFound(id) if id == party.party_id));
  }

  #[tokio::test]
  async fn apply_is_single_shot_even_after_acceptance() {
    let (store, membership, author, party) = setup().await;
    let user = new_user(&store, "minju").await;
    membership.apply(user, party.party_id).await.unwrap();

    let err = membership.apply(user, party.party_id).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyApplied { .. }));

    membership.accept(author, party.party_id, user).await.unwrap();
    let err = membership.apply(user, party.party_id).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyApplied { .. }));
  }

  #[tokio::test]
  async fn accept_flips_waiting_to_accepted() {
    let (store, membership, author, party) = setup().await;
    let user = new_user(&store, "minju").await;
    let original = membership.apply(user, party.party_id).await.unwrap();

    let accepted = membership
      .accept(author, party.party_id, user)
      .await
      .unwrap();

    assert_eq!(accepted.request_id, original.request_id);
    assert_eq!(accepted.status, JoinStatus::Accepted);
  }

  #[tokio::test]
  async fn accept_is_idempotent() {
    let (store, membership, author, party) = setup().await;
    let user = new_user(&store, "minju").await;
    membership.apply(user, party.party_id).await.unwrap();
    membership.accept(author, party.party_id, user).await.unwrap();

    let again = membership
      .accept(author, party.party_id, user)
      .await
      .unwrap();
    assert_eq!(again.status, JoinStatus::Accepted);
  }

  #[tokio::test]
  async fn accept_requires_the_author() {
    let (store, membership, _, party) = setup().await;
    let user = new_user(&store, "minju").await;
    membership.apply(user, party.party_id).await.unwrap();

    let err = membership
      .accept(user, party.party_id, user)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NotAuthor(id) if id == user));
  }

  #[tokio::test]
  async fn accept_requires_an_application() {
    let (store, membership, author, party) = setup().await;
    let user = new_user(&store, "minju").await;

    let err = membership
      .accept(author, party.party_id, user)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::JoinRequestNotFound { .. }));
  }

  #[tokio::test]
  async fn accept_keeps_working_after_the_party_closes() {
    let (store, membership, author, party) = setup().await;
    let user = new_user(&store, "minju").await;
    membership.apply(user, party.party_id).await.unwrap();
    let party = close_party(&store, party).await;

    let accepted = membership
      .accept(author, party.party_id, user)
      .await
      .unwrap();
    assert_eq!(accepted.status, JoinStatus::Accepted);
  }

  #[tokio::test]
  async fn add_bookmark_is_idempotent() {
    let (store, membership, _, party) = setup().await;
    let user = new_user(&store, "minju").await;

    let first = membership.add_bookmark(user, party.party_id).await.unwrap();
    let second = membership.add_bookmark(user, party.party_id).await.unwrap();

    assert_eq!(first.bookmark_id, second.bookmark_id);
  }

  #[tokio::test]
  async fn add_bookmark_rejects_closed_parties() {
    let (store, membership, _, party) = setup().await;
    let party = close_party(&store, party).await;
    let user = new_user(&store, "minju").await;

    let err = membership
      .add_bookmark(user, party.party_id)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::PartyClosed(id) if id == party.party_id));
  }

  #[tokio::test]
  async fn remove_bookmark_reports_presence() {
    let (store, membership, _, party) = setup().await;
    let user = new_user(&store, "minju").await;
    membership.add_bookmark(user, party.party_id).await.unwrap();

    assert!(membership.remove_bookmark(user, party.party_id).await.unwrap());
    assert!(!membership.remove_bookmark(user, party.party_id).await.unwrap());
  }
}
