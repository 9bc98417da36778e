//! Party lifecycle engine: create, edit, close, delete.
//!
//! A party moves through `open -> closed` or `open -> deleted`; both end
//! states are terminal and mutually exclusive. Only the author may mutate a
//! party, and only while it is open. Closing and soft-deleting both cascade
//! a bookmark purge so no user keeps a bookmark on a party nobody can join.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  access::resolve_user,
  party::{Party, PartyDraft},
  store::{BookmarkStore, PartyStore, UserDirectory},
};

/// Lifecycle engine over a store handle. Cloning is as cheap as cloning the
/// store.
#[derive(Debug, Clone)]
pub struct Lifecycle<S> {
  store: S,
}

impl<S> Lifecycle<S> {
  pub fn new(store: S) -> Self { Self { store } }
}

impl<S> Lifecycle<S>
where
  S: PartyStore + UserDirectory + BookmarkStore,
{
  /// Create a new open party owned by `caller` and return its id.
  pub async fn create(&self, caller: Uuid, draft: PartyDraft) -> Result<Uuid> {
    resolve_user(&self.store, caller).await?;
    let party = self.store.save_party(draft.into_party(caller)).await?;
    Ok(party.party_id)
  }

  /// Overwrite an open party's editable fields from `draft`.
  ///
  /// Beyond the authorship and state guards, three draft rules apply: the
  /// category must match the stored one, the recruit number may only stay
  /// equal or grow, and the planned closing date may not fall after the
  /// planned start date.
  pub async fn edit(
    &self,
    caller: Uuid,
    party_id: Uuid,
    draft: PartyDraft,
  ) -> Result<Uuid> {
    resolve_user(&self.store, caller).await?;
    let mut party = self.authored_open(caller, party_id).await?;

    if draft.category != party.category {
      return Err(Error::CategoryNotModifiable);
    }
    if draft.recruit_number < party.recruit_number {
      return Err(Error::RecruitNumberNotIncreasing);
    }
    if draft.closes_on > draft.starts_on {
      return Err(Error::InvalidClosingDate);
    }

    party.apply_draft(draft, Utc::now());
    let party = self.store.save_party(party).await?;
    Ok(party.party_id)
  }

  /// Close recruitment on an open party and purge its bookmarks. Unlike
  /// [`edit`](Self::edit) this never consults the user directory; the
  /// authorship check alone gates it.
  pub async fn close(&self, caller: Uuid, party_id: Uuid) -> Result<Uuid> {
    let mut party = self.authored_open(caller, party_id).await?;
    let now = Utc::now();
    party.closed_at = Some(now);
    party.modified_at = now;
    let party = self.store.save_party(party).await?;
    self.store.delete_bookmarks_for_party(party.party_id).await?;
    Ok(party.party_id)
  }

  /// Soft-delete an open party and purge its bookmarks. The record stays in
  /// the store but reads as missing everywhere.
  pub async fn delete(&self, caller: Uuid, party_id: Uuid) -> Result<Uuid> {
    let mut party = self.authored_open(caller, party_id).await?;
    let now = Utc::now();
    party.deleted_at = Some(now);
    party.modified_at = now;
    let party = self.store.save_party(party).await?;
    self.store.delete_bookmarks_for_party(party.party_id).await?;
    Ok(party.party_id)
  }

  /// Fetch a party and run the shared mutation guards, in their fixed order:
  /// authorship first, then the deleted check (a deleted party reads as
  /// missing), then the closed check.
  async fn authored_open(&self, caller: Uuid, party_id: Uuid) -> Result<Party> {
    let party = self
      .store
      .find_party(party_id)
      .await?
      .ok_or(Error::PartyNotFound(party_id))?;
    if !party.is_author(caller) {
      return Err(Error::NotAuthor(caller));
    }
    if party.is_deleted() {
      return Err(Error::PartyNotFound(party_id));
    }
    if party.is_closed() {
      return Err(Error::PartyClosed(party_id));
    }
    Ok(party)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    bookmark::Bookmark,
    memory::MemoryStore,
    party::{
      ActivityDuration, ActivityLocation, Category, ContactMethod,
      DurationUnit,
    },
    user::User,
  };

  fn draft() -> PartyDraft {
    PartyDraft {
      title:          "rust study circle".into(),
      body:           "weekly sessions, beginners welcome".into(),
      category:       Category::Study,
      location:       ActivityLocation::Seoul,
      contact_method: ContactMethod::KakaoOpenChat,
      contact_value:  "https://open.kakao.com/o/study".into(),
      starts_on:      NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
      duration:       ActivityDuration { amount: 2, unit: DurationUnit::Month },
      recruit_number: 8,
      closes_on:      NaiveDate::from_ymd_opt(2025, 6, 24).unwrap(),
    }
  }

  async fn setup() -> (MemoryStore, Lifecycle<MemoryStore>, Uuid) {
    let store = MemoryStore::new();
    let author = store.save_user(User::new("dain".into())).await.unwrap();
    (store.clone(), Lifecycle::new(store), author.user_id)
  }

  #[tokio::test]
  async fn create_persists_an_open_party() {
    let (store, lifecycle, author) = setup().await;

    let id = lifecycle.create(author, draft()).await.unwrap();

    let party = store.find_party(id).await.unwrap().unwrap();
    assert_eq!(party.author_id, author);
    assert!(party.is_open());
    assert_eq!(party.view_count, 0);
    assert_eq!(party.created_at, party.modified_at);
  }

  #[tokio::test]
  async fn create_rejects_unknown_authors() {
    let (_, lifecycle, _) = setup().await;

    let stranger = Uuid::new_v4();
    let err = lifecycle.create(stranger, draft()).await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(id) if id == stranger));
  }

  #[tokio::test]
  async fn edit_overwrites_fields_and_stamps_modified() {
    let (store, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();

    let mut update = draft();
    update.title = "advanced rust study".into();
    update.recruit_number = 10;
    lifecycle.edit(author, id, update).await.unwrap();

    let party = store.find_party(id).await.unwrap().unwrap();
    assert_eq!(party.title, "advanced rust study");
    assert_eq!(party.recruit_number, 10);
    assert_eq!(party.category, Category::Study);
    assert!(party.modified_at > party.created_at);
  }

  #[tokio::test]
  async fn edit_allows_an_equal_recruit_number() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();

    lifecycle.edit(author, id, draft()).await.unwrap();
  }

  #[tokio::test]
  async fn edit_rejects_non_authors() {
    let (store, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    let other = store.save_user(User::new("minju".into())).await.unwrap();

    let err = lifecycle.edit(other.user_id, id, draft()).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthor(user) if user == other.user_id));
  }

  #[tokio::test]
  async fn edit_rejects_category_changes() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();

    let mut update = draft();
    update.category = Category::Hobby;
    let err = lifecycle.edit(author, id, update).await.unwrap_err();
    assert!(matches!(err, Error::CategoryNotModifiable));
  }

  #[tokio::test]
  async fn edit_rejects_a_shrinking_recruit_number() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();

    let mut update = draft();
    update.recruit_number = 7;
    let err = lifecycle.edit(author, id, update).await.unwrap_err();
    assert!(matches!(err, Error::RecruitNumberNotIncreasing));
  }

  #[tokio::test]
  async fn edit_rejects_closing_after_the_start() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();

    let mut update = draft();
    update.closes_on = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
    let err = lifecycle.edit(author, id, update).await.unwrap_err();
    assert!(matches!(err, Error::InvalidClosingDate));
  }

  #[tokio::test]
  async fn edit_treats_deleted_parties_as_missing() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    lifecycle.delete(author, id).await.unwrap();

    let err = lifecycle.edit(author, id, draft()).await.unwrap_err();
    assert!(matches!(err, Error::PartyNotFound(party) if party == id));
  }

  #[tokio::test]
  async fn edit_rejects_closed_parties() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    lifecycle.close(author, id).await.unwrap();

    let err = lifecycle.edit(author, id, draft()).await.unwrap_err();
    assert!(matches!(err, Error::PartyClosed(party) if party == id));
  }

  #[tokio::test]
  async fn close_stamps_the_party_and_purges_bookmarks() {
    let (store, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    let fan = store.save_user(User::new("minju".into())).await.unwrap();
    store
      .save_bookmark(Bookmark::new(fan.user_id, id))
      .await
      .unwrap();

    lifecycle.close(author, id).await.unwrap();

    let party = store.find_party(id).await.unwrap().unwrap();
    assert!(party.is_closed());
    assert!(!party.is_deleted());
    // The cascade already removed the bookmark, so there is nothing left
    // to delete.
    assert!(!store.delete_bookmark(id, fan.user_id).await.unwrap());
  }

  #[tokio::test]
  async fn close_is_not_repeatable() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    lifecycle.close(author, id).await.unwrap();

    let err = lifecycle.close(author, id).await.unwrap_err();
    assert!(matches!(err, Error::PartyClosed(party) if party == id));
  }

  #[tokio::test]
  async fn close_skips_user_resolution() {
    let store = MemoryStore::new();
    let lifecycle = Lifecycle::new(store.clone());
    // The author exists only as a party field, never in the directory.
    let ghost = Uuid::new_v4();
    let party = store.save_party(draft().into_party(ghost)).await.unwrap();

    lifecycle.close(ghost, party.party_id).await.unwrap();
  }

  #[tokio::test]
  async fn delete_rejects_a_closed_party() {
    let (_, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    lifecycle.close(author, id).await.unwrap();

    let err = lifecycle.delete(author, id).await.unwrap_err();
    assert!(matches!(err, Error::PartyClosed(party) if party == id));
  }

  #[tokio::test]
  async fn delete_hides_the_party_from_every_follow_up() {
    let (store, lifecycle, author) = setup().await;
    let id = lifecycle.create(author, draft()).await.unwrap();
    let fan = store.save_user(User::new("minju".into())).await.unwrap();
    store
      .save_bookmark(Bookmark::new(fan.user_id, id))
      .await
      .unwrap();

    lifecycle.delete(author, id).await.unwrap();

    let party = store.find_party(id).await.unwrap().unwrap();
    assert!(party.is_deleted());
    assert!(!party.is_closed());
    assert!(!store.delete_bookmark(id, fan.user_id).await.unwrap());
    assert!(matches!(
      lifecycle.close(author, id).await.unwrap_err(),
      Error::PartyNotFound(party) if party == id
    ));
    assert!(matches!(
      lifecycle.delete(author, id).await.unwrap_err(),
      Error::PartyNotFound(party) if party == id
    ));
  }
}
