//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use moim_core::{
  bookmark::Bookmark,
  join::{JoinRequest, JoinStatus},
  party::{
    ActivityDuration, ActivityLocation, Category, ContactMethod, DurationUnit,
    Party, PartyDraft,
  },
  store::{
    BookmarkStore, BrowseFilter, JoinRequestStore, PageRequest, PartyStore,
    UserDirectory, ViewerListKind,
  },
  user::User,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn draft() -> PartyDraft {
  PartyDraft {
    title:          "sunday film club".into(),
    body:           "one classic a week, discussion after".into(),
    category:       Category::Culture,
    location:       ActivityLocation::Seoul,
    contact_method: ContactMethod::GoogleForm,
    contact_value:  "https://forms.example.com/film".into(),
    starts_on:      NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
    duration:       ActivityDuration { amount: 2, unit: DurationUnit::Month },
    recruit_number: 12,
    closes_on:      NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
  }
}

async fn user(s: &SqliteStore, nickname: &str) -> Uuid {
  s.save_user(User::new(nickname.into())).await.unwrap().user_id
}

async fn party(s: &SqliteStore, author: Uuid) -> Party {
  s.save_party(draft().into_party(author)).await.unwrap()
}

async fn close(s: &SqliteStore, mut party: Party) -> Party {
  party.closed_at = Some(Utc::now());
  s.save_party(party).await.unwrap()
}

async fn request(
  s: &SqliteStore,
  party_id: Uuid,
  user_id: Uuid,
  status: JoinStatus,
) -> JoinRequest {
  let mut request = JoinRequest::new(party_id, user_id);
  request.status = status;
  s.save_join_request(request).await.unwrap()
}

fn full_page() -> PageRequest { PageRequest { page: 0, size: 30 } }

// ─── Parties ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn party_round_trip_preserves_every_field() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let mut party = draft().into_party(author);
  party.closed_at = Some(Utc::now());
  party.view_count = 7;
  s.save_party(party.clone()).await.unwrap();

  let found = s.find_party(party.party_id).await.unwrap().unwrap();
  assert_eq!(found, party);
}

#[tokio::test]
async fn find_party_missing_returns_none() {
  let s = store().await;
  let result = s.find_party(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn save_party_upserts_in_place() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let mut party = party(&s, author).await;

  party.title = "sunday film club, season two".into();
  party.recruit_number = 16;
  s.save_party(party.clone()).await.unwrap();

  let found = s.find_party(party.party_id).await.unwrap().unwrap();
  assert_eq!(found.title, "sunday film club, season two");
  assert_eq!(found.recruit_number, 16);

  let rows = s
    .browse_parties(full_page(), BrowseFilter::default(), None)
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
}

// ─── Browse ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn browse_hides_deleted_rows_and_marks_bookmarks() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let fan = user(&s, "minju").await;
  let open = party(&s, author).await;
  let mut gone = party(&s, author).await;
  gone.deleted_at = Some(Utc::now());
  s.save_party(gone).await.unwrap();
  s.save_bookmark(Bookmark::new(fan, open.party_id)).await.unwrap();

  let anonymous = s
    .browse_parties(full_page(), BrowseFilter::default(), None)
    .await
    .unwrap();
  assert_eq!(anonymous.len(), 1);
  assert_eq!(anonymous[0].party_id, open.party_id);
  assert_eq!(anonymous[0].bookmarked, None);

  let seen = s
    .browse_parties(full_page(), BrowseFilter::default(), Some(fan))
    .await
    .unwrap();
  assert_eq!(seen[0].bookmarked, Some(true));

  let unseen = s
    .browse_parties(full_page(), BrowseFilter::default(), Some(author))
    .await
    .unwrap();
  assert_eq!(unseen[0].bookmarked, Some(false));
}

#[tokio::test]
async fn browse_orders_newest_first_and_paginates() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let mut ids = Vec::new();
  for age in [3, 2, 1] {
    let mut party = draft().into_party(author);
    party.created_at = Utc::now() - Duration::days(age);
    ids.push(s.save_party(party).await.unwrap().party_id);
  }

  let first = s
    .browse_parties(
      PageRequest { page: 0, size: 2 },
      BrowseFilter::default(),
      None,
    )
    .await
    .unwrap();
  let second = s
    .browse_parties(
      PageRequest { page: 1, size: 2 },
      BrowseFilter::default(),
      None,
    )
    .await
    .unwrap();

  assert_eq!(first.len(), 2);
  assert_eq!(first[0].party_id, ids[2]);
  assert_eq!(first[1].party_id, ids[1]);
  assert_eq!(second.len(), 1);
  assert_eq!(second[0].party_id, ids[0]);
}

#[tokio::test]
async fn browse_filters_by_category_and_location() {
  let s = store().await;
  let author = user(&s, "dain").await;
  party(&s, author).await;
  let mut online = draft().into_party(author);
  online.category = Category::Study;
  online.location = ActivityLocation::Online;
  let online = s.save_party(online).await.unwrap();

  let rows = s
    .browse_parties(
      full_page(),
      BrowseFilter {
        category: Some(Category::Study),
        location: Some(ActivityLocation::Online),
      },
      None,
    )
    .await
    .unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].party_id, online.party_id);
}

#[tokio::test]
async fn browse_counts_applicants_by_status() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let party = party(&s, author).await;
  for nickname in ["a", "b"] {
    let id = user(&s, nickname).await;
    request(&s, party.party_id, id, JoinStatus::Waiting).await;
  }
  let accepted = user(&s, "c").await;
  request(&s, party.party_id, accepted, JoinStatus::Accepted).await;

  let rows = s
    .browse_parties(full_page(), BrowseFilter::default(), None)
    .await
    .unwrap();
  assert_eq!(rows[0].waiting_count, 2);
  assert_eq!(rows[0].accepted_count, 1);
}

// ─── Viewer lists ────────────────────────────────────────────────────────────

#[tokio::test]
async fn viewer_lists_follow_their_kinds() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let member = user(&s, "minju").await;

  let waiting_on = party(&s, author).await;
  let accepted_in = party(&s, author).await;
  let finished = close(&s, party(&s, author).await).await;
  request(&s, waiting_on.party_id, member, JoinStatus::Waiting).await;
  request(&s, accepted_in.party_id, member, JoinStatus::Accepted).await;
  request(&s, finished.party_id, member, JoinStatus::Accepted).await;
  s.save_bookmark(Bookmark::new(member, waiting_on.party_id))
    .await
    .unwrap();

  let waiting = s
    .viewer_parties(ViewerListKind::NotClosedWaiting, member)
    .await
    .unwrap();
  assert_eq!(waiting.len(), 1);
  assert_eq!(waiting[0].party_id, waiting_on.party_id);
  assert_eq!(waiting[0].bookmarked, Some(true));
  assert_eq!(waiting[0].closed, None);

  let accepted = s
    .viewer_parties(ViewerListKind::NotClosedAccepted, member)
    .await
    .unwrap();
  assert_eq!(accepted.len(), 1);
  assert_eq!(accepted[0].party_id, accepted_in.party_id);
  assert_eq!(accepted[0].bookmarked, Some(false));

  let closed = s
    .viewer_parties(ViewerListKind::Closed, member)
    .await
    .unwrap();
  assert_eq!(closed.len(), 1);
  assert_eq!(closed[0].party_id, finished.party_id);
  assert_eq!(closed[0].bookmarked, None);

  let bookmarked = s
    .viewer_parties(ViewerListKind::Bookmarked, member)
    .await
    .unwrap();
  assert_eq!(bookmarked.len(), 1);
  assert_eq!(bookmarked[0].party_id, waiting_on.party_id);

  let wrote = s.viewer_parties(ViewerListKind::Wrote, author).await.unwrap();
  assert_eq!(wrote.len(), 3);
  for row in wrote {
    let expected = row.party_id == finished.party_id;
    assert_eq!(row.closed, Some(expected));
    assert_eq!(row.bookmarked, None);
  }
}

// ─── Join requests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn join_request_round_trip_and_status_flip() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let member = user(&s, "minju").await;
  let party = party(&s, author).await;

  let mut saved = request(&s, party.party_id, member, JoinStatus::Waiting).await;
  let found = s
    .find_join_request(party.party_id, member)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found, saved);

  saved.status = JoinStatus::Accepted;
  s.save_join_request(saved.clone()).await.unwrap();

  let found = s
    .find_join_request(party.party_id, member)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.status, JoinStatus::Accepted);
  assert_eq!(found.request_id, saved.request_id);

  let waiting = s.waiting_for_party(party.party_id).await.unwrap();
  assert!(waiting.is_empty());
  let accepted = s.accepted_for_party(party.party_id).await.unwrap();
  assert_eq!(accepted.len(), 1);
}

#[tokio::test]
async fn join_requests_are_unique_per_party_and_user() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let member = user(&s, "minju").await;
  let party = party(&s, author).await;
  request(&s, party.party_id, member, JoinStatus::Waiting).await;

  // A second application row for the same pair violates the table's
  // uniqueness and surfaces as a store fault.
  let duplicate = JoinRequest::new(party.party_id, member);
  let err = s.save_join_request(duplicate).await.unwrap_err();
  assert!(matches!(err, moim_core::Error::Store(_)));
}

#[tokio::test]
async fn waiting_list_orders_by_application_time() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let party = party(&s, author).await;

  let late = user(&s, "late").await;
  let early = user(&s, "early").await;
  let mut late_request = JoinRequest::new(party.party_id, late);
  late_request.applied_at = Utc::now();
  let mut early_request = JoinRequest::new(party.party_id, early);
  early_request.applied_at = Utc::now() - Duration::hours(2);
  s.save_join_request(late_request).await.unwrap();
  s.save_join_request(early_request).await.unwrap();

  let waiting = s.waiting_for_party(party.party_id).await.unwrap();
  assert_eq!(waiting.len(), 2);
  assert_eq!(waiting[0].user_id, early);
  assert_eq!(waiting[1].user_id, late);
}

// ─── Bookmarks ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn bookmarks_keep_the_first_row_per_pair() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let fan = user(&s, "minju").await;
  let party = party(&s, author).await;

  let first = s
    .save_bookmark(Bookmark::new(fan, party.party_id))
    .await
    .unwrap();
  let second = s
    .save_bookmark(Bookmark::new(fan, party.party_id))
    .await
    .unwrap();
  assert_eq!(second.bookmark_id, first.bookmark_id);

  assert!(s.delete_bookmark(party.party_id, fan).await.unwrap());
  assert!(!s.delete_bookmark(party.party_id, fan).await.unwrap());
}

#[tokio::test]
async fn bookmark_cascade_clears_a_party() {
  let s = store().await;
  let author = user(&s, "dain").await;
  let cleared = party(&s, author).await;
  let untouched = party(&s, author).await;
  for nickname in ["minju", "haneul"] {
    let fan = user(&s, nickname).await;
    s.save_bookmark(Bookmark::new(fan, cleared.party_id)).await.unwrap();
    s.save_bookmark(Bookmark::new(fan, untouched.party_id)).await.unwrap();
  }

  let removed = s
    .delete_bookmarks_for_party(cleared.party_id)
    .await
    .unwrap();
  assert_eq!(removed, 2);

  // The other party's bookmarks survive the cascade.
  let remaining = s
    .delete_bookmarks_for_party(untouched.party_id)
    .await
    .unwrap();
  assert_eq!(remaining, 2);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_round_trip_and_upsert() {
  let s = store().await;
  let saved = s.save_user(User::new("dain".into())).await.unwrap();

  let found = s.find_user(saved.user_id).await.unwrap().unwrap();
  assert_eq!(found, saved);

  let renamed = User { nickname: "dain-v2".into(), ..saved.clone() };
  s.save_user(renamed.clone()).await.unwrap();
  let found = s.find_user(saved.user_id).await.unwrap().unwrap();
  assert_eq!(found.nickname, "dain-v2");
}

#[tokio::test]
async fn find_user_missing_returns_none() {
  let s = store().await;
  assert!(s.find_user(Uuid::new_v4()).await.unwrap().is_none());
}
