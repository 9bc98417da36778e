//! Listing and visibility engine: browse, per-viewer lists, and the detail
//! view.
//!
//! All reads are viewer-aware. The detail view classifies the viewer into a
//! [`ViewerRole`] once and projects every role-dependent field from that
//! classification; in particular the contact value is revealed only to the
//! author, or to an accepted applicant once the party has closed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  access::{live_party, resolve_user},
  join::{JoinRequest, JoinStatus},
  party::{ActivityLocation, Category, ContactMethod, Party},
  store::{
    BrowseFilter, JoinRequestStore, PageRequest, PartyRow, PartyStore,
    UserDirectory, ViewerListKind,
  },
};

// ─── Projections ─────────────────────────────────────────────────────────────

/// One row of a listing, as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyListItem {
  pub party_id:         Uuid,
  pub title:            String,
  pub category:         Category,
  pub location:         ActivityLocation,
  pub recruit_number:   u32,
  pub closes_on:        NaiveDate,
  pub waiting_count:    u32,
  pub accepted_count:   u32,
  /// Open seats per waiting applicant; raw demand signal, deliberately
  /// unclamped (negative once a party over-accepts).
  pub competition_rate: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bookmarked:       Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub closed:           Option<bool>,
}

impl From<PartyRow> for PartyListItem {
  fn from(row: PartyRow) -> Self {
    let competition_rate = if row.waiting_count == 0 {
      0.0
    } else {
      (row.recruit_number as f32 - row.accepted_count as f32)
        / row.waiting_count as f32
    };
    Self {
      party_id: row.party_id,
      title: row.title,
      category: row.category,
      location: row.location,
      recruit_number: row.recruit_number,
      closes_on: row.closes_on,
      waiting_count: row.waiting_count,
      accepted_count: row.accepted_count,
      competition_rate,
      bookmarked: row.bookmarked,
      closed: row.closed,
    }
  }
}

/// An applicant as shown to the party author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
  pub user_id:  Uuid,
  pub nickname: String,
}

/// The viewer's relationship to a party, classified once per detail read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ViewerRole {
  /// The viewer wrote the party and sees both applicant lists.
  Author {
    waiting:  Vec<Applicant>,
    accepted: Vec<Applicant>,
  },
  /// The viewer has a join request on the party.
  Applicant { status: JoinStatus },
  /// Signed in, but neither author nor applicant.
  Other,
}

/// The full detail view of one party.
///
/// `viewer` is absent on anonymous reads. `contact_value` is present exactly
/// when the role allows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyDetail {
  pub party_id:        Uuid,
  pub title:           String,
  pub author_nickname: String,
  pub body:            String,
  pub category:        Category,
  pub location:        ActivityLocation,
  pub starts_on:       NaiveDate,
  /// Planned duration normalised to days.
  pub duration_days:   u32,
  pub contact_method:  ContactMethod,
  pub view_count:      u64,
  pub recruit_number:  u32,
  pub closes_on:       NaiveDate,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub closed_on:       Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub viewer:          Option<ViewerRole>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_value:   Option<String>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Immutable listing limits, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ListingConfig {
  pub max_page_size: u32,
}

impl Default for ListingConfig {
  fn default() -> Self { Self { max_page_size: 30 } }
}

/// Listing engine over a store handle.
#[derive(Debug, Clone)]
pub struct Listing<S> {
  store:  S,
  config: ListingConfig,
}

impl<S> Listing<S> {
  pub fn new(store: S, config: ListingConfig) -> Self { Self { store, config } }
}

impl<S> Listing<S>
where
  S: PartyStore + JoinRequestStore + UserDirectory,
{
  /// One page of the public board. The page size cap is enforced before the
  /// store is consulted; `bookmarked` appears on each row iff a viewer was
  /// supplied.
  pub async fn browse(
    &self,
    filter: BrowseFilter,
    page: PageRequest,
    viewer: Option<Uuid>,
  ) -> Result<Vec<PartyListItem>> {
    if page.size > self.config.max_page_size {
      return Err(Error::PageSizeExceeded {
        requested: page.size,
        max:       self.config.max_page_size,
      });
    }
    let rows = self.store.browse_parties(page, filter, viewer).await?;
    Ok(rows.into_iter().map(PartyListItem::from).collect())
  }

  /// One of the viewer's personal party lists. The viewer must exist.
  pub async fn viewer_list(
    &self,
    viewer: Uuid,
    kind: ViewerListKind,
  ) -> Result<Vec<PartyListItem>> {
    resolve_user(&self.store, viewer).await?;
    let rows = self.store.viewer_parties(kind, viewer).await?;
    Ok(rows.into_iter().map(PartyListItem::from).collect())
  }

  /// The detail view of a live party, shaped for `viewer`.
  pub async fn detail(
    &self,
    party_id: Uuid,
    viewer: Option<Uuid>,
  ) -> Result<PartyDetail> {
    let party = live_party(&self.store, party_id).await?;
    let author = resolve_user(&self.store, party.author_id).await?;

    let role = match viewer {
      None => None,
      Some(viewer_id) => {
        resolve_user(&self.store, viewer_id).await?;
        Some(self.classify(&party, viewer_id).await?)
      }
    };
    let contact_value = role.as_ref().and_then(|role| match role {
      ViewerRole::Author { .. } => Some(party.contact_value.clone()),
      ViewerRole::Applicant { status: JoinStatus::Accepted }
        if party.is_closed() =>
      {
        Some(party.contact_value.clone())
      }
      _ => None,
    });

    Ok(PartyDetail {
      party_id:        party.party_id,
      title:           party.title,
      author_nickname: author.nickname,
      body:            party.body,
      category:        party.category,
      location:        party.location,
      starts_on:       party.starts_on,
      duration_days:   party.duration.days(),
      contact_method:  party.contact_method,
      view_count:      party.view_count,
      recruit_number:  party.recruit_number,
      closes_on:       party.closes_on,
      closed_on:       party.closed_at.map(|at| at.date_naive()),
      viewer:          role,
      contact_value,
    })
  }

  async fn classify(&self, party: &Party, viewer: Uuid) -> Result<ViewerRole> {
    if party.is_author(viewer) {
      let waiting = self
        .applicants(self.store.waiting_for_party(party.party_id).await?)
        .await?;
      let accepted = self
        .applicants(self.store.accepted_for_party(party.party_id).await?)
        .await?;
      return Ok(ViewerRole::Author { waiting, accepted });
    }
    match self.store.find_join_request(party.party_id, viewer).await? {
      Some(request) => Ok(ViewerRole::Applicant { status: request.status }),
      None => Ok(ViewerRole::Other),
    }
  }

  async fn applicants(
    &self,
    requests: Vec<JoinRequest>,
  ) -> Result<Vec<Applicant>> {
    let mut applicants = Vec::with_capacity(requests.len());
    for request in requests {
      let user = resolve_user(&self.store, request.user_id).await?;
      applicants.push(Applicant {
        user_id:  user.user_id,
        nickname: user.nickname,
      });
    }
    Ok(applicants)
  }
}
