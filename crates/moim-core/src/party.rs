//! Party records and their vocabulary enums.
//!
//! A party is owned by its author. Closure and soft-deletion are one-way
//! transitions recorded as timestamps; a deleted party stays in storage but
//! is invisible to every read path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// Topical category of a party. Frozen at creation; edits may not move a
/// party between categories.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
  strum::Display, strum::EnumIter, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
  Study,
  Exercise,
  Hobby,
  Food,
  Culture,
  Travel,
  Volunteer,
  Other,
}

/// Where the activity takes place.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
  strum::Display, strum::EnumIter, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityLocation {
  Online,
  Seoul,
  Gyeonggi,
  Incheon,
  Busan,
  Daegu,
  Daejeon,
  Gwangju,
}

/// How accepted applicants reach the author.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
  strum::Display, strum::EnumIter, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactMethod {
  KakaoOpenChat,
  GoogleForm,
  Email,
  Phone,
}

/// Unit for [`ActivityDuration`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
  strum::Display, strum::EnumIter, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DurationUnit {
  Day,
  Week,
  Month,
}

impl DurationUnit {
  /// Calendar-day equivalent used when normalising durations (a month counts
  /// as 30 days).
  pub fn in_days(self) -> u32 {
    match self {
      Self::Day => 1,
      Self::Week => 7,
      Self::Month => 30,
    }
  }
}

/// How long the activity is expected to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDuration {
  pub amount: u32,
  pub unit:   DurationUnit,
}

impl ActivityDuration {
  /// Normalise to a day count.
  pub fn days(self) -> u32 { self.amount * self.unit.in_days() }
}

// ─── Party ───────────────────────────────────────────────────────────────────

/// A group-activity listing.
///
/// `closed_at` and `deleted_at` double as state flags: a party is open iff
/// both are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
  pub party_id:       Uuid,
  pub author_id:      Uuid,
  pub title:          String,
  pub body:           String,
  pub category:       Category,
  pub location:       ActivityLocation,
  pub contact_method: ContactMethod,
  /// Where accepted applicants are told to go (an open-chat URL, an email
  /// address). The single most sensitive field; see the detail-view gating
  /// in [`listing`](crate::listing).
  pub contact_value:  String,
  pub starts_on:      NaiveDate,
  pub duration:       ActivityDuration,
  /// Target participant count, at least 1. May only stay equal or grow on
  /// edit.
  pub recruit_number: u32,
  pub closes_on:      NaiveDate,
  pub view_count:     u64,
  pub created_at:     DateTime<Utc>,
  pub modified_at:    DateTime<Utc>,
  pub closed_at:      Option<DateTime<Utc>>,
  pub deleted_at:     Option<DateTime<Utc>>,
}

impl Party {
  pub fn is_author(&self, user_id: Uuid) -> bool { self.author_id == user_id }

  pub fn is_closed(&self) -> bool { self.closed_at.is_some() }

  pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }

  pub fn is_open(&self) -> bool { !self.is_closed() && !self.is_deleted() }

  /// Overwrite the author-editable fields from `draft` and stamp
  /// `modified_at`. The category is deliberately left untouched; the edit
  /// guards reject drafts that try to change it.
  pub fn apply_draft(&mut self, draft: PartyDraft, at: DateTime<Utc>) {
    self.title = draft.title;
    self.body = draft.body;
    self.location = draft.location;
    self.contact_method = draft.contact_method;
    self.contact_value = draft.contact_value;
    self.starts_on = draft.starts_on;
    self.duration = draft.duration;
    self.recruit_number = draft.recruit_number;
    self.closes_on = draft.closes_on;
    self.modified_at = at;
  }
}

// ─── PartyDraft ──────────────────────────────────────────────────────────────

/// Everything an author supplies on create and edit. Identity, ownership,
/// and timestamps are assigned by the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyDraft {
  pub title:          String,
  pub body:           String,
  pub category:       Category,
  pub location:       ActivityLocation,
  pub contact_method: ContactMethod,
  pub contact_value:  String,
  pub starts_on:      NaiveDate,
  pub duration:       ActivityDuration,
  pub recruit_number: u32,
  pub closes_on:      NaiveDate,
}

impl PartyDraft {
  /// Build a fresh open [`Party`] owned by `author_id`.
  pub fn into_party(self, author_id: Uuid) -> Party {
    let now = Utc::now();
    Party {
      party_id: Uuid::new_v4(),
      author_id,
      title: self.title,
      body: self.body,
      category: self.category,
      location: self.location,
      contact_method: self.contact_method,
      contact_value: self.contact_value,
      starts_on: self.starts_on,
      duration: self.duration,
      recruit_number: self.recruit_number,
      closes_on: self.closes_on,
      view_count: 0,
      created_at: now,
      modified_at: now,
      closed_at: None,
      deleted_at: None,
    }
  }
}
