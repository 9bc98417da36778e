//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! dates, UUIDs as hyphenated lowercase strings, and vocabulary enums as
//! their snake_case `strum` string forms.

use chrono::{DateTime, NaiveDate, Utc};
use moim_core::{
  bookmark::Bookmark,
  join::JoinRequest,
  party::{ActivityDuration, Party},
  store::PartyRow,
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

/// Decode a vocabulary enum from its stored `strum` string form.
pub fn decode_enum<T>(column: &'static str, s: &str) -> Result<T>
where
  T: std::str::FromStr<Err = strum::ParseError>,
{
  s.parse().map_err(|_| Error::Vocabulary { column, value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `parties` row.
pub struct RawParty {
  pub party_id:        String,
  pub author_id:       String,
  pub title:           String,
  pub body:            String,
  pub category:        String,
  pub location:        String,
  pub contact_method:  String,
  pub contact_value:   String,
  pub starts_on:       String,
  pub duration_amount: i64,
  pub duration_unit:   String,
  pub recruit_number:  i64,
  pub closes_on:       String,
  pub view_count:      i64,
  pub created_at:      String,
  pub modified_at:     String,
  pub closed_at:       Option<String>,
  pub deleted_at:      Option<String>,
}

impl RawParty {
  /// Column order must match the `PARTY_COLUMNS` list in `store.rs`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      party_id:        row.get(0)?,
      author_id:       row.get(1)?,
      title:           row.get(2)?,
      body:            row.get(3)?,
      category:        row.get(4)?,
      location:        row.get(5)?,
      contact_method:  row.get(6)?,
      contact_value:   row.get(7)?,
      starts_on:       row.get(8)?,
      duration_amount: row.get(9)?,
      duration_unit:   row.get(10)?,
      recruit_number:  row.get(11)?,
      closes_on:       row.get(12)?,
      view_count:      row.get(13)?,
      created_at:      row.get(14)?,
      modified_at:     row.get(15)?,
      closed_at:       row.get(16)?,
      deleted_at:      row.get(17)?,
    })
  }

  pub fn into_party(self) -> Result<Party> {
    Ok(Party {
      party_id:       decode_uuid(&self.party_id)?,
      author_id:      decode_uuid(&self.author_id)?,
      title:          self.title,
      body:           self.body,
      category:       decode_enum("category", &self.category)?,
      location:       decode_enum("location", &self.location)?,
      contact_method: decode_enum("contact_method", &self.contact_method)?,
      contact_value:  self.contact_value,
      starts_on:      decode_date(&self.starts_on)?,
      duration:       ActivityDuration {
        amount: self.duration_amount as u32,
        unit:   decode_enum("duration_unit", &self.duration_unit)?,
      },
      recruit_number: self.recruit_number as u32,
      closes_on:      decode_date(&self.closes_on)?,
      view_count:     self.view_count as u64,
      created_at:     decode_dt(&self.created_at)?,
      modified_at:    decode_dt(&self.modified_at)?,
      closed_at:      self.closed_at.as_deref().map(decode_dt).transpose()?,
      deleted_at:     self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values for one aggregated listing row.
pub struct RawPartyRow {
  pub party_id:       String,
  pub title:          String,
  pub category:       String,
  pub location:       String,
  pub recruit_number: i64,
  pub closes_on:      String,
  pub waiting_count:  i64,
  pub accepted_count: i64,
  pub bookmarked:     Option<bool>,
  pub closed:         Option<bool>,
}

impl RawPartyRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      party_id:       row.get(0)?,
      title:          row.get(1)?,
      category:       row.get(2)?,
      location:       row.get(3)?,
      recruit_number: row.get(4)?,
      closes_on:      row.get(5)?,
      waiting_count:  row.get(6)?,
      accepted_count: row.get(7)?,
      bookmarked:     row.get(8)?,
      closed:         row.get(9)?,
    })
  }

  pub fn into_row(self) -> Result<PartyRow> {
    Ok(PartyRow {
      party_id:       decode_uuid(&self.party_id)?,
      title:          self.title,
      category:       decode_enum("category", &self.category)?,
      location:       decode_enum("location", &self.location)?,
      recruit_number: self.recruit_number as u32,
      closes_on:      decode_date(&self.closes_on)?,
      waiting_count:  self.waiting_count as u32,
      accepted_count: self.accepted_count as u32,
      bookmarked:     self.bookmarked,
      closed:         self.closed,
    })
  }
}

/// Raw values read directly from a `join_requests` row.
pub struct RawJoinRequest {
  pub request_id: String,
  pub party_id:   String,
  pub user_id:    String,
  pub status:     String,
  pub applied_at: String,
}

impl RawJoinRequest {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      request_id: row.get(0)?,
      party_id:   row.get(1)?,
      user_id:    row.get(2)?,
      status:     row.get(3)?,
      applied_at: row.get(4)?,
    })
  }

  pub fn into_request(self) -> Result<JoinRequest> {
    Ok(JoinRequest {
      request_id: decode_uuid(&self.request_id)?,
      party_id:   decode_uuid(&self.party_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      status:     decode_enum("status", &self.status)?,
      applied_at: decode_dt(&self.applied_at)?,
    })
  }
}

/// Raw values read directly from a `bookmarks` row.
pub struct RawBookmark {
  pub bookmark_id: String,
  pub user_id:     String,
  pub party_id:    String,
  pub created_at:  String,
}

impl RawBookmark {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bookmark_id: row.get(0)?,
      user_id:     row.get(1)?,
      party_id:    row.get(2)?,
      created_at:  row.get(3)?,
    })
  }

  pub fn into_bookmark(self) -> Result<Bookmark> {
    Ok(Bookmark {
      bookmark_id: decode_uuid(&self.bookmark_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      party_id:    decode_uuid(&self.party_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:  String,
  pub nickname: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { user_id: row.get(0)?, nickname: row.get(1)? })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:  decode_uuid(&self.user_id)?,
      nickname: self.nickname,
    })
  }
}
