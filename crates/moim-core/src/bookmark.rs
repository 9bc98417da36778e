//! Bookmarks: a user's saved reference to a party.
//!
//! Bookmarks are removed in bulk when the referenced party closes or is
//! deleted. The lifecycle engine performs that cascade explicitly; the store
//! only exposes the bulk delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
  pub bookmark_id: Uuid,
  pub user_id:     Uuid,
  pub party_id:    Uuid,
  pub created_at:  DateTime<Utc>,
}

impl Bookmark {
  pub fn new(user_id: Uuid, party_id: Uuid) -> Self {
    Self {
      bookmark_id: Uuid::new_v4(),
      user_id,
      party_id,
      created_at: Utc::now(),
    }
  }
}
