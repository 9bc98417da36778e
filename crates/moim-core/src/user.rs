//! Users as the rest of the system sees them: an id and a display name.
//! Accounts, credentials, and sessions live upstream of this service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub user_id:  Uuid,
  pub nickname: String,
}

impl User {
  pub fn new(nickname: String) -> Self {
    Self { user_id: Uuid::new_v4(), nickname }
  }
}
