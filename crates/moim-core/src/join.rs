//! Join requests: a user's application to join a party.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an application stands.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
  strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JoinStatus {
  Waiting,
  Accepted,
}

/// One user's application to join one party. At most one exists per
/// (party, user) pair; the stores enforce the uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
  pub request_id: Uuid,
  pub party_id:   Uuid,
  pub user_id:    Uuid,
  pub status:     JoinStatus,
  pub applied_at: DateTime<Utc>,
}

impl JoinRequest {
  /// A fresh `Waiting` application.
  pub fn new(party_id: Uuid, user_id: Uuid) -> Self {
    Self {
      request_id: Uuid::new_v4(),
      party_id,
      user_id,
      status: JoinStatus::Waiting,
      applied_at: Utc::now(),
    }
  }
}
