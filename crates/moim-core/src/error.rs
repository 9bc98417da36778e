//! Error types for `moim-core`.

use thiserror::Error;
use uuid::Uuid;

/// Every rejection the engines can signal. The boundary layer maps each kind
/// to a user-facing status; the engines themselves only signal the kind.
#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("party not found: {0}")]
  PartyNotFound(Uuid),

  #[error("no join request on party {party} for user {user}")]
  JoinRequestNotFound { party: Uuid, user: Uuid },

  #[error("user {0} is not the author of this party")]
  NotAuthor(Uuid),

  #[error("party {0} is closed")]
  PartyClosed(Uuid),

  #[error("user {user} already applied to party {party}")]
  AlreadyApplied { party: Uuid, user: Uuid },

  #[error("cannot apply to own party {0}")]
  OwnParty(Uuid),

  #[error("category cannot be modified after creation")]
  CategoryNotModifiable,

  #[error("recruit number may only stay equal or increase")]
  RecruitNumberNotIncreasing,

  #[error("planned closing date is after the planned start date")]
  InvalidClosingDate,

  #[error("page size {requested} exceeds the maximum of {max}")]
  PageSizeExceeded { requested: u32, max: u32 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
