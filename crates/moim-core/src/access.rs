//! Shared lookup helpers used by the engines.

use uuid::Uuid;

use crate::{
  Error, Result,
  party::Party,
  store::{PartyStore, UserDirectory},
  user::User,
};

/// Resolve a user id, rejecting unknown callers.
pub(crate) async fn resolve_user<S: UserDirectory>(
  store: &S,
  user_id: Uuid,
) -> Result<User> {
  store
    .find_user(user_id)
    .await?
    .ok_or(Error::UserNotFound(user_id))
}

/// Fetch a party that is visible to callers: present and not soft-deleted.
/// A soft-deleted party is indistinguishable from a missing one.
pub(crate) async fn live_party<S: PartyStore>(
  store: &S,
  party_id: Uuid,
) -> Result<Party> {
  store
    .find_party(party_id)
    .await?
    .filter(|party| !party.is_deleted())
    .ok_or(Error::PartyNotFound(party_id))
}
