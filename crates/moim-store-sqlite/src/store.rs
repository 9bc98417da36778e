//! [`SqliteStore`]: the SQLite implementation of the moim store traits.

use std::path::Path;

use moim_core::{
  Result as CoreResult,
  bookmark::Bookmark,
  join::{JoinRequest, JoinStatus},
  party::Party,
  store::{
    BookmarkStore, BrowseFilter, JoinRequestStore, PageRequest, PartyRow,
    PartyStore, UserDirectory, ViewerListKind,
  },
  user::User,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawBookmark, RawJoinRequest, RawParty, RawPartyRow, RawUser, encode_date,
    encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

/// Every `parties` column, in the order the raw decoders expect.
const PARTY_COLUMNS: &str = "party_id, author_id, title, body, category, \
   location, contact_method, contact_value, starts_on, duration_amount, \
   duration_unit, recruit_number, closes_on, view_count, created_at, \
   modified_at, closed_at, deleted_at";

/// Shared SELECT head for the aggregated listing queries: identity columns
/// plus the two applicant counts.
const LIST_COLUMNS: &str = "p.party_id, p.title, p.category, p.location, \
   p.recruit_number, p.closes_on, \
   (SELECT COUNT(*) FROM join_requests j \
     WHERE j.party_id = p.party_id AND j.status = 'waiting') AS waiting_count, \
   (SELECT COUNT(*) FROM join_requests j \
     WHERE j.party_id = p.party_id AND j.status = 'accepted') AS accepted_count";

const LIST_ORDER: &str = "ORDER BY p.created_at DESC, p.party_id DESC";

/// The two "my applications" lists differ only in the status they join on.
fn applied_list_sql(status: &str) -> String {
  format!(
    "SELECT {LIST_COLUMNS},
       EXISTS (SELECT 1 FROM bookmarks b
         WHERE b.party_id = p.party_id AND b.user_id = ?1) AS bookmarked,
       NULL AS closed
     FROM parties p
     JOIN join_requests me ON me.party_id = p.party_id AND me.user_id = ?1
     WHERE p.deleted_at IS NULL
       AND p.closed_at IS NULL
       AND me.status = '{status}'
     {LIST_ORDER}"
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A moim store backed by a single SQLite file.
///
/// Cloning is cheap; all clones funnel through one reference-counted
/// connection on a dedicated database thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn requests_with_status(
    &self,
    party_id: Uuid,
    status: JoinStatus,
  ) -> Result<Vec<JoinRequest>> {
    let party_id_str = encode_uuid(party_id);
    let status_str   = status.to_string();

    let raws: Vec<RawJoinRequest> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT request_id, party_id, user_id, status, applied_at
           FROM join_requests
           WHERE party_id = ?1 AND status = ?2
           ORDER BY applied_at ASC, request_id ASC",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![party_id_str, status_str],
            RawJoinRequest::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJoinRequest::into_request).collect()
  }
}

// ─── PartyStore impl ─────────────────────────────────────────────────────────

impl PartyStore for SqliteStore {
  async fn save_party(&self, party: Party) -> CoreResult<Party> {
    let party_id_str       = encode_uuid(party.party_id);
    let author_id_str      = encode_uuid(party.author_id);
    let title              = party.title.clone();
    let body               = party.body.clone();
    let category_str       = party.category.to_string();
    let location_str       = party.location.to_string();
    let contact_method_str = party.contact_method.to_string();
    let contact_value      = party.contact_value.clone();
    let starts_on_str      = encode_date(party.starts_on);
    let duration_amount    = party.duration.amount as i64;
    let duration_unit_str  = party.duration.unit.to_string();
    let recruit_number     = party.recruit_number as i64;
    let closes_on_str      = encode_date(party.closes_on);
    let view_count         = party.view_count as i64;
    let created_at_str     = encode_dt(party.created_at);
    let modified_at_str    = encode_dt(party.modified_at);
    let closed_at_str      = party.closed_at.map(encode_dt);
    let deleted_at_str     = party.deleted_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO parties ({PARTY_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18)
             ON CONFLICT (party_id) DO UPDATE SET
               title           = excluded.title,
               body            = excluded.body,
               category        = excluded.category,
               location        = excluded.location,
               contact_method  = excluded.contact_method,
               contact_value   = excluded.contact_value,
               starts_on       = excluded.starts_on,
               duration_amount = excluded.duration_amount,
               duration_unit   = excluded.duration_unit,
               recruit_number  = excluded.recruit_number,
               closes_on       = excluded.closes_on,
               view_count      = excluded.view_count,
               modified_at     = excluded.modified_at,
               closed_at       = excluded.closed_at,
               deleted_at      = excluded.deleted_at"
          ),
          rusqlite::params![
            party_id_str,
            author_id_str,
            title,
            body,
            category_str,
            location_str,
            contact_method_str,
            contact_value,
            starts_on_str,
            duration_amount,
            duration_unit_str,
            recruit_number,
            closes_on_str,
            view_count,
            created_at_str,
            modified_at_str,
            closed_at_str,
            deleted_at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(party)
  }

  async fn find_party(&self, id: Uuid) -> CoreResult<Option<Party>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawParty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PARTY_COLUMNS} FROM parties WHERE party_id = ?1"
              ),
              rusqlite::params![id_str],
              RawParty::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawParty::into_party).transpose()?)
  }

  async fn browse_parties(
    &self,
    page: PageRequest,
    filter: BrowseFilter,
    viewer: Option<Uuid>,
  ) -> CoreResult<Vec<PartyRow>> {
    let category_str = filter.category.map(|c| c.to_string());
    let location_str = filter.location.map(|l| l.to_string());
    let viewer_str   = viewer.map(encode_uuid);
    let limit        = page.size as i64;
    let offset       = page.offset() as i64;

    let raws: Vec<RawPartyRow> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {LIST_COLUMNS},
             CASE WHEN ?3 IS NULL THEN NULL ELSE EXISTS (
               SELECT 1 FROM bookmarks b
                WHERE b.party_id = p.party_id AND b.user_id = ?3
             ) END AS bookmarked,
             NULL AS closed
           FROM parties p
           WHERE p.deleted_at IS NULL
             AND (?1 IS NULL OR p.category = ?1)
             AND (?2 IS NULL OR p.location = ?2)
           {LIST_ORDER}
           LIMIT ?4 OFFSET ?5"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              category_str,
              location_str,
              viewer_str,
              limit,
              offset
            ],
            RawPartyRow::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawPartyRow::into_row)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn viewer_parties(
    &self,
    kind: ViewerListKind,
    viewer: Uuid,
  ) -> CoreResult<Vec<PartyRow>> {
    let viewer_str = encode_uuid(viewer);

    let raws: Vec<RawPartyRow> = self
      .conn
      .call(move |conn| {
        let sql = match kind {
          ViewerListKind::NotClosedWaiting => applied_list_sql("waiting"),
          ViewerListKind::NotClosedAccepted => applied_list_sql("accepted"),
          ViewerListKind::Closed => format!(
            "SELECT {LIST_COLUMNS},
               NULL AS bookmarked,
               NULL AS closed
             FROM parties p
             JOIN join_requests me
               ON me.party_id = p.party_id AND me.user_id = ?1
             WHERE p.deleted_at IS NULL
               AND p.closed_at IS NOT NULL
               AND me.status = 'accepted'
             {LIST_ORDER}"
          ),
          ViewerListKind::Wrote => format!(
            "SELECT {LIST_COLUMNS},
               NULL AS bookmarked,
               (p.closed_at IS NOT NULL) AS closed
             FROM parties p
             WHERE p.deleted_at IS NULL AND p.author_id = ?1
             {LIST_ORDER}"
          ),
          ViewerListKind::Bookmarked => format!(
            "SELECT {LIST_COLUMNS},
               NULL AS bookmarked,
               NULL AS closed
             FROM parties p
             JOIN bookmarks b ON b.party_id = p.party_id AND b.user_id = ?1
             WHERE p.deleted_at IS NULL
             {LIST_ORDER}"
          ),
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![viewer_str], RawPartyRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawPartyRow::into_row)
        .collect::<Result<Vec<_>>>()?,
    )
  }
}

// ─── JoinRequestStore impl ───────────────────────────────────────────────────

impl JoinRequestStore for SqliteStore {
  async fn save_join_request(
    &self,
    request: JoinRequest,
  ) -> CoreResult<JoinRequest> {
    let request_id_str = encode_uuid(request.request_id);
    let party_id_str   = encode_uuid(request.party_id);
    let user_id_str    = encode_uuid(request.user_id);
    let status_str     = request.status.to_string();
    let applied_at_str = encode_dt(request.applied_at);

    self
      .conn
      .call(move |conn| {
        // Status flips re-save an existing id; a fresh application inserts.
        let changed = conn.execute(
          "UPDATE join_requests SET status = ?1 WHERE request_id = ?2",
          rusqlite::params![status_str, request_id_str],
        )?;
        if changed == 0 {
          conn.execute(
            "INSERT INTO join_requests
               (request_id, party_id, user_id, status, applied_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              request_id_str,
              party_id_str,
              user_id_str,
              status_str,
              applied_at_str
            ],
          )?;
        }
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(request)
  }

  async fn find_join_request(
    &self,
    party_id: Uuid,
    user_id: Uuid,
  ) -> CoreResult<Option<JoinRequest>> {
    let party_id_str = encode_uuid(party_id);
    let user_id_str  = encode_uuid(user_id);

    let raw: Option<RawJoinRequest> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT request_id, party_id, user_id, status, applied_at
               FROM join_requests WHERE party_id = ?1 AND user_id = ?2",
              rusqlite::params![party_id_str, user_id_str],
              RawJoinRequest::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawJoinRequest::into_request).transpose()?)
  }

  async fn waiting_for_party(
    &self,
    party_id: Uuid,
  ) -> CoreResult<Vec<JoinRequest>> {
    Ok(self.requests_with_status(party_id, JoinStatus::Waiting).await?)
  }

  async fn accepted_for_party(
    &self,
    party_id: Uuid,
  ) -> CoreResult<Vec<JoinRequest>> {
    Ok(self.requests_with_status(party_id, JoinStatus::Accepted).await?)
  }
}

// ─── BookmarkStore impl ──────────────────────────────────────────────────────

impl BookmarkStore for SqliteStore {
  async fn save_bookmark(&self, bookmark: Bookmark) -> CoreResult<Bookmark> {
    let bookmark_id_str = encode_uuid(bookmark.bookmark_id);
    let user_id_str     = encode_uuid(bookmark.user_id);
    let party_id_str    = encode_uuid(bookmark.party_id);
    let created_at_str  = encode_dt(bookmark.created_at);

    let raw: RawBookmark = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO bookmarks (bookmark_id, user_id, party_id, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (party_id, user_id) DO NOTHING",
          rusqlite::params![
            bookmark_id_str,
            user_id_str,
            party_id_str,
            created_at_str
          ],
        )?;
        // Read back the surviving row: the fresh insert, or the bookmark
        // that was already there.
        Ok(conn.query_row(
          "SELECT bookmark_id, user_id, party_id, created_at
           FROM bookmarks WHERE party_id = ?1 AND user_id = ?2",
          rusqlite::params![party_id_str, user_id_str],
          RawBookmark::from_row,
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.into_bookmark()?)
  }

  async fn delete_bookmark(
    &self,
    party_id: Uuid,
    user_id: Uuid,
  ) -> CoreResult<bool> {
    let party_id_str = encode_uuid(party_id);
    let user_id_str  = encode_uuid(user_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM bookmarks WHERE party_id = ?1 AND user_id = ?2",
          rusqlite::params![party_id_str, user_id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(removed > 0)
  }

  async fn delete_bookmarks_for_party(&self, party_id: Uuid) -> CoreResult<u64> {
    let party_id_str = encode_uuid(party_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM bookmarks WHERE party_id = ?1",
          rusqlite::params![party_id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(removed as u64)
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

impl UserDirectory for SqliteStore {
  async fn save_user(&self, user: User) -> CoreResult<User> {
    let user_id_str = encode_uuid(user.user_id);
    let nickname    = user.nickname.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, nickname) VALUES (?1, ?2)
           ON CONFLICT (user_id) DO UPDATE SET nickname = excluded.nickname",
          rusqlite::params![user_id_str, nickname],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(user)
  }

  async fn find_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, nickname FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawUser::into_user).transpose()?)
  }
}
