//! SQL schema for the moim SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id   TEXT PRIMARY KEY,
    nickname  TEXT NOT NULL
);

-- Parties are soft-deleted: deleted_at is set and the row stays.
-- closed_at / deleted_at double as the state flags; at most one is set.
CREATE TABLE IF NOT EXISTS parties (
    party_id        TEXT PRIMARY KEY,
    author_id       TEXT NOT NULL REFERENCES users(user_id),
    title           TEXT NOT NULL,
    body            TEXT NOT NULL,
    category        TEXT NOT NULL,     -- snake_case Category variant
    location        TEXT NOT NULL,     -- snake_case ActivityLocation variant
    contact_method  TEXT NOT NULL,     -- snake_case ContactMethod variant
    contact_value   TEXT NOT NULL,
    starts_on       TEXT NOT NULL,     -- ISO 8601 date
    duration_amount INTEGER NOT NULL,
    duration_unit   TEXT NOT NULL,     -- 'day' | 'week' | 'month'
    recruit_number  INTEGER NOT NULL CHECK (recruit_number >= 1),
    closes_on       TEXT NOT NULL,     -- ISO 8601 date
    view_count      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,     -- RFC 3339 UTC
    modified_at     TEXT NOT NULL,
    closed_at       TEXT,
    deleted_at      TEXT
);

-- One application per (party, user); acceptance flips status in place.
CREATE TABLE IF NOT EXISTS join_requests (
    request_id  TEXT PRIMARY KEY,
    party_id    TEXT NOT NULL REFERENCES parties(party_id),
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    status      TEXT NOT NULL,         -- 'waiting' | 'accepted'
    applied_at  TEXT NOT NULL,
    UNIQUE (party_id, user_id)
);

CREATE TABLE IF NOT EXISTS bookmarks (
    bookmark_id TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    party_id    TEXT NOT NULL REFERENCES parties(party_id),
    created_at  TEXT NOT NULL,
    UNIQUE (party_id, user_id)
);

CREATE INDEX IF NOT EXISTS parties_author_idx  ON parties(author_id);
CREATE INDEX IF NOT EXISTS parties_created_idx ON parties(created_at);
CREATE INDEX IF NOT EXISTS requests_party_idx  ON join_requests(party_id);
CREATE INDEX IF NOT EXISTS requests_user_idx   ON join_requests(user_id);
CREATE INDEX IF NOT EXISTS bookmarks_user_idx  ON bookmarks(user_id);

PRAGMA user_version = 1;
";
