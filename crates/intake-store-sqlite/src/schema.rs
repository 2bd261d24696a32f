//! SQL schema for the intake SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS submissions (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    first_name     TEXT NOT NULL,
    last_name      TEXT NOT NULL,
    email          TEXT NOT NULL,
    company        TEXT,
    role           TEXT,
    interest_area  TEXT,
    goals          TEXT,
    status         TEXT NOT NULL DEFAULT 'new',  -- 'new' | 'lead' | 'client' | 'closed'
    tags           TEXT NOT NULL DEFAULT '[]',   -- JSON array; insertion order preserved
    resurface_date TEXT,                         -- ISO 8601 UTC or NULL
    deleted_at     TEXT,                         -- non-null marks a soft delete
    ip_address     TEXT,                         -- rate-limit bookkeeping; not exposed
    user_agent     TEXT
);

-- Notes are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS submission_notes (
    note_id       TEXT PRIMARY KEY,
    submission_id TEXT NOT NULL REFERENCES submissions(id),
    note_type     TEXT NOT NULL DEFAULT 'general',
    note_text     TEXT NOT NULL,
    created_by    TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS submissions_created_idx ON submissions(created_at);
CREATE INDEX IF NOT EXISTS submissions_ip_idx      ON submissions(ip_address, created_at);
CREATE INDEX IF NOT EXISTS notes_submission_idx    ON submission_notes(submission_id);

PRAGMA user_version = 1;
";
