//! SQL schema for the UrbanVoice SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS citizens (
    citizen_id    TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    phone         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- citizen_id is checked at submission time only; name and phone are a
-- snapshot and are never refreshed from citizens.
CREATE TABLE IF NOT EXISTS complaints (
    complaint_id     TEXT PRIMARY KEY,
    complaint_number TEXT NOT NULL UNIQUE,
    citizen_id       TEXT NOT NULL,
    citizen_name     TEXT NOT NULL,
    citizen_phone    TEXT NOT NULL,
    complaint_name   TEXT NOT NULL,
    complaint_type   TEXT NOT NULL
        CHECK (complaint_type IN ('Electricity', 'Water', 'Road', 'Garbage')),
    address          TEXT NOT NULL,
    description      TEXT NOT NULL,
    image_url        TEXT,
    status           TEXT NOT NULL DEFAULT 'Sent'
        CHECK (status IN ('Sent', 'Viewed', 'On Progress', 'Resolved')),
    created_at       TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at       TEXT NOT NULL
);

-- Append-only archive. No UPDATE or DELETE is ever issued against this
-- table.
CREATE TABLE IF NOT EXISTS backup_complaints (
    backup_id           TEXT PRIMARY KEY,
    original_id         TEXT NOT NULL,
    complaint_number    TEXT NOT NULL,
    citizen_id          TEXT NOT NULL,
    citizen_name        TEXT NOT NULL,
    citizen_phone       TEXT NOT NULL,
    complaint_name      TEXT NOT NULL,
    complaint_type      TEXT NOT NULL,
    address             TEXT NOT NULL,
    description         TEXT NOT NULL,
    image_url           TEXT,
    status              TEXT NOT NULL,
    original_created_at TEXT NOT NULL,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS complaints_citizen_idx ON complaints(citizen_id);
CREATE INDEX IF NOT EXISTS complaints_status_idx  ON complaints(status);
CREATE INDEX IF NOT EXISTS complaints_created_idx ON complaints(created_at);
CREATE INDEX IF NOT EXISTS backups_original_idx   ON backup_complaints(original_id);

PRAGMA user_version = 1;
";
