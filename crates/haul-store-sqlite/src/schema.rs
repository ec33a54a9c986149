//! SQL schema for the gazetteer.

/// Idempotent; run on every open.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS zip_codes (
    name        TEXT PRIMARY KEY,   -- five-digit zip, e.g. '66619'
    description TEXT NOT NULL,      -- locality, e.g. 'Topeka, KS'
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL
);

PRAGMA user_version = 1;
";
