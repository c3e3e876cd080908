//! SQL schema for the TravelSafe SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Incidents are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
-- AUTOINCREMENT keeps ids strictly increasing and never reused.
--
-- Coordinates and timestamp are nullable so rows written by other tools can
-- still be stored; the scanner reports such rows as malformed.
CREATE TABLE IF NOT EXISTS incidents (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    latitude      REAL,            -- WGS-84 decimal degrees
    longitude     REAL,
    incident_type TEXT NOT NULL,
    description   TEXT,
    reported_at   TEXT,            -- ISO 8601 UTC; server-assigned
    verified      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS incidents_location_idx
    ON incidents(latitude, longitude);

PRAGMA user_version = 1;
";
