//! SQL schema for the CEPEX SQLite store.
//!
//! Executed once at connection startup. The schema version is recorded in
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    login      TEXT NOT NULL UNIQUE,
    email      TEXT NOT NULL,
    active     INTEGER NOT NULL DEFAULT 1,
    role       TEXT NOT NULL,   -- 'ADMIN' | 'STUDENT' | 'PROFESSOR' | ...
    created_at TEXT NOT NULL
);

-- Lookup rows; only used to resolve labels on read.
CREATE TABLE IF NOT EXISTS professors (
    professor_id TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS disciplines (
    discipline_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL
);

-- ── Opportunities ────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS assistantships (
    posting_id           TEXT PRIMARY KEY,
    title                TEXT NOT NULL,
    description          TEXT,
    remote               INTEGER NOT NULL DEFAULT 0,
    location             TEXT,
    vacancies            INTEGER NOT NULL,
    workload_hours       INTEGER NOT NULL,
    starts_on            TEXT,   -- YYYY-MM-DD
    ends_on              TEXT,
    enrollment_opens_on  TEXT,
    enrollment_closes_on TEXT,
    selection            TEXT NOT NULL,
    status               TEXT NOT NULL,
    professor_id         TEXT REFERENCES professors(professor_id),
    discipline_id        TEXT REFERENCES disciplines(discipline_id)
);

CREATE TABLE IF NOT EXISTS research_projects (
    project_id         TEXT PRIMARY KEY,
    title              TEXT NOT NULL,
    description        TEXT,
    starts_on          TEXT,
    ends_on            TEXT,
    status             TEXT NOT NULL,
    lead_researcher_id TEXT REFERENCES users(user_id),
    research_line      TEXT
);

CREATE TABLE IF NOT EXISTS extension_projects (
    project_id           TEXT PRIMARY KEY,
    title                TEXT NOT NULL,
    description          TEXT,
    location             TEXT,
    target_beneficiaries TEXT,
    starts_on            TEXT,
    ends_on              TEXT,
    status               TEXT NOT NULL,
    coordinator_id       TEXT REFERENCES users(user_id)
);

-- ── Application records ──────────────────────────────────────────────────
-- One row per (opportunity, candidate), reused across re-applications.
-- Rows are never deleted.

CREATE TABLE IF NOT EXISTS assistantship_applications (
    application_id TEXT PRIMARY KEY,
    opportunity_id TEXT NOT NULL REFERENCES assistantships(posting_id),
    candidate_id   TEXT NOT NULL REFERENCES users(user_id),
    status         TEXT NOT NULL,
    applied_at     TEXT NOT NULL,   -- RFC 3339 UTC
    UNIQUE (opportunity_id, candidate_id)
);

CREATE TABLE IF NOT EXISTS research_applications (
    application_id TEXT PRIMARY KEY,
    opportunity_id TEXT NOT NULL REFERENCES research_projects(project_id),
    candidate_id   TEXT NOT NULL REFERENCES users(user_id),
    status         TEXT NOT NULL,
    applied_at     TEXT NOT NULL,
    UNIQUE (opportunity_id, candidate_id)
);

CREATE TABLE IF NOT EXISTS extension_applications (
    application_id TEXT PRIMARY KEY,
    opportunity_id TEXT NOT NULL REFERENCES extension_projects(project_id),
    candidate_id   TEXT NOT NULL REFERENCES users(user_id),
    status         TEXT NOT NULL,
    applied_at     TEXT NOT NULL,
    UNIQUE (opportunity_id, candidate_id)
);

CREATE INDEX IF NOT EXISTS assistantship_applications_candidate_idx
    ON assistantship_applications(candidate_id);
CREATE INDEX IF NOT EXISTS research_applications_candidate_idx
    ON research_applications(candidate_id);
CREATE INDEX IF NOT EXISTS extension_applications_candidate_idx
    ON extension_applications(candidate_id);

PRAGMA user_version = 1;
";
