//! SQL schema for the jobmatch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- trimmed, lower-cased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- One role per user, written once at signup.
CREATE TABLE IF NOT EXISTS user_roles (
    user_id     TEXT PRIMARY KEY,
    role        TEXT NOT NULL CHECK (role IN ('candidate', 'employer', 'agent')),
    assigned_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS candidate_profiles (
    user_id          TEXT PRIMARY KEY,
    full_name        TEXT NOT NULL,
    email            TEXT NOT NULL,
    job_title        TEXT NOT NULL,
    min_salary       INTEGER NOT NULL DEFAULT 0,
    max_salary       INTEGER NOT NULL DEFAULT 0,
    years_experience INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS employer_profiles (
    user_id         TEXT PRIMARY KEY,
    company_name    TEXT NOT NULL,
    full_name       TEXT NOT NULL,
    company_website TEXT,
    company_size    INTEGER,
    is_sme          INTEGER NOT NULL DEFAULT 1,
    job_title       TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

-- Written only by the agent-provisioning function.
CREATE TABLE IF NOT EXISTS agent_profiles (
    user_id    TEXT PRIMARY KEY,
    full_name  TEXT NOT NULL,
    email      TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- candidate_id and signed_up_at are set exactly once, on completion.
CREATE TABLE IF NOT EXISTS referrals (
    referral_id     TEXT PRIMARY KEY,
    referral_code   TEXT NOT NULL,
    agent_id        TEXT NOT NULL,
    candidate_email TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'completed')),
    candidate_id    TEXT,
    signed_up_at    TEXT,
    created_at      TEXT NOT NULL,
    UNIQUE (referral_code, candidate_email)
);

CREATE INDEX IF NOT EXISTS referrals_agent_idx ON referrals(agent_id);

PRAGMA user_version = 1;
";
