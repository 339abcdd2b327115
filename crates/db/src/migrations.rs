/// Inline SQL migrations for the benchview job store schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.
pub const MIGRATIONS: &[&str] = &[
    // Migration 1: jobs table
    r#"
CREATE TABLE IF NOT EXISTS jobs (
    id          TEXT PRIMARY KEY,
    job_type    TEXT NOT NULL,
    action      TEXT NOT NULL,
    status      TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    started_at  INTEGER,
    finished_at INTEGER,
    progress    INTEGER,
    message     TEXT,
    error       TEXT
);
"#,
    // Migration 2: recency index for the bounded list view
    r#"CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at DESC);"#,
];
