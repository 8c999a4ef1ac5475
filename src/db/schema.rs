//! Database schema and migrations for Caixa-Preta.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded. The schema_version table tracks which have been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users, mirrored from the identity provider
    r#"
CREATE TABLE users (
    id          TEXT PRIMARY KEY,        -- Identity provider subject
    email       TEXT UNIQUE,
    name        TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
"#,
    // v2: Categories, unique per owner
    r#"
CREATE TABLE categories (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    user_id     TEXT NOT NULL REFERENCES users(id),
    UNIQUE(user_id, name)
);

CREATE INDEX idx_categories_user_id ON categories(user_id);
"#,
    // v3: Files; path is the object storage key
    r#"
CREATE TABLE files (
    id          TEXT PRIMARY KEY,
    filename    TEXT NOT NULL,
    path        TEXT NOT NULL UNIQUE,
    category_id TEXT NOT NULL REFERENCES categories(id),
    user_id     TEXT NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL
);

CREATE INDEX idx_files_user_id_created_at ON files(user_id, created_at);
CREATE INDEX idx_files_category_id ON files(category_id);
"#,
];
