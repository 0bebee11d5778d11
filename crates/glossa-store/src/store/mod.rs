//! SQLite-backed translation catalog store.
//!
//! Split into focused submodules:
//! - `translations` — CRUD with uniqueness and optimistic-concurrency enforcement
//! - `tags` — resolve-or-create and tag queries
//! - `search` — dynamic multi-filter search with pagination
//! - `export` — bulk row loading for export snapshots

mod export;
mod search;
mod tags;
mod translations;

use chrono::{DateTime, NaiveDateTime, Utc};
use glossa_core::{config::StorageConfig, error::GlossaError, shellexpand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Persistent translation store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a new store, running migrations on first use.
    pub async fn new(config: &StorageConfig) -> Result<Self, GlossaError> {
        let db_path = shellexpand(&config.db_path);
        let in_memory = db_path == ":memory:";

        // Ensure parent directory exists.
        if !in_memory {
            if let Some(parent) = std::path::Path::new(&db_path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| GlossaError::Storage(format!("failed to create data dir: {e}")))?;
            }
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| GlossaError::Storage(format!("invalid db path: {e}")))?
            .create_if_missing(true);
        let opts = if in_memory {
            opts
        } else {
            opts.journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        };

        // SQLite gives every connection its own :memory: database, so the
        // pool must stay at a single connection for in-memory use.
        let max_connections = if in_memory { 1 } else { config.max_connections };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await
            .map_err(|e| GlossaError::Storage(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Translation store initialized at {db_path}");

        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), GlossaError> {
        // Create migration tracking table.
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] =
            &[("001_init", include_str!("../../migrations/001_init.sql"))];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        GlossaError::Storage(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| GlossaError::Storage(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    GlossaError::Storage(format!("failed to record migration {name}: {e}"))
                })?;
        }
        Ok(())
    }
}

/// Parse a SQLite `datetime('now')` timestamp (UTC, second resolution).
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, GlossaError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .map_err(|e| GlossaError::Storage(format!("bad timestamp '{s}': {e}")))
}
