// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SQLite connection pool and schema migrations.

use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};

use super::{StorageResult, UnitOfWork};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool size for file-backed databases.
const MAX_CONNECTIONS: u32 = 8;

/// Handle to the application database.
///
/// Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at `url` and apply pending migrations.
    ///
    /// `sqlite::memory:` databases live as long as their connection, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn connect(url: &str) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .connect_with(options)
                .await?
        };

        MIGRATOR.run(&pool).await?;
        tracing::info!(in_memory = is_in_memory(url), "Database ready");

        Ok(Self { pool })
    }

    /// Start a unit of work.
    pub async fn begin(&self) -> StorageResult<UnitOfWork> {
        UnitOfWork::begin(&self.pool).await
    }

    /// Start a unit of work that holds the write lock from its first statement.
    pub async fn begin_write(&self) -> StorageResult<UnitOfWork> {
        UnitOfWork::begin_immediate(&self.pool).await
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
