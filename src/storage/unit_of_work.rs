// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transactional unit of work.
//!
//! ```rust,ignore
//! let mut uow = db.begin().await?;
//! let team = uow.teams().create(&team).await?;
//! uow.users().update(&user).await?;
//! uow.commit().await?;
//! ```

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{StorageResult, TeamRepository, UserProfileRepository, UserRepository};

/// A group of repository operations committed atomically.
///
/// Dropping a unit of work without calling [`commit`](Self::commit) rolls
/// back everything written through it.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub async fn begin(pool: &SqlitePool) -> StorageResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Begin with the database write lock already held (`BEGIN IMMEDIATE`).
    ///
    /// Needed when a write depends on a count read in the same unit of work:
    /// concurrent writers queue on the busy timeout instead of failing to
    /// upgrade a read lock.
    pub async fn begin_immediate(pool: &SqlitePool) -> StorageResult<Self> {
        let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(Self { tx })
    }

    pub fn teams(&mut self) -> TeamRepository<'_> {
        TeamRepository::new(&mut *self.tx)
    }

    pub fn users(&mut self) -> UserRepository<'_> {
        UserRepository::new(&mut *self.tx)
    }

    pub fn profiles(&mut self) -> UserProfileRepository<'_> {
        UserProfileRepository::new(&mut *self.tx)
    }

    pub async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
