// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Team repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::super::{StorageError, StorageResult};

/// Team row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoredTeam {
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTeam {
    /// New team with a fresh id, stamped now.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository for team operations.
pub struct TeamRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> TeamRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Check if a team exists.
    pub async fn exists(&mut self, team_id: Uuid) -> StorageResult<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(found.is_some())
    }

    /// Get a team by ID.
    pub async fn get(&mut self, team_id: Uuid) -> StorageResult<StoredTeam> {
        sqlx::query_as::<_, StoredTeam>(
            "SELECT id, name, description, created_at, updated_at FROM teams WHERE id = ?",
        )
        .bind(team_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("Team {team_id}")))
    }

    /// List all teams ordered by name.
    pub async fn list(&mut self) -> StorageResult<Vec<StoredTeam>> {
        let teams = sqlx::query_as::<_, StoredTeam>(
            "SELECT id, name, description, created_at, updated_at FROM teams ORDER BY name",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(teams)
    }

    /// Create a new team.
    pub async fn create(&mut self, team: &StoredTeam) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO teams (id, name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.description)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    /// Update an existing team.
    pub async fn update(&mut self, team: &StoredTeam) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE teams SET name = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&team.name)
        .bind(&team.description)
        .bind(team.updated_at)
        .bind(team.id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Team {}", team.id)));
        }
        Ok(())
    }

    /// Delete a team. Members keep their accounts and lose the team link.
    pub async fn delete(&mut self, team_id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(team_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Team {team_id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn create_and_get() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let team = StoredTeam::new("Core", Some("Core services".into()));

        uow.teams().create(&team).await.unwrap();
        let stored = uow.teams().get(team.id).await.unwrap();

        assert_eq!(stored.name, "Core");
        assert_eq!(stored.description.as_deref(), Some("Core services"));
        assert!(uow.teams().exists(team.id).await.unwrap());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();

        let result = uow.teams().get(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();

        uow.teams().create(&StoredTeam::new("Core", None)).await.unwrap();
        let result = uow.teams().create(&StoredTeam::new("Core", None)).await;

        match result {
            Err(StorageError::Conflict(column)) => assert_eq!(column, "name"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_is_ordered_by_name() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();

        uow.teams().create(&StoredTeam::new("Zeta", None)).await.unwrap();
        uow.teams().create(&StoredTeam::new("Alpha", None)).await.unwrap();

        let names: Vec<_> = uow
            .teams()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut team = StoredTeam::new("Ops", None);
        uow.teams().create(&team).await.unwrap();

        team.name = "Operations".into();
        uow.teams().update(&team).await.unwrap();
        assert_eq!(uow.teams().get(team.id).await.unwrap().name, "Operations");

        uow.teams().delete(team.id).await.unwrap();
        assert!(matches!(
            uow.teams().delete(team.id).await,
            Err(StorageError::NotFound(_))
        ));
    }
}
