// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::super::{StorageError, StorageResult};
use crate::auth::Role;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, team_id, created_at, updated_at";

/// User row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoredUser {
    pub id: Uuid,
    /// Unique login name
    pub username: String,
    /// Unique contact address
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    /// Team membership, cleared when the team is deleted
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for user operations.
pub struct UserRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Get a user by ID.
    pub async fn get(&mut self, user_id: Uuid) -> StorageResult<StoredUser> {
        sqlx::query_as::<_, StoredUser>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(user_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))
    }

    /// Look up a user by login name.
    pub async fn find_by_username(&mut self, username: &str) -> StorageResult<Option<StoredUser>> {
        let user = sqlx::query_as::<_, StoredUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(user)
    }

    /// List all users ordered by username.
    pub async fn list(&mut self) -> StorageResult<Vec<StoredUser>> {
        let users = sqlx::query_as::<_, StoredUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(users)
    }

    /// Count users holding `role`.
    pub async fn count_with_role(&mut self, role: Role) -> StorageResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role.as_str())
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }

    /// Create a new user.
    pub async fn create(&mut self, user: &StoredUser) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO users \
             (id, username, email, password_hash, role, team_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.team_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    /// Update an existing user.
    pub async fn update(&mut self, user: &StoredUser) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, role = ?, \
             team_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.team_id)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        Ok(())
    }

    /// Delete a user. The profile goes with it.
    pub async fn delete(&mut self, user_id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        Ok(())
    }
}
