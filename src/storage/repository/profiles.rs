// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile repository.
//!
//! Each user has at most one profile; it is removed together with the user.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::super::{StorageError, StorageResult};

const PROFILE_COLUMNS: &str = "id, user_id, first_name, last_name, bio, created_at, updated_at";

/// User profile row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoredUserProfile {
    pub id: Uuid,
    /// Owning user (unique)
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for user profile operations.
pub struct UserProfileRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserProfileRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Get a profile by ID.
    pub async fn get(&mut self, profile_id: Uuid) -> StorageResult<StoredUserProfile> {
        sqlx::query_as::<_, StoredUserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = ?"
        ))
        .bind(profile_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("User profile {profile_id}")))
    }

    /// Get the profile of a user, if one exists.
    pub async fn find_by_user_id(
        &mut self,
        user_id: Uuid,
    ) -> StorageResult<Option<StoredUserProfile>> {
        let profile = sqlx::query_as::<_, StoredUserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(profile)
    }

    /// List all profiles, oldest first.
    pub async fn list(&mut self) -> StorageResult<Vec<StoredUserProfile>> {
        let profiles = sqlx::query_as::<_, StoredUserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles ORDER BY created_at, id"
        ))
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(profiles)
    }

    /// Create a new profile.
    pub async fn create(&mut self, profile: &StoredUserProfile) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO user_profiles \
             (id, user_id, first_name, last_name, bio, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.bio)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    /// Update an existing profile. The owner never changes.
    pub async fn update(&mut self, profile: &StoredUserProfile) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE user_profiles SET first_name = ?, last_name = ?, bio = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.bio)
        .bind(profile.updated_at)
        .bind(profile.id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("User profile {}", profile.id)));
        }
        Ok(())
    }

    /// Delete a profile.
    pub async fn delete(&mut self, profile_id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = ?")
            .bind(profile_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("User profile {profile_id}")));
        }
        Ok(())
    }
}
