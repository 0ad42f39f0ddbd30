// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversions between stored rows and API payloads.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        CreateTeamRequest, CreateUserProfileRequest, TeamDto, UpdateTeamRequest,
        UpdateUserProfileRequest, UserDto, UserProfileDto,
    },
    storage::{StoredTeam, StoredUser, StoredUserProfile},
};

/// Take a field the `required` rule has already checked.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(field, "is required"))
}

impl From<StoredTeam> for TeamDto {
    fn from(team: StoredTeam) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

impl From<StoredUser> for UserDto {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            team_id: user.team_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<StoredUserProfile> for UserProfileDto {
    fn from(profile: StoredUserProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            bio: profile.bio,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

impl CreateTeamRequest {
    pub fn into_team(self) -> Result<StoredTeam, ApiError> {
        let name = required(self.name, "name")?;
        Ok(StoredTeam::new(name, self.description))
    }
}

impl UpdateTeamRequest {
    pub fn apply(self, team: &mut StoredTeam, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(description) = self.description {
            team.description = Some(description);
        }
        team.updated_at = now;
    }
}

impl CreateUserProfileRequest {
    /// Build the profile row for `owner`, already resolved by the caller.
    pub fn into_profile(
        self,
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StoredUserProfile, ApiError> {
        Ok(StoredUserProfile {
            id: Uuid::new_v4(),
            user_id: owner,
            first_name: required(self.first_name, "firstName")?,
            last_name: required(self.last_name, "lastName")?,
            bio: self.bio,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateUserProfileRequest {
    pub fn apply(self, profile: &mut StoredUserProfile, now: DateTime<Utc>) {
        if let Some(first_name) = self.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = last_name;
        }
        if let Some(bio) = self.bio {
            profile.bio = Some(bio);
        }
        profile.updated_at = now;
    }
}
