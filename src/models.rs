// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response payloads used by the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema`; request types also derive
//! `Validate` and are extracted through
//! [`ValidatedJson`](crate::validation::ValidatedJson).
//!
//! Required request fields are `Option<_>` carrying a `required` rule so a
//! missing field is reported as a validation violation.
//!
//! ## Model Categories
//!
//! - **Teams**: named groups of users
//! - **Users**: accounts with a role and optional team
//! - **User Profiles**: personal details, one per user
//! - **Auth**: login and issued tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;

// =============================================================================
// Team Models
// =============================================================================

/// A team.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a team.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    /// Unique team name (2 to 100 characters).
    #[validate(
        required(message = "is required"),
        length(min = 2, max = 100, message = "must be between 2 and 100 characters")
    )]
    #[schema(example = "Platform")]
    pub name: Option<String>,
    /// Free-form description (at most 500 characters).
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request body for updating a team. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

// =============================================================================
// User Models
// =============================================================================

/// A user account. The password hash is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Unique login name (3 to 50 characters).
    #[validate(
        required(message = "is required"),
        length(min = 3, max = 50, message = "must be between 3 and 50 characters")
    )]
    #[schema(example = "grace")]
    pub username: Option<String>,
    #[validate(
        required(message = "is required"),
        email(message = "must be a valid email address")
    )]
    #[schema(example = "grace@example.com")]
    pub email: Option<String>,
    /// Plain-text password (8 to 128 characters); stored as an Argon2 hash.
    #[validate(
        required(message = "is required"),
        length(min = 8, max = 128, message = "must be between 8 and 128 characters")
    )]
    pub password: Option<String>,
    /// Team to join.
    pub team_id: Option<Uuid>,
}

/// Request body for updating a user. Absent fields are left unchanged.
///
/// Only administrators may change `role`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    /// Team to join. Use `clearTeam` to leave the current team.
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub clear_team: bool,
}

/// Response for GET /api/users/me
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub user: UserDto,
    /// Roles carried by the presented token.
    pub token_roles: Vec<Role>,
    /// When the presented token expires.
    pub token_expires_at: DateTime<Utc>,
}

// =============================================================================
// User Profile Models
// =============================================================================

/// A user profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfileRequest {
    /// Owner of the profile. Defaults to the caller; only administrators may
    /// create a profile for someone else.
    pub user_id: Option<Uuid>,
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 50, message = "must be between 1 and 50 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 50, message = "must be between 1 and 50 characters")
    )]
    pub last_name: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub bio: Option<String>,
}

/// Request body for updating a profile. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileRequest {
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub bio: Option<String>,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Login request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(required(message = "is required"))]
    pub username: Option<String>,
    #[validate(required(message = "is required"))]
    pub password: Option<String>,
}

/// Issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}
