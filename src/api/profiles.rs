// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile endpoints.
//!
//! Any authenticated caller can read profiles. Only the owner or an admin
//! can change or remove one.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use uuid::Uuid;

use super::users::caller_id;
use crate::{
    auth::{ensure_owner_or_admin, Auth},
    error::{ApiError, ErrorEnvelope},
    extract::Path,
    models::{CreateUserProfileRequest, UpdateUserProfileRequest, UserProfileDto},
    state::AppState,
    storage::StorageError,
    validation::ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/userprofiles",
    tag = "User Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [UserProfileDto]),
        (status = 401, body = ErrorEnvelope)
    )
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    Auth(_principal): Auth,
) -> Result<Json<Vec<UserProfileDto>>, ApiError> {
    let mut uow = state.db.begin().await?;
    let profiles = uow.profiles().list().await?;
    Ok(Json(profiles.into_iter().map(UserProfileDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/userprofiles/{id}",
    params(("id" = Uuid, Path, description = "Profile identifier")),
    tag = "User Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserProfileDto),
        (status = 401, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Auth(_principal): Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfileDto>, ApiError> {
    let mut uow = state.db.begin().await?;
    let profile = uow.profiles().get(id).await?;
    Ok(Json(profile.into()))
}

/// Create a profile. Members create their own; admins may name any user.
#[utoipa::path(
    post,
    path = "/api/userprofiles",
    request_body = CreateUserProfileRequest,
    tag = "User Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = UserProfileDto),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope),
        (status = 403, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope)
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Auth(principal): Auth,
    ValidatedJson(request): ValidatedJson<CreateUserProfileRequest>,
) -> Result<(StatusCode, Json<UserProfileDto>), ApiError> {
    let owner = match request.user_id {
        Some(user_id) => {
            ensure_owner_or_admin(&principal, user_id)?;
            user_id
        }
        None => caller_id(&principal)?,
    };

    let mut uow = state.db.begin().await?;

    match uow.users().get(owner).await {
        Ok(_) => {}
        Err(StorageError::NotFound(_)) => {
            return Err(ApiError::validation("userId", "must reference an existing user"));
        }
        Err(e) => return Err(e.into()),
    }
    if uow.profiles().find_by_user_id(owner).await?.is_some() {
        return Err(ApiError::conflict("User already has a profile"));
    }

    let profile = request.into_profile(owner, Utc::now())?;
    uow.profiles().create(&profile).await?;
    uow.commit().await?;

    tracing::info!(profile_id = %profile.id, user_id = %owner, "Profile created");
    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[utoipa::path(
    put,
    path = "/api/userprofiles/{id}",
    params(("id" = Uuid, Path, description = "Profile identifier")),
    request_body = UpdateUserProfileRequest,
    tag = "User Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserProfileDto),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope),
        (status = 403, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserProfileRequest>,
) -> Result<Json<UserProfileDto>, ApiError> {
    let mut uow = state.db.begin().await?;
    let mut profile = uow.profiles().get(id).await?;
    ensure_owner_or_admin(&principal, profile.user_id)?;

    request.apply(&mut profile, Utc::now());
    uow.profiles().update(&profile).await?;
    uow.commit().await?;

    Ok(Json(profile.into()))
}

#[utoipa::path(
    delete,
    path = "/api/userprofiles/{id}",
    params(("id" = Uuid, Path, description = "Profile identifier")),
    tag = "User Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 401, body = ErrorEnvelope),
        (status = 403, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut uow = state.db.begin().await?;
    let profile = uow.profiles().get(id).await?;
    ensure_owner_or_admin(&principal, profile.user_id)?;

    uow.profiles().delete(id).await?;
    uow.commit().await?;

    tracing::info!(profile_id = %id, actor = %principal.subject, "Profile deleted");
    Ok(StatusCode::NO_CONTENT)
}
