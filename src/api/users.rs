// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::{
    accounts,
    auth::{AdminOnly, Auth, Principal, Role},
    error::{ApiError, ErrorEnvelope},
    extract::Path,
    models::{CreateUserRequest, CurrentUserResponse, UpdateUserRequest, UserDto},
    state::AppState,
    validation::ValidatedJson,
};

/// User id named by the token subject.
pub(crate) fn caller_id(principal: &Principal) -> Result<Uuid, ApiError> {
    principal
        .user_id()
        .ok_or_else(|| ApiError::unauthorized("Token subject is not a user id"))
}

/// Register a new account. Self-registered accounts are always members.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 201, body = UserDto),
        (status = 400, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let mut uow = state.db.begin().await?;
    let user = accounts::register(&mut uow, request, Role::Member).await?;
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [UserDto]),
        (status = 401, body = ErrorEnvelope)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Auth(_principal): Auth,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let mut uow = state.db.begin().await?;
    let users = uow.users().list().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserDto),
        (status = 401, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Auth(_principal): Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    let mut uow = state.db.begin().await?;
    let user = uow.users().get(id).await?;
    Ok(Json(user.into()))
}

/// Get the account behind the presented token.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelope)
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user_id = caller_id(&principal)?;

    let mut uow = state.db.begin().await?;
    let user = uow.users().get(user_id).await?;

    let token_expires_at = Utc
        .timestamp_opt(principal.expires_at, 0)
        .single()
        .ok_or_else(|| ApiError::internal("Principal expiry out of range"))?;

    Ok(Json(CurrentUserResponse {
        user: user.into(),
        token_roles: principal.roles,
        token_expires_at,
    }))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserDto),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope),
        (status = 403, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    // Role changes read the admin count before writing.
    let mut uow = state.db.begin_write().await?;
    let user = accounts::update_user(&mut uow, &principal, id, request, Utc::now()).await?;
    uow.commit().await?;

    tracing::info!(user_id = %user.id, actor = %principal.subject, "User updated");
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 401, body = ErrorEnvelope),
        (status = 403, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminOnly(principal): AdminOnly,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut uow = state.db.begin_write().await?;
    let user = uow.users().get(id).await?;

    if user.role == Role::Admin && uow.users().count_with_role(Role::Admin).await? <= 1 {
        return Err(ApiError::conflict("At least one administrator must remain"));
    }

    uow.users().delete(id).await?;
    uow.commit().await?;

    tracing::info!(user_id = %id, actor = %principal.subject, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
