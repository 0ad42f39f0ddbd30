// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Team endpoints. Reads are public; writes need a token, deletes an admin.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{AdminOnly, Auth},
    error::{ApiError, ErrorEnvelope},
    extract::Path,
    models::{CreateTeamRequest, TeamDto, UpdateTeamRequest},
    state::AppState,
    validation::ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "Teams",
    responses((status = 200, body = [TeamDto]))
)]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamDto>>, ApiError> {
    let mut uow = state.db.begin().await?;
    let teams = uow.teams().list().await?;
    Ok(Json(teams.into_iter().map(TeamDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team identifier")),
    tag = "Teams",
    responses(
        (status = 200, body = TeamDto),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamDto>, ApiError> {
    let mut uow = state.db.begin().await?;
    let team = uow.teams().get(id).await?;
    Ok(Json(team.into()))
}

#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    tag = "Teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = TeamDto),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope)
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    Auth(principal): Auth,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamDto>), ApiError> {
    let team = request.into_team()?;

    let mut uow = state.db.begin().await?;
    uow.teams().create(&team).await?;
    uow.commit().await?;

    tracing::info!(team_id = %team.id, actor = %principal.subject, "Team created");
    Ok((StatusCode::CREATED, Json(team.into())))
}

#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team identifier")),
    request_body = UpdateTeamRequest,
    tag = "Teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = TeamDto),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope)
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTeamRequest>,
) -> Result<Json<TeamDto>, ApiError> {
    let mut uow = state.db.begin().await?;
    let mut team = uow.teams().get(id).await?;

    request.apply(&mut team, Utc::now());
    uow.teams().update(&team).await?;
    uow.commit().await?;

    tracing::info!(team_id = %team.id, actor = %principal.subject, "Team updated");
    Ok(Json(team.into()))
}

#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    params(("id" = Uuid, Path, description = "Team identifier")),
    tag = "Teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 401, body = ErrorEnvelope),
        (status = 403, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub async fn delete_team(
    State(state): State<AppState>,
    AdminOnly(principal): AdminOnly,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut uow = state.db.begin().await?;
    uow.teams().delete(id).await?;
    uow.commit().await?;

    tracing::info!(team_id = %id, actor = %principal.subject, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}
