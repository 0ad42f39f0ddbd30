// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    accounts,
    error::{ApiError, ErrorEnvelope},
    mapping::required,
    models::{LoginRequest, TokenResponse},
    state::AppState,
    validation::ValidatedJson,
};

/// Exchange a username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, body = ErrorEnvelope),
        (status = 401, description = "Invalid username or password", body = ErrorEnvelope)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = required(request.username, "username")?;
    let password = required(request.password, "password")?;

    let user = {
        let mut uow = state.db.begin().await?;
        accounts::authenticate(&mut uow, &username, &password).await?
    };

    let issued = state
        .issuer
        .issue(user.id, &user.username, user.role, Utc::now())?;

    tracing::info!(user_id = %user.id, "Token issued");
    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}
