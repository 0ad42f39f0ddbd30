// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface: routes, middleware order and the OpenAPI document.
//!
//! Layers, outermost first:
//!
//! 1. CORS
//! 2. request id (set, then propagate to the response)
//! 3. request tracing
//! 4. error boundary (renders every fault as an `ErrorEnvelope`)
//! 5. authentication (attaches a `Principal` or records the failure)
//!
//! then routing, extractors and the handler.

use axum::{
    http::Uri,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::authenticate, Principal, Role},
    error::{ApiError, ErrorEnvelope, FieldViolation},
    middleware::error_boundary,
    models::{
        CreateTeamRequest, CreateUserProfileRequest, CreateUserRequest, CurrentUserResponse,
        LoginRequest, TeamDto, TokenResponse, UpdateTeamRequest, UpdateUserProfileRequest,
        UpdateUserRequest, UserDto, UserProfileDto,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod profiles;
pub mod teams;
pub mod users;

/// Build the application router.
pub fn router(state: AppState, enable_swagger: bool) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/{id}",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/userprofiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/userprofiles/{id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .delete(profiles::delete_profile),
        );

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .with_state(state.clone());

    if enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    app.layer(from_fn_with_state(state.verifier.clone(), authenticate))
        .layer(from_fn(error_boundary))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

/// Registers the `bearer_auth` HTTP bearer scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Workshop API", description = "Teams, users and user profiles"),
    modifiers(&SecurityAddon),
    paths(
        health::health,
        health::liveness,
        auth::login,
        teams::list_teams,
        teams::get_team,
        teams::create_team,
        teams::update_team,
        teams::delete_team,
        users::create_user,
        users::list_users,
        users::get_user,
        users::get_current_user,
        users::update_user,
        users::delete_user,
        profiles::list_profiles,
        profiles::get_profile,
        profiles::create_profile,
        profiles::update_profile,
        profiles::delete_profile
    ),
    components(
        schemas(
            ErrorEnvelope,
            FieldViolation,
            Principal,
            Role,
            LoginRequest,
            TokenResponse,
            TeamDto,
            CreateTeamRequest,
            UpdateTeamRequest,
            UserDto,
            CreateUserRequest,
            UpdateUserRequest,
            CurrentUserResponse,
            UserProfileDto,
            CreateUserProfileRequest,
            UpdateUserProfileRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Auth", description = "Token issuance"),
        (name = "Teams", description = "Team management"),
        (name = "Users", description = "User accounts"),
        (name = "User Profiles", description = "Personal details, one per user")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::{
        accounts,
        auth::{Principal, Role},
        config::JwtSettings,
        models::CreateUserRequest,
        state::AppState,
        storage::{Database, StoredUser},
    };

    pub const TEST_SECRET: &str = "api-test-secret-0123456789abcdefghij";
    pub const TEST_PASSWORD: &str = "password123";

    pub async fn test_state() -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        AppState::new(db, &JwtSettings::new(TEST_SECRET))
    }

    /// State over a database file with a multi-connection pool.
    pub async fn file_state(dir: &tempfile::TempDir) -> AppState {
        let url = format!("sqlite://{}", dir.path().join("workshop.db").display());
        let db = Database::connect(&url).await.unwrap();
        AppState::new(db, &JwtSettings::new(TEST_SECRET))
    }

    pub fn principal(user_id: Uuid, role: Role) -> Principal {
        Principal {
            subject: user_id.to_string(),
            username: None,
            roles: vec![role],
            expires_at: (Utc::now() + Duration::hours(1)).timestamp(),
            issuer: None,
        }
    }

    /// Principal for a user that does not exist in the database.
    pub fn member() -> Principal {
        principal(Uuid::new_v4(), Role::Member)
    }

    pub fn admin() -> Principal {
        principal(Uuid::new_v4(), Role::Admin)
    }

    /// Persist a user and return it with a matching principal.
    pub async fn register(state: &AppState, username: &str, role: Role) -> (StoredUser, Principal) {
        let mut uow = state.db.begin().await.unwrap();
        let user = accounts::register(
            &mut uow,
            CreateUserRequest {
                username: Some(username.to_string()),
                email: Some(format!("{username}@example.com")),
                password: Some(TEST_PASSWORD.to_string()),
                team_id: None,
            },
            role,
        )
        .await
        .unwrap();
        uow.commit().await.unwrap();

        let principal = principal(user.id, role);
        (user, principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(test_support::test_state().await, true);
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let scheme = &doc["components"]["securitySchemes"]["bearer_auth"];
        assert_eq!(scheme["type"], "http");
        assert_eq!(scheme["scheme"], "bearer");
        assert_eq!(scheme["bearerFormat"], "JWT");
        assert!(doc["paths"]["/api/teams/{id}"].is_object());
    }

    #[tokio::test]
    async fn swagger_can_be_disabled() {
        let app = router(test_support::test_state().await, false);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
