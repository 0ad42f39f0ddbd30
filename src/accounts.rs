// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account operations shared by the user and auth endpoints.
//!
//! Everything here runs inside a caller-owned [`UnitOfWork`]; committing is
//! the caller's decision.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    auth::{ensure_owner_or_admin, password, Principal, Role},
    config::SeedAdmin,
    error::ApiError,
    mapping::required,
    models::{CreateUserRequest, UpdateUserRequest},
    storage::{Database, StoredUser, UnitOfWork},
};

/// Same message for unknown users and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Create an account with the given role.
pub async fn register(
    uow: &mut UnitOfWork,
    request: CreateUserRequest,
    role: Role,
) -> Result<StoredUser, ApiError> {
    let username = required(request.username, "username")?;
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;

    if let Some(team_id) = request.team_id {
        ensure_team_exists(uow, team_id).await?;
    }

    let now = Utc::now();
    let user = StoredUser {
        id: Uuid::new_v4(),
        username,
        email,
        password_hash: password::hash_password(&password)?,
        role,
        team_id: request.team_id,
        created_at: now,
        updated_at: now,
    };

    uow.users().create(&user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok(user)
}

/// Check a username/password pair.
pub async fn authenticate(
    uow: &mut UnitOfWork,
    username: &str,
    password: &str,
) -> Result<StoredUser, ApiError> {
    let Some(user) = uow.users().find_by_username(username).await? else {
        tracing::debug!(username, "Login for unknown user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !password::verify_password(password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    Ok(user)
}

/// Apply an update on behalf of `principal`.
///
/// Members may edit their own account but not their role. The last
/// administrator cannot be demoted.
pub async fn update_user(
    uow: &mut UnitOfWork,
    principal: &Principal,
    user_id: Uuid,
    request: UpdateUserRequest,
    now: DateTime<Utc>,
) -> Result<StoredUser, ApiError> {
    ensure_owner_or_admin(principal, user_id)?;
    let mut user = uow.users().get(user_id).await?;

    if let Some(role) = request.role {
        if role != user.role {
            if !principal.is_admin() {
                return Err(ApiError::forbidden("Only administrators may change roles"));
            }
            if user.role == Role::Admin && uow.users().count_with_role(Role::Admin).await? <= 1 {
                return Err(ApiError::conflict("At least one administrator must remain"));
            }
            user.role = role;
        }
    }

    if let Some(email) = request.email {
        user.email = email;
    }
    if let Some(password) = request.password {
        user.password_hash = password::hash_password(&password)?;
    }
    if request.clear_team {
        user.team_id = None;
    } else if let Some(team_id) = request.team_id {
        ensure_team_exists(uow, team_id).await?;
        user.team_id = Some(team_id);
    }

    user.updated_at = now;
    uow.users().update(&user).await?;

    Ok(user)
}

/// Create the configured bootstrap administrator if it does not exist yet.
pub async fn ensure_seed_admin(db: &Database, seed: &SeedAdmin) -> Result<(), ApiError> {
    let mut uow = db.begin().await?;

    if let Some(existing) = uow.users().find_by_username(&seed.username).await? {
        tracing::debug!(user_id = %existing.id, "Seed administrator already present");
        return Ok(());
    }

    let request = CreateUserRequest {
        username: Some(seed.username.clone()),
        email: Some(format!("{}@localhost", seed.username)),
        password: Some(seed.password.clone()),
        team_id: None,
    };
    let admin = register(&mut uow, request, Role::Admin).await?;
    uow.commit().await?;

    tracing::info!(user_id = %admin.id, username = %admin.username, "Seed administrator created");
    Ok(())
}

async fn ensure_team_exists(uow: &mut UnitOfWork, team_id: Uuid) -> Result<(), ApiError> {
    if uow.teams().exists(team_id).await? {
        Ok(())
    } else {
        Err(ApiError::validation("teamId", "must reference an existing team"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::connect("sqlite::memory:").await.unwrap()
    }

    fn signup(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: Some(username.to_string()),
            email: Some(format!("{username}@example.com")),
            password: Some("password123".to_string()),
            team_id: None,
        }
    }

    fn principal_for(user: &StoredUser) -> Principal {
        Principal {
            subject: user.id.to_string(),
            username: Some(user.username.clone()),
            roles: vec![user.role],
            expires_at: 0,
            issuer: None,
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();

        let user = register(&mut uow, signup("judy"), Role::Member).await.unwrap();
        assert_ne!(user.password_hash, "password123");

        let found = authenticate(&mut uow, "judy", "password123").await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn bad_credentials_share_one_message() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        register(&mut uow, signup("judy"), Role::Member).await.unwrap();

        let wrong_password = authenticate(&mut uow, "judy", "nope").await.unwrap_err();
        let unknown_user = authenticate(&mut uow, "mallory", "nope").await.unwrap_err();

        assert_eq!(wrong_password, ApiError::unauthorized(INVALID_CREDENTIALS));
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn register_rejects_unknown_team() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut request = signup("kim");
        request.team_id = Some(Uuid::new_v4());

        let error = register(&mut uow, request, Role::Member).await.unwrap_err();
        assert_eq!(
            error,
            ApiError::validation("teamId", "must reference an existing team")
        );
    }

    #[tokio::test]
    async fn members_cannot_change_roles() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let member = register(&mut uow, signup("leo"), Role::Member).await.unwrap();

        let request = UpdateUserRequest {
            role: Some(Role::Admin),
            ..Default::default()
        };
        let error = update_user(&mut uow, &principal_for(&member), member.id, request, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn members_cannot_edit_others() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let leo = register(&mut uow, signup("leo"), Role::Member).await.unwrap();
        let mia = register(&mut uow, signup("mia"), Role::Member).await.unwrap();

        let request = UpdateUserRequest {
            email: Some("stolen@example.com".into()),
            ..Default::default()
        };
        let error = update_user(&mut uow, &principal_for(&leo), mia.id, request, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn last_admin_cannot_be_demoted() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let admin = register(&mut uow, signup("root"), Role::Admin).await.unwrap();

        let request = UpdateUserRequest {
            role: Some(Role::Member),
            ..Default::default()
        };
        let error = update_user(&mut uow, &principal_for(&admin), admin.id, request, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn admin_promotes_member_and_changes_password() {
        let db = test_db().await;
        let mut uow = db.begin().await.unwrap();
        let admin = register(&mut uow, signup("root"), Role::Admin).await.unwrap();
        let member = register(&mut uow, signup("nia"), Role::Member).await.unwrap();

        let request = UpdateUserRequest {
            role: Some(Role::Admin),
            password: Some("new-password-1".into()),
            ..Default::default()
        };
        let updated = update_user(&mut uow, &principal_for(&admin), member.id, request, Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert!(authenticate(&mut uow, "nia", "new-password-1").await.is_ok());
    }

    #[tokio::test]
    async fn seed_admin_is_idempotent() {
        let db = test_db().await;
        let seed = SeedAdmin {
            username: "bootstrap".into(),
            password: "bootstrap-password".into(),
        };

        ensure_seed_admin(&db, &seed).await.unwrap();
        ensure_seed_admin(&db, &seed).await.unwrap();

        let mut uow = db.begin().await.unwrap();
        assert_eq!(uow.users().count_with_role(Role::Admin).await.unwrap(), 1);
        let admin = authenticate(&mut uow, "bootstrap", "bootstrap-password")
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
