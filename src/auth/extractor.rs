// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors enforcing authentication per route.
//!
//! The authentication middleware only attaches identity. Routes that need a
//! principal take one of these extractors:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is Principal
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::{AuthFailure, Principal, Role};
use crate::error::ApiError;

/// Extractor for authenticated principals.
///
/// Rejects with the recorded verification failure (400 for `Malformed`, 401
/// for `Expired`, `InvalidSignature`, ...) or 401 `Unauthorized` when no
/// credential was presented.
pub struct Auth(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(Auth(principal));
        }

        match parts.extensions.get::<AuthFailure>() {
            Some(AuthFailure(reason)) => Err(ApiError::Auth(*reason)),
            None => Err(ApiError::unauthorized("Authentication is required")),
        }
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for AdminOnly {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;

        if !principal.has_role(Role::Admin) {
            return Err(ApiError::forbidden("Administrator role is required"));
        }

        Ok(AdminOnly(principal))
    }
}

/// Optional authentication extractor.
///
/// Yields `None` instead of rejecting when no valid principal is attached.
pub struct OptionalAuth(pub Option<Principal>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Principal>().cloned()))
    }
}

/// Allow the resource owner or an admin, reject everyone else with 403.
pub fn ensure_owner_or_admin(principal: &Principal, owner_id: Uuid) -> Result<(), ApiError> {
    if principal.is_admin() || principal.user_id() == Some(owner_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("You may only modify your own resources"))
    }
}
