// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the authenticated principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;

/// Claims carried by access tokens.
///
/// `sub` and `exp` are mandatory; a token without them fails verification
/// as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Username at the time of issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Role names
    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
}

/// `aud` claim: a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(value) => value == audience,
            Self::Many(values) => values.iter().any(|v| v == audience),
        }
    }
}

/// Authenticated identity derived from a verified token.
///
/// Attached to the request extensions by the authentication middleware and
/// dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Token subject (user ID)
    pub subject: String,

    /// Username (if the token carried one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Granted roles, never empty
    pub roles: Vec<Role>,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,

    #[serde(skip)]
    pub issuer: Option<String>,
}

impl Principal {
    /// Create from verified claims.
    ///
    /// Unknown role names are ignored; a token with no recognised role is
    /// treated as a plain member.
    pub fn from_claims(claims: TokenClaims) -> Self {
        let mut roles: Vec<Role> = Vec::new();
        for role in claims.roles.iter().filter_map(|r| Role::parse(r)) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.is_empty() {
            roles.push(Role::Member);
        }

        Self {
            subject: claims.sub,
            username: claims.name,
            roles,
            expires_at: claims.exp,
            issuer: claims.iss,
        }
    }

    /// Subject parsed as a user ID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.subject).ok()
    }

    /// Check if any granted role satisfies the required one.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|r| r.has_privilege(required))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
