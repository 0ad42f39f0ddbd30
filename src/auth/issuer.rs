// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance for the login endpoint.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use super::{Audience, Role, TokenClaims};
use crate::config::JwtSettings;
use crate::error::ApiError;

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs HS256 access tokens with the process-wide signing key.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: Option<String>,
    audience: Option<String>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            key: EncodingKey::from_secret(&settings.secret),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: Duration::seconds(i64::try_from(settings.ttl_secs).unwrap_or(i64::MAX / 1000)),
        }
    }

    /// Sign a token for the given user, valid from `now` for the configured TTL.
    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, ApiError> {
        let expires_at = now + self.ttl;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
            nbf: Some(now.timestamp()),
            name: Some(username.to_string()),
            roles: vec![role.as_str().to_string()],
            iss: self.issuer.clone(),
            aud: self.audience.clone().map(Audience::One),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| ApiError::internal(format!("Token signing failed: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, JwtVerifier};

    const SECRET: &str = "issuer-test-secret-0123456789abcdefgh";

    #[test]
    fn issued_token_verifies() {
        let settings = JwtSettings::new(SECRET)
            .with_issuer("workshop")
            .with_audience("workshop-api");
        let issuer = TokenIssuer::new(&settings);
        let verifier = JwtVerifier::new(&settings);
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let issued = issuer.issue(user_id, "ada", Role::Admin, now).unwrap();
        assert_eq!(issued.expires_at.timestamp(), now.timestamp() + 3600);

        let principal = verifier.verify(&issued.token, now).unwrap();
        assert_eq!(principal.user_id(), Some(user_id));
        assert_eq!(principal.username.as_deref(), Some("ada"));
        assert!(principal.is_admin());
        assert_eq!(principal.issuer.as_deref(), Some("workshop"));
    }

    #[test]
    fn issued_token_expires_after_ttl() {
        let mut settings = JwtSettings::new(SECRET);
        settings.ttl_secs = 60;
        settings.leeway_secs = 0;
        let issuer = TokenIssuer::new(&settings);
        let verifier = JwtVerifier::new(&settings);
        let now = Utc::now();

        let issued = issuer.issue(Uuid::new_v4(), "ada", Role::Member, now).unwrap();
        let later = now + Duration::seconds(61);
        assert_eq!(verifier.verify(&issued.token, later), Err(AuthError::Expired));
    }
}
