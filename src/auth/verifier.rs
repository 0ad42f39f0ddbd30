// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! [`JwtVerifier::verify`] is a pure function of the token, the supplied
//! clock reading and the signing key. jsonwebtoken checks the structure, the
//! algorithm and the signature; the time-based claims are checked here against
//! the explicit `now` so callers and tests control the clock.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::{AuthError, Principal, TokenClaims};
use crate::config::JwtSettings;

/// Verifies HS256 bearer tokens against the process-wide signing key.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    leeway: i64,
}

impl JwtVerifier {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(ref issuer) = settings.issuer {
            validation.set_issuer(&[issuer]);
        }

        if let Some(ref audience) = settings.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        Self {
            key: DecodingKey::from_secret(&settings.secret),
            validation,
            leeway: i64::try_from(settings.leeway_secs).unwrap_or(i64::MAX),
        }
    }

    /// Verify a raw bearer token and build the principal it names.
    ///
    /// Check order: structure, signature, required claims, expiry, not-before.
    /// A tampered token is therefore reported as `InvalidSignature` even when
    /// it is also expired.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthError> {
        if !has_signed_token_shape(token) {
            return Err(AuthError::Malformed);
        }

        let data = decode::<TokenClaims>(token, &self.key, &self.validation)?;
        let claims = data.claims;
        let now = now.timestamp();

        if now >= claims.exp.saturating_add(self.leeway) {
            return Err(AuthError::Expired);
        }

        if let Some(nbf) = claims.nbf {
            if nbf > now.saturating_add(self.leeway) {
                return Err(AuthError::NotYetValid);
            }
        }

        Ok(Principal::from_claims(claims))
    }
}

/// `header.payload.signature` with three non-empty segments.
fn has_signed_token_shape(token: &str) -> bool {
    let mut segments = token.split('.');
    let shape_ok = (0..3).all(|_| segments.next().is_some_and(|s| !s.is_empty()));
    shape_ok && segments.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use crate::auth::Role;

    const SECRET: &str = "verifier-test-secret-0123456789abcdef";

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(&JwtSettings::new(SECRET))
    }

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_expiring_at(exp: DateTime<Utc>) -> serde_json::Value {
        json!({
            "sub": "user_123",
            "exp": exp.timestamp(),
            "name": "ada",
            "roles": ["member"],
        })
    }

    #[test]
    fn valid_token_yields_principal() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now + Duration::hours(1)), SECRET);

        let principal = verifier().verify(&token, now).unwrap();
        assert_eq!(principal.subject, "user_123");
        assert_eq!(principal.username.as_deref(), Some("ada"));
        assert_eq!(principal.roles, vec![Role::Member]);
    }

    #[test]
    fn verification_is_idempotent() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now + Duration::hours(1)), SECRET);
        let verifier = verifier();

        let first = verifier.verify(&token, now).unwrap();
        let second = verifier.verify(&token, now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now - Duration::hours(1)), SECRET);

        assert_eq!(verifier().verify(&token, now), Err(AuthError::Expired));
    }

    #[test]
    fn default_settings_reject_token_expired_a_second_ago() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now - Duration::seconds(1)), SECRET);

        assert_eq!(verifier().verify(&token, now), Err(AuthError::Expired));
    }

    #[test]
    fn default_settings_reject_token_expiring_now() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now), SECRET);

        assert_eq!(verifier().verify(&token, now), Err(AuthError::Expired));
    }

    fn verifier_with_leeway(secs: u64) -> JwtVerifier {
        let mut settings = JwtSettings::new(SECRET);
        settings.leeway_secs = secs;
        JwtVerifier::new(&settings)
    }

    #[test]
    fn expiry_within_configured_leeway_is_accepted() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now - Duration::seconds(30)), SECRET);

        assert!(verifier_with_leeway(60).verify(&token, now).is_ok());
    }

    #[test]
    fn expiry_at_configured_leeway_boundary_is_rejected() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now - Duration::seconds(60)), SECRET);

        assert_eq!(
            verifier_with_leeway(60).verify(&token, now),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn wrong_key_is_invalid_signature() {
        let now = Utc::now();
        let token = sign(
            &claims_expiring_at(now + Duration::hours(1)),
            "another-secret-entirely-0123456789abcdef",
        );

        assert_eq!(verifier().verify(&token, now), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now + Duration::hours(1)), SECRET);
        let parts: Vec<&str> = token.split('.').collect();

        let forged = json!({
            "sub": "admin_1",
            "exp": (now + Duration::hours(1)).timestamp(),
            "roles": ["admin"],
        });
        let forged_payload = URL_SAFE_NO_PAD.encode(forged.to_string());
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            verifier().verify(&tampered, now),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_expired_token_reports_signature_first() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now - Duration::hours(1)), "wrong-key-wrong-key-wrong-key-0000");

        assert_eq!(verifier().verify(&token, now), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn missing_expiry_is_malformed() {
        let now = Utc::now();
        let token = sign(&json!({ "sub": "user_123" }), SECRET);

        assert_eq!(verifier().verify(&token, now), Err(AuthError::Malformed));
    }

    #[test]
    fn missing_subject_is_malformed() {
        let now = Utc::now();
        let token = sign(&json!({ "exp": (now + Duration::hours(1)).timestamp() }), SECRET);

        assert_eq!(verifier().verify(&token, now), Err(AuthError::Malformed));
    }

    #[test]
    fn missing_signature_is_malformed() {
        let now = Utc::now();
        let token = sign(&claims_expiring_at(now + Duration::hours(1)), SECRET);
        let unsigned = token.rsplit_once('.').map(|(head, _)| format!("{head}.")).unwrap();

        assert_eq!(verifier().verify(&unsigned, now), Err(AuthError::Malformed));
    }

    #[test]
    fn garbage_is_malformed() {
        let now = Utc::now();
        let verifier = verifier();

        assert_eq!(verifier.verify("", now), Err(AuthError::Malformed));
        assert_eq!(verifier.verify("not-a-token", now), Err(AuthError::Malformed));
        assert_eq!(verifier.verify("a.b.c.d", now), Err(AuthError::Malformed));
        assert_eq!(verifier.verify("header.payload.sig", now), Err(AuthError::Malformed));
    }

    #[test]
    fn future_not_before_is_rejected() {
        let now = Utc::now();
        let token = sign(
            &json!({
                "sub": "user_123",
                "exp": (now + Duration::hours(2)).timestamp(),
                "nbf": (now + Duration::hours(1)).timestamp(),
            }),
            SECRET,
        );

        assert_eq!(verifier().verify(&token, now), Err(AuthError::NotYetValid));
    }

    #[test]
    fn issuer_mismatch_is_rejected() {
        let now = Utc::now();
        let verifier = JwtVerifier::new(&JwtSettings::new(SECRET).with_issuer("workshop"));
        let token = sign(
            &json!({
                "sub": "user_123",
                "exp": (now + Duration::hours(1)).timestamp(),
                "iss": "someone-else",
            }),
            SECRET,
        );

        assert_eq!(verifier.verify(&token, now), Err(AuthError::InvalidIssuer));
    }

    #[test]
    fn audience_mismatch_is_rejected() {
        let now = Utc::now();
        let verifier = JwtVerifier::new(&JwtSettings::new(SECRET).with_audience("workshop-api"));
        let token = sign(
            &json!({
                "sub": "user_123",
                "exp": (now + Duration::hours(1)).timestamp(),
                "aud": "other-api",
            }),
            SECRET,
        );

        assert_eq!(verifier.verify(&token, now), Err(AuthError::InvalidAudience));
    }

    #[test]
    fn audience_array_is_accepted() {
        let now = Utc::now();
        let token = sign(
            &json!({
                "sub": "user_123",
                "exp": (now + Duration::hours(1)).timestamp(),
                "aud": ["billing", "workshop-api"],
            }),
            SECRET,
        );

        assert!(verifier().verify(&token, now).is_ok());

        let scoped = JwtVerifier::new(&JwtSettings::new(SECRET).with_audience("workshop-api"));
        assert!(scoped.verify(&token, now).is_ok());

        let other = JwtVerifier::new(&JwtSettings::new(SECRET).with_audience("reports"));
        assert_eq!(other.verify(&token, now), Err(AuthError::InvalidAudience));
    }

    #[test]
    fn token_shape_check() {
        assert!(has_signed_token_shape("a.b.c"));
        assert!(!has_signed_token_shape("a.b."));
        assert!(!has_signed_token_shape("a..c"));
        assert!(!has_signed_token_shape("a.b"));
        assert!(!has_signed_token_shape("a.b.c.d"));
    }
}
