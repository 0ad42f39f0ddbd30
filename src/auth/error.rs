// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use thiserror::Error;

/// Reasons a bearer credential was rejected by the verifier.
///
/// These never stop a request on their own. The authentication middleware
/// records them as an [`AuthFailure`] and the authorization extractors turn
/// them into an error response when a route actually needs a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Token is not a well-formed signed token or lacks a required claim
    #[error("Token is malformed")]
    Malformed,
    /// Token signature does not match the signing key
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    Expired,
    /// Token is not yet valid
    #[error("Token is not yet valid")]
    NotYetValid,
    /// Token issuer is invalid
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// Token audience is invalid
    #[error("Token audience is invalid")]
    InvalidAudience,
}

impl AuthError {
    /// Machine-readable kind written to the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Malformed => "Malformed",
            AuthError::InvalidSignature => "InvalidSignature",
            AuthError::Expired => "Expired",
            AuthError::NotYetValid => "NotYetValid",
            AuthError::InvalidIssuer => "InvalidIssuer",
            AuthError::InvalidAudience => "InvalidAudience",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            _ => AuthError::Malformed,
        }
    }
}

/// Request extension recording why a presented credential was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthFailure(pub AuthError);

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::{Error, ErrorKind};

    #[test]
    fn kinds_match_variant_names() {
        assert_eq!(AuthError::Malformed.kind(), "Malformed");
        assert_eq!(AuthError::InvalidSignature.kind(), "InvalidSignature");
        assert_eq!(AuthError::Expired.kind(), "Expired");
    }

    #[test]
    fn jsonwebtoken_errors_are_classified() {
        let signature: AuthError = Error::from(ErrorKind::InvalidSignature).into();
        assert_eq!(signature, AuthError::InvalidSignature);

        let expired: AuthError = Error::from(ErrorKind::ExpiredSignature).into();
        assert_eq!(expired, AuthError::Expired);

        let token: AuthError = Error::from(ErrorKind::InvalidToken).into();
        assert_eq!(token, AuthError::Malformed);

        let claim: AuthError = Error::from(ErrorKind::MissingRequiredClaim("exp".into())).into();
        assert_eq!(claim, AuthError::Malformed);
    }
}
