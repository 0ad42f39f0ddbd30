// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Permissive by construction: it attaches a [`Principal`] when a valid
//! bearer token is presented and otherwise forwards the request untouched
//! apart from an [`AuthFailure`] marker. Routes decide whether identity is
//! required through the extractors in `extractor.rs`.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(verifier, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use super::{AuthError, AuthFailure, JwtVerifier};

/// Outcome of reading the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credential<'a> {
    Absent,
    Bearer(&'a str),
    Unusable,
}

fn read_credential(headers: &HeaderMap) -> Credential<'_> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Credential::Absent;
    };

    let Ok(value) = value.to_str() else {
        return Credential::Unusable;
    };

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            Credential::Bearer(token.trim())
        }
        _ => Credential::Unusable,
    }
}

/// Authentication middleware function.
///
/// Never produces a response of its own; the request always reaches the
/// next stage.
pub async fn authenticate(
    State(verifier): State<Arc<JwtVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match read_credential(request.headers()) {
        Credential::Absent => None,
        Credential::Unusable => Some(Err(AuthError::Malformed)),
        Credential::Bearer(token) => Some(verifier.verify(token, Utc::now())),
    };

    match outcome {
        None => {}
        Some(Ok(principal)) => {
            tracing::debug!(subject = %principal.subject, "Bearer token accepted");
            request.extensions_mut().insert(principal);
        }
        Some(Err(reason)) => {
            tracing::debug!(reason = reason.kind(), "Bearer token rejected");
            request.extensions_mut().insert(AuthFailure(reason));
        }
    }

    next.run(request).await
}
