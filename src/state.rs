// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{JwtVerifier, TokenIssuer},
    config::JwtSettings,
    storage::Database,
};

/// Shared application state handed to every handler.
///
/// The verifier and issuer are built once from the same immutable key
/// material and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub verifier: Arc<JwtVerifier>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(db: Database, jwt: &JwtSettings) -> Self {
        Self {
            db,
            verifier: Arc::new(JwtVerifier::new(jwt)),
            issuer: Arc::new(TokenIssuer::new(jwt)),
        }
    }
}
