// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT authentication for the Workshop API.
//!
//! ## Auth Flow
//!
//! 1. Client calls `POST /api/auth/login` with username and password
//! 2. [`TokenIssuer`] signs an HS256 access token with the configured key
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. The [`middleware::authenticate`] stage runs the [`JwtVerifier`]:
//!    - success attaches a [`Principal`] to the request extensions
//!    - failure records an [`AuthFailure`] and the request still proceeds
//! 5. Handlers enforce access with the [`Auth`], [`AdminOnly`] and
//!    [`OptionalAuth`] extractors
//!
//! ## Security
//!
//! - Signature is checked before any time-based claim
//! - Tokens are expired from their `exp` second onward; clock skew
//!   tolerance is opt-in via `JWT_LEEWAY_SECS`
//! - The signing key is loaded once and shared immutably

pub mod claims;
pub mod error;
pub mod extractor;
pub mod issuer;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod verifier;

pub use claims::{Audience, Principal, TokenClaims};
pub use error::{AuthError, AuthFailure};
pub use extractor::{ensure_owner_or_admin, AdminOnly, Auth, OptionalAuth};
pub use issuer::{IssuedToken, TokenIssuer};
pub use roles::Role;
pub use verifier::JwtVerifier;
