// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Workshop API - Layered CRUD Service
//!
//! Teams, users and user profiles served over HTTP, with JWT bearer
//! authentication and a uniform JSON error envelope.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers, router and OpenAPI document (Axum, utoipa)
//! - `auth` - Token verification and issuance, authentication middleware, extractors
//! - `middleware` - Error boundary rendering every fault as one envelope
//! - `storage` - SQLite persistence with a transactional unit of work (sqlx)
//! - `validation` - Validated JSON extraction (validator)
//! - `accounts` - Registration, login and user update rules

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod mapping;
pub mod middleware;
pub mod models;
pub mod state;
pub mod storage;
pub mod validation;
