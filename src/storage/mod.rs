// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! SQLite persistence through `sqlx`.
//!
//! ## Model
//!
//! - [`Database`] owns the connection pool and runs the embedded migrations
//! - [`UnitOfWork`] wraps one `sqlx::Transaction`; every repository borrowed
//!   from it writes inside that transaction
//! - `commit()` makes the changes visible atomically, dropping the unit of
//!   work rolls them back
//!
//! ## Layout
//!
//! ```text
//! teams          (id, name UNIQUE, description, created_at, updated_at)
//! users          (id, username UNIQUE, email UNIQUE, password_hash, role,
//!                 team_id -> teams ON DELETE SET NULL, ...)
//! user_profiles  (id, user_id UNIQUE -> users ON DELETE CASCADE,
//!                 first_name, last_name, bio, ...)
//! ```

pub mod database;
pub mod error;
pub mod repository;
pub mod unit_of_work;

pub use database::Database;
pub use error::{StorageError, StorageResult};
pub use repository::{
    StoredTeam, StoredUser, StoredUserProfile, TeamRepository, UserProfileRepository,
    UserRepository,
};
pub use unit_of_work::UnitOfWork;
