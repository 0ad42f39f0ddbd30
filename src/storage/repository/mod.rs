// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the SQLite tables.
//!
//! Each repository borrows the connection of a [`UnitOfWork`](super::UnitOfWork)
//! and provides CRUD operations for one entity type.

pub mod profiles;
pub mod teams;
pub mod users;

pub use profiles::{StoredUserProfile, UserProfileRepository};
pub use teams::{StoredTeam, TeamRepository};
pub use users::{StoredUser, UserRepository};
