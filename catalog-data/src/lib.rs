// lib.rs
//
// Copyright 2017 Jordan Petridis <jpetridis@gnome.org>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

#![warn(nonstandard_style, unused)]
#![warn(
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    unconditional_recursion,
    while_true,
    trivial_casts,
    trivial_numeric_casts
)]

//! The storage layer of the podcast catalog.
//!
//! Podcasts, seasons, episodes and contributors live in a sqlite database
//! accessed through diesel. Contributors are linked to the other three kinds
//! through a single polymorphic `contributables` table, see `linkage`.

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;

pub mod database;
#[allow(missing_docs)]
pub mod dbqueries;
#[allow(missing_docs)]
pub mod errors;
#[cfg(any(test, feature = "test-utils"))]
pub mod factories;
pub mod linkage;
pub mod models;
mod schema;
pub mod utils;

pub use crate::database::{init_pool, Pool, PooledConnection};
pub use crate::errors::DataError;
pub use crate::linkage::Owners;
pub use crate::models::{
    Contributor, Entity, Episode, Insert, Owner, OwnerKind, Podcast, ResourceType, Season, Update,
};
