// errors.rs
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

use diesel::r2d2;
use thiserror::Error;

use std::io;

use crate::models::ResourceType;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("SQL Query failed: {0}")]
    DieselResultError(#[from] diesel::result::Error),
    #[error("Database Migration error")]
    DieselMigrationError,
    #[error("R2D2 error: {0}")]
    R2D2Error(#[from] r2d2::Error),
    #[error("R2D2 Pool error: {0}")]
    R2D2PoolError(#[from] r2d2::PoolError),
    #[error("IO Error: {0}")]
    IOError(#[from] io::Error),
    #[error("No {name} with id {id} exists", name = .kind.singular())]
    NotFound { kind: ResourceType, id: i32 },
    #[error("{0}")]
    Validation(String),
}

impl DataError {
    pub(crate) fn not_found(kind: ResourceType, id: i32) -> Self {
        DataError::NotFound { kind, id }
    }

    /// Whether the error was caused by a unique constraint of the store.
    pub fn is_unique_violation(&self) -> bool {
        use diesel::result::{DatabaseErrorKind, Error};

        matches!(
            self,
            DataError::DieselResultError(Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _
            ))
        )
    }
}

/// Turn a diesel `NotFound` into a `DataError::NotFound` for the given row.
pub(crate) trait OrNotFound<T> {
    fn or_not_found(self, kind: ResourceType, id: i32) -> Result<T, DataError>;
}

impl<T> OrNotFound<T> for diesel::QueryResult<T> {
    fn or_not_found(self, kind: ResourceType, id: i32) -> Result<T, DataError> {
        self.map_err(|err| match err {
            diesel::result::Error::NotFound => DataError::not_found(kind, id),
            err => DataError::from(err),
        })
    }
}
