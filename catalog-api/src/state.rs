// state.rs
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

use diesel::{Connection, SqliteConnection};
use tokio::task;

use catalog_data::{DataError, Pool};

use crate::error::ApiError;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pool: Pool,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        AppState { pool }
    }

    /// Run `f` on a pooled connection, inside a read transaction.
    pub async fn read<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError> + Send + 'static,
    {
        self.run(move |con| con.transaction(f)).await
    }

    /// Run `f` on a pooled connection, inside a `BEGIN IMMEDIATE`
    /// transaction. Writers queue up on the database lock, so `f` never
    /// races another write.
    pub async fn write<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError> + Send + 'static,
    {
        self.run(move |con| con.immediate_transaction(f)).await
    }

    // Diesel is blocking, keep it off the async workers.
    async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut con = pool.get().map_err(DataError::from)?;
            f(&mut *con)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("Database task failed: {}", err)))?
    }
}
