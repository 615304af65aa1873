// database.rs
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

//! Database Setup.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2;
use diesel::r2d2::ConnectionManager;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use std::path::Path;
use std::time::Duration;

use crate::errors::DataError;

/// An r2d2 pool of `SqliteConnection`s.
pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// A connection checked out of the `Pool`.
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

// Writers wait on each other for this long before sqlite reports SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per connection pragmas.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        let pragmas = format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        );
        conn.batch_execute(&pragmas)
            .map_err(r2d2::Error::QueryError)
    }
}

/// Open a pool for the database at `db_path`, creating the file and
/// running any pending migrations.
pub fn init_pool<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<Pool, DataError> {
    let db_path = db_path.as_ref();
    let manager = ConnectionManager::<SqliteConnection>::new(db_path.to_string_lossy());
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(manager)?;

    {
        let mut db = pool.get()?;
        run_migration_on(&mut db)?;
    }
    info!("Database pool initialized at {}.", db_path.display());
    Ok(pool)
}

fn run_migration_on(conn: &mut SqliteConnection) -> Result<(), DataError> {
    info!("Running DB Migrations...");
    conn.run_pending_migrations(MIGRATIONS)
        .map(|versions| debug!("Applied {} migrations.", versions.len()))
        .map_err(|err| {
            error!("Migration failed: {}", err);
            DataError::DieselMigrationError
        })
}

/// Create a fresh database in a temporary file.
///
/// The file is removed once the returned `NamedTempFile` is dropped, so
/// keep it alive for as long as the pool is in use. Every test gets its own
/// database this way and tests can run in parallel.
#[cfg(any(test, feature = "test-utils"))]
pub fn temp_pool() -> Result<(tempfile::NamedTempFile, Pool), DataError> {
    let db = tempfile::Builder::new()
        .prefix("catalog-")
        .suffix(".db")
        .tempfile()?;
    let pool = init_pool(db.path(), 4)?;
    Ok((db, pool))
}
