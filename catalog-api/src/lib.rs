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
    overflowing_literals,
    unconditional_recursion,
    while_true,
    trivial_casts,
    trivial_numeric_casts
)]

//! A JSON:API server over the catalog database.
//!
//! Every resource type gets the same set of routes, see `router::app`.

#[macro_use]
extern crate log;

pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod relationships;
pub mod resources;
pub mod router;
pub mod state;

pub use crate::config::{Config, Opt};
pub use crate::error::ApiError;
pub use crate::router::app;
pub use crate::state::AppState;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

/// Open the database and serve the api until interrupted.
pub async fn run(config: Config) -> Result<()> {
    let pool = catalog_data::init_pool(&config.database, config.pool_size)
        .with_context(|| format!("Could not open {}", config.database.display()))?;

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Could not listen on {}", config.listen))?;
    info!("Listening on {}", config.listen);

    axum::serve(listener, app(AppState::new(pool)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", err);
    }
}
