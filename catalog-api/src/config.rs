// config.rs
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

use anyhow::{Context, Result};
use structopt::StructOpt;

use std::net::SocketAddr;
use std::path::PathBuf;

/// Name of the data directory under `$XDG_DATA_HOME`.
const XDG_PREFIX: &str = "podcast-catalog";

#[derive(StructOpt, Debug)]
#[structopt(name = "podcast-catalog", about = "A JSON:API server for a podcast catalog.")]
pub struct Opt {
    /// Path of the sqlite database, created if missing.
    /// Defaults to `$XDG_DATA_HOME/podcast-catalog/catalog.db`.
    #[structopt(long, env = "CATALOG_DATABASE", parse(from_os_str))]
    pub database: Option<PathBuf>,

    /// Address to listen on.
    #[structopt(long, env = "CATALOG_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Maximum number of pooled database connections.
    #[structopt(long, default_value = "8")]
    pub pool_size: u32,

    /// Log more, can be repeated. `RUST_LOG` takes precedence.
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

/// Settings of a running server.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: PathBuf,
    pub listen: SocketAddr,
    pub pool_size: u32,
}

impl Config {
    pub fn from_opt(opt: Opt) -> Result<Config> {
        let database = match opt.database {
            Some(path) => path,
            None => default_database()?,
        };

        Ok(Config {
            database,
            listen: opt.listen,
            pool_size: opt.pool_size.max(1),
        })
    }
}

fn default_database() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX)
        .context("Could not resolve the XDG base directories")?;
    dirs.place_data_file("catalog.db")
        .context("Could not create the data directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let opt = Opt::from_iter(&[
            "podcast-catalog",
            "--database",
            "/tmp/catalog.db",
            "--listen",
            "0.0.0.0:9000",
            "--pool-size",
            "0",
            "-vv",
        ]);
        assert_eq!(opt.verbose, 2);

        let config = Config::from_opt(opt).unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/catalog.db"));
        assert_eq!(config.listen, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.pool_size, 1);
    }
}
