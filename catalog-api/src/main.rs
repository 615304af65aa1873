// main.rs
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

use anyhow::Result;
use log::LevelFilter;
use structopt::StructOpt;

use std::env;

use catalog_api::{Config, Opt};

fn init_logger(verbose: u8) {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = match verbose {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            };
            builder.filter_level(level);
        }
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::from_args();
    init_logger(opt.verbose);

    let config = Config::from_opt(opt)?;
    catalog_api::run(config).await
}
