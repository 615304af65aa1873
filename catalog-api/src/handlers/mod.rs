// mod.rs
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

mod relationships;
mod resources;

pub use self::relationships::{
    add_related, patch_related, read_related, relationship, remove_related,
};
pub use self::resources::{create, delete, read, search, update};

use axum::http::Uri;

use catalog_data::ResourceType;

use crate::error::ApiError;

/// Parse the id segment of a url. Anything that is not an id can not name
/// a row either.
fn parse_id(kind: ResourceType, raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::NotFound(format!("No {} with id {} exists", kind.singular(), raw))
    })
}

pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Nothing lives at {}", uri.path()))
}
