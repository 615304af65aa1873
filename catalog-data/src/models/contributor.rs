// contributor.rs
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

use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use serde::Serialize;

use crate::dbqueries;
use crate::errors::DataError;
use crate::models::{ContributorPatch, Entity, NewContributor, ResourceType};
use crate::schema::contributors;
use crate::utils::iso8601;

#[derive(Queryable, Selectable, Identifiable, PartialEq, Serialize)]
#[diesel(table_name = contributors)]
#[serde(rename_all = "kebab-case")]
#[derive(Debug, Clone)]
/// Diesel Model of the contributors table.
///
/// A person that hosts, produces or guests on podcasts, seasons or episodes.
pub struct Contributor {
    #[serde(skip)]
    id: i32,
    name: String,
    bio: Option<String>,
    image_url: Option<String>,
    url: Option<String>,
    twitter: Option<String>,
    facebook: Option<String>,
    #[serde(with = "iso8601")]
    created_at: NaiveDateTime,
    #[serde(with = "iso8601")]
    updated_at: NaiveDateTime,
}

impl Contributor {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Homepage of the Contributor.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Twitter handle.
    pub fn twitter(&self) -> Option<&str> {
        self.twitter.as_deref()
    }

    /// Facebook handle.
    pub fn facebook(&self) -> Option<&str> {
        self.facebook.as_deref()
    }

    pub fn created_at(&self) -> &NaiveDateTime {
        &self.created_at
    }

    pub fn updated_at(&self) -> &NaiveDateTime {
        &self.updated_at
    }
}

impl Entity for Contributor {
    const KIND: ResourceType = ResourceType::Contributors;

    type New = NewContributor;
    type Patch = ContributorPatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn find(con: &mut SqliteConnection, id: i32) -> Result<Self, DataError> {
        dbqueries::get_contributor(con, id)
    }

    fn search(con: &mut SqliteConnection, ids: Option<&[i32]>) -> Result<Vec<Self>, DataError> {
        dbqueries::get_contributors(con, ids)
    }

    fn delete(con: &mut SqliteConnection, id: i32) -> Result<(), DataError> {
        dbqueries::remove_contributor(con, id)
    }
}
