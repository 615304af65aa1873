// podcast.rs
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
use crate::models::{Entity, NewPodcast, PodcastPatch, ResourceType};
use crate::schema::podcasts;
use crate::utils::iso8601;

#[derive(Queryable, Selectable, Identifiable, PartialEq, Serialize)]
#[diesel(table_name = podcasts)]
#[serde(rename_all = "kebab-case")]
#[derive(Debug, Clone)]
/// Diesel Model of the podcasts table.
///
/// Serializes into the attribute object of a `podcasts` resource.
pub struct Podcast {
    #[serde(skip)]
    id: i32,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    #[serde(with = "iso8601")]
    created_at: NaiveDateTime,
    #[serde(with = "iso8601")]
    updated_at: NaiveDateTime,
}

impl Podcast {
    /// Get the Podcast `id`.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Get the `title`.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the `description`.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the `image_url`.
    ///
    /// Represents the url that the cover image of the Podcast is located at.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// When the row was created.
    pub fn created_at(&self) -> &NaiveDateTime {
        &self.created_at
    }

    /// When the row was last written to.
    pub fn updated_at(&self) -> &NaiveDateTime {
        &self.updated_at
    }
}

impl Entity for Podcast {
    const KIND: ResourceType = ResourceType::Podcasts;

    type New = NewPodcast;
    type Patch = PodcastPatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn find(con: &mut SqliteConnection, id: i32) -> Result<Self, DataError> {
        dbqueries::get_podcast(con, id)
    }

    fn search(con: &mut SqliteConnection, ids: Option<&[i32]>) -> Result<Vec<Self>, DataError> {
        dbqueries::get_podcasts(con, ids)
    }

    fn delete(con: &mut SqliteConnection, id: i32) -> Result<(), DataError> {
        dbqueries::remove_podcast(con, id)
    }
}
