// episode.rs
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
use crate::models::{Entity, EpisodePatch, NewEpisode, ResourceType, Season};
use crate::schema::episodes;
use crate::utils::iso8601;

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Serialize)]
#[diesel(belongs_to(Season, foreign_key = season_id))]
#[diesel(table_name = episodes)]
#[serde(rename_all = "kebab-case")]
#[derive(Debug, Clone)]
/// Diesel Model of the episodes table.
pub struct Episode {
    #[serde(skip)]
    id: i32,
    #[serde(skip)]
    season_id: Option<i32>,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    media_url: Option<String>,
    player_url: Option<String>,
    permalink_url: Option<String>,
    #[serde(with = "iso8601::option")]
    published_at: Option<NaiveDateTime>,
    status: Option<String>,
    number: Option<i32>,
    #[serde(with = "iso8601")]
    created_at: NaiveDateTime,
    #[serde(with = "iso8601")]
    updated_at: NaiveDateTime,
}

impl Episode {
    /// Get the Episode `id`.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// `Season` table foreign key.
    ///
    /// `None` until the Episode is associated with a Season.
    pub fn season_id(&self) -> Option<i32> {
        self.season_id
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
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Get the `media_url`.
    ///
    /// Represents the url that the media file is located at.
    pub fn media_url(&self) -> Option<&str> {
        self.media_url.as_deref()
    }

    /// Get the `player_url`.
    pub fn player_url(&self) -> Option<&str> {
        self.player_url.as_deref()
    }

    /// Get the `permalink_url`.
    pub fn permalink_url(&self) -> Option<&str> {
        self.permalink_url.as_deref()
    }

    /// Get the `published_at` value.
    ///
    /// Stored in Utc.
    pub fn published_at(&self) -> Option<&NaiveDateTime> {
        self.published_at.as_ref()
    }

    /// Get the publishing `status`, a free form label such as `draft`.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The position of the Episode within its Season.
    pub fn number(&self) -> Option<i32> {
        self.number
    }

    pub fn created_at(&self) -> &NaiveDateTime {
        &self.created_at
    }

    pub fn updated_at(&self) -> &NaiveDateTime {
        &self.updated_at
    }
}

impl Entity for Episode {
    const KIND: ResourceType = ResourceType::Episodes;

    type New = NewEpisode;
    type Patch = EpisodePatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn find(con: &mut SqliteConnection, id: i32) -> Result<Self, DataError> {
        dbqueries::get_episode(con, id)
    }

    fn search(con: &mut SqliteConnection, ids: Option<&[i32]>) -> Result<Vec<Self>, DataError> {
        dbqueries::get_episodes(con, ids)
    }

    fn delete(con: &mut SqliteConnection, id: i32) -> Result<(), DataError> {
        dbqueries::remove_episode(con, id)
    }
}
