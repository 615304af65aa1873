// season.rs
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
use crate::models::{Entity, NewSeason, Podcast, ResourceType, SeasonPatch};
use crate::schema::seasons;
use crate::utils::iso8601;

#[derive(Queryable, Selectable, Identifiable, Associations, PartialEq, Serialize)]
#[diesel(belongs_to(Podcast, foreign_key = podcast_id))]
#[diesel(table_name = seasons)]
#[serde(rename_all = "kebab-case")]
#[derive(Debug, Clone)]
/// Diesel Model of the seasons table.
pub struct Season {
    #[serde(skip)]
    id: i32,
    #[serde(skip)]
    podcast_id: i32,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    number: Option<i32>,
    #[serde(with = "iso8601")]
    created_at: NaiveDateTime,
    #[serde(with = "iso8601")]
    updated_at: NaiveDateTime,
}

impl Season {
    /// Get the Season `id`.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// `Podcast` table foreign key.
    pub fn podcast_id(&self) -> i32 {
        self.podcast_id
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

    /// The position of the Season within its Podcast.
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

impl Entity for Season {
    const KIND: ResourceType = ResourceType::Seasons;

    type New = NewSeason;
    type Patch = SeasonPatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn find(con: &mut SqliteConnection, id: i32) -> Result<Self, DataError> {
        dbqueries::get_season(con, id)
    }

    fn search(con: &mut SqliteConnection, ids: Option<&[i32]>) -> Result<Vec<Self>, DataError> {
        dbqueries::get_seasons(con, ids)
    }

    fn delete(con: &mut SqliteConnection, id: i32) -> Result<(), DataError> {
        dbqueries::remove_season(con, id)
    }
}
