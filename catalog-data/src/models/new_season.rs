// new_season.rs
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

use diesel::prelude::*;
use serde::Deserialize;

use crate::dbqueries;
use crate::errors::{DataError, OrNotFound};
use crate::models::{Insert, ResourceType, Season, Update};
use crate::schema::seasons;
use crate::utils::{self, check_required, check_url, double_option, patched, present};

#[derive(Insertable, Deserialize)]
#[diesel(table_name = seasons)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into))]
/// The attributes of a `Season` that is about to be created.
///
/// The owning podcast is not an attribute, it is set through
/// `set_podcast_id` from the `podcast` relationship.
pub struct NewSeason {
    #[serde(skip)]
    podcast_id: i32,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    number: Option<i32>,
}

impl NewSeason {
    pub fn podcast_id(&self) -> i32 {
        self.podcast_id
    }

    pub fn set_podcast_id(&mut self, podcast_id: i32) {
        self.podcast_id = podcast_id;
    }

    fn validate(&self) -> Result<(), DataError> {
        check_required("title", &self.title)?;
        check_url("image-url", self.image_url.as_deref())
    }
}

impl Insert<Season> for NewSeason {
    type Error = DataError;

    fn insert(&self, con: &mut SqliteConnection) -> Result<Season, Self::Error> {
        use crate::schema::seasons::dsl::*;
        self.validate()?;
        dbqueries::ensure_exists(con, ResourceType::Podcasts, self.podcast_id)?;

        let now = utils::now();
        info!("Inserting season {} of podcast {}", self.title, self.podcast_id);
        diesel::insert_into(seasons)
            .values((self, created_at.eq(now), updated_at.eq(now)))
            .returning(Season::as_returning())
            .get_result(con)
            .map_err(From::from)
    }
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = seasons)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into, strip_option))]
/// A partial update of a `Season`. Absent fields are left untouched.
pub struct SeasonPatch {
    #[serde(default, deserialize_with = "present")]
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    number: Option<Option<i32>>,
}

impl SeasonPatch {
    fn validate(&self) -> Result<(), DataError> {
        if let Some(ref title) = self.title {
            check_required("title", title)?;
        }
        check_url("image-url", patched(&self.image_url))
    }
}

impl Update<Season> for SeasonPatch {
    type Error = DataError;

    fn update(&self, con: &mut SqliteConnection, sid: i32) -> Result<Season, Self::Error> {
        use crate::schema::seasons::dsl::*;
        self.validate()?;

        debug!("Updating season {}", sid);
        diesel::update(seasons.find(sid))
            .set((self, updated_at.eq(utils::now())))
            .returning(Season::as_returning())
            .get_result(con)
            .or_not_found(ResourceType::Seasons, sid)
    }
}
