// new_episode.rs
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
use diesel::prelude::*;
use serde::Deserialize;

use crate::dbqueries;
use crate::errors::{DataError, OrNotFound};
use crate::models::{Episode, Insert, ResourceType, Update};
use crate::schema::episodes;
use crate::utils::{self, check_required, check_url, double_option, iso8601, patched, present};

#[derive(Insertable, Deserialize)]
#[diesel(table_name = episodes)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into))]
/// The attributes of an `Episode` that is about to be created.
pub struct NewEpisode {
    #[serde(skip)]
    season_id: Option<i32>,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    media_url: Option<String>,
    player_url: Option<String>,
    permalink_url: Option<String>,
    #[serde(default, deserialize_with = "iso8601::option::deserialize")]
    published_at: Option<NaiveDateTime>,
    status: Option<String>,
    number: Option<i32>,
}

impl NewEpisode {
    pub fn season_id(&self) -> Option<i32> {
        self.season_id
    }

    pub fn set_season_id(&mut self, season_id: Option<i32>) {
        self.season_id = season_id;
    }

    fn validate(&self) -> Result<(), DataError> {
        check_required("title", &self.title)?;
        check_url("image-url", self.image_url.as_deref())?;
        check_url("media-url", self.media_url.as_deref())?;
        check_url("player-url", self.player_url.as_deref())?;
        check_url("permalink-url", self.permalink_url.as_deref())
    }
}

impl Insert<Episode> for NewEpisode {
    type Error = DataError;

    fn insert(&self, con: &mut SqliteConnection) -> Result<Episode, Self::Error> {
        use crate::schema::episodes::dsl::*;
        self.validate()?;
        if let Some(sid) = self.season_id {
            dbqueries::ensure_exists(con, ResourceType::Seasons, sid)?;
        }

        let now = utils::now();
        info!("Inserting episode {}", self.title);
        diesel::insert_into(episodes)
            .values((self, created_at.eq(now), updated_at.eq(now)))
            .returning(Episode::as_returning())
            .get_result(con)
            .map_err(From::from)
    }
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = episodes)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into, strip_option))]
/// A partial update of an `Episode`. Absent fields are left untouched.
pub struct EpisodePatch {
    #[serde(default, deserialize_with = "present")]
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    media_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    player_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    permalink_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "iso8601::patch")]
    published_at: Option<Option<NaiveDateTime>>,
    #[serde(default, deserialize_with = "double_option")]
    status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    number: Option<Option<i32>>,
}

impl EpisodePatch {
    fn validate(&self) -> Result<(), DataError> {
        if let Some(ref title) = self.title {
            check_required("title", title)?;
        }
        let urls = [
            ("image-url", &self.image_url),
            ("media-url", &self.media_url),
            ("player-url", &self.player_url),
            ("permalink-url", &self.permalink_url),
        ];
        for &(field, value) in urls.iter() {
            check_url(field, patched(value))?;
        }
        Ok(())
    }
}

impl Update<Episode> for EpisodePatch {
    type Error = DataError;

    fn update(&self, con: &mut SqliteConnection, eid: i32) -> Result<Episode, Self::Error> {
        use crate::schema::episodes::dsl::*;
        self.validate()?;

        debug!("Updating episode {}", eid);
        diesel::update(episodes.find(eid))
            .set((self, updated_at.eq(utils::now())))
            .returning(Episode::as_returning())
            .get_result(con)
            .or_not_found(ResourceType::Episodes, eid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use crate::database::temp_pool;
    use crate::utils::format_timestamp;

    #[test]
    fn test_insert_without_season() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let json = r#"{
            "title": "Pilot",
            "media-url": "https://example.com/pilot.mp3",
            "published-at": "2018-03-04T20:00:00+01:00",
            "status": "published",
            "number": 1
        }"#;
        let new: NewEpisode = serde_json::from_str(json)?;
        let episode = new.insert(&mut con)?;

        assert_eq!(episode.season_id(), None);
        assert_eq!(episode.media_url(), Some("https://example.com/pilot.mp3"));
        assert_eq!(
            episode.published_at().map(format_timestamp),
            Some("2018-03-04T19:00:00+00:00".to_string())
        );
        assert_eq!(episode.status(), Some("published"));
        Ok(())
    }

    #[test]
    fn test_insert_with_missing_season() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let new = NewEpisodeBuilder::default()
            .title("Pilot")
            .season_id(Some(3))
            .build()?;
        assert!(matches!(
            new.insert(&mut con),
            Err(DataError::NotFound { kind: ResourceType::Seasons, id: 3 })
        ));
        Ok(())
    }

    #[test]
    fn test_patch_rejects_bad_urls() -> Result<()> {
        let patch: EpisodePatch = serde_json::from_str(r#"{"player-url": "nope"}"#)?;
        assert!(matches!(patch.validate(), Err(DataError::Validation(_))));

        let patch: EpisodePatch = serde_json::from_str(r#"{"player-url": null}"#)?;
        assert!(patch.validate().is_ok());
        Ok(())
    }
}
