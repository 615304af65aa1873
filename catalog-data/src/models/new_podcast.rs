// new_podcast.rs
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

use crate::errors::{DataError, OrNotFound};
use crate::models::{Insert, Podcast, ResourceType, Update};
use crate::schema::podcasts;
use crate::utils::{self, check_required, check_url, double_option, patched, present};

#[derive(Insertable, Deserialize)]
#[diesel(table_name = podcasts)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into))]
/// The attributes of a `Podcast` that is about to be created.
pub struct NewPodcast {
    title: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl NewPodcast {
    pub fn title(&self) -> &str {
        &self.title
    }

    fn validate(&self) -> Result<(), DataError> {
        check_required("title", &self.title)?;
        check_url("image-url", self.image_url.as_deref())
    }
}

impl Insert<Podcast> for NewPodcast {
    type Error = DataError;

    fn insert(&self, con: &mut SqliteConnection) -> Result<Podcast, Self::Error> {
        use crate::schema::podcasts::dsl::*;
        self.validate()?;

        let now = utils::now();
        info!("Inserting podcast {}", self.title);
        diesel::insert_into(podcasts)
            .values((self, created_at.eq(now), updated_at.eq(now)))
            .returning(Podcast::as_returning())
            .get_result(con)
            .map_err(From::from)
    }
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = podcasts)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into, strip_option))]
/// A partial update of a `Podcast`. Absent fields are left untouched.
pub struct PodcastPatch {
    #[serde(default, deserialize_with = "present")]
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    image_url: Option<Option<String>>,
}

impl PodcastPatch {
    fn validate(&self) -> Result<(), DataError> {
        if let Some(ref title) = self.title {
            check_required("title", title)?;
        }
        check_url("image-url", patched(&self.image_url))
    }
}

impl Update<Podcast> for PodcastPatch {
    type Error = DataError;

    fn update(&self, con: &mut SqliteConnection, pid: i32) -> Result<Podcast, Self::Error> {
        use crate::schema::podcasts::dsl::*;
        self.validate()?;

        debug!("Updating podcast {}", pid);
        diesel::update(podcasts.find(pid))
            .set((self, updated_at.eq(utils::now())))
            .returning(Podcast::as_returning())
            .get_result(con)
            .or_not_found(ResourceType::Podcasts, pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use crate::database::temp_pool;

    #[test]
    fn test_new_podcast_from_attributes() -> Result<()> {
        let json = r#"{
            "title": "Intercepted",
            "description": "Weekly",
            "image-url": "https://example.com/cover.png"
        }"#;
        let new: NewPodcast = serde_json::from_str(json)?;
        let expected = NewPodcastBuilder::default()
            .title("Intercepted")
            .description(Some("Weekly".to_string()))
            .image_url(Some("https://example.com/cover.png".to_string()))
            .build()?;
        assert_eq!(new, expected);

        // Unknown and internal attribute names are rejected
        let internal = r#"{"title": "a", "image_url": null}"#;
        assert!(serde_json::from_str::<NewPodcast>(internal).is_err());
        // title is required
        assert!(serde_json::from_str::<NewPodcast>(r#"{"description": "a"}"#).is_err());
        Ok(())
    }

    #[test]
    fn test_insert_and_patch() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let new = NewPodcastBuilder::default()
            .title("Intercepted")
            .description(Some("Weekly".to_string()))
            .build()?;
        let podcast = new.insert(&mut con)?;
        assert_eq!(podcast.title(), "Intercepted");
        assert_eq!(podcast.description(), Some("Weekly"));
        assert_eq!(podcast.image_url(), None);
        assert_eq!(podcast.created_at(), podcast.updated_at());

        let patch: PodcastPatch =
            serde_json::from_str(r#"{"image-url": "https://example.com/a.png"}"#)?;
        let patched = patch.update(&mut con, podcast.id())?;
        assert_eq!(patched.title(), "Intercepted");
        assert_eq!(patched.description(), Some("Weekly"));
        assert_eq!(patched.image_url(), Some("https://example.com/a.png"));
        assert_eq!(patched.created_at(), podcast.created_at());
        assert!(patched.updated_at() >= podcast.updated_at());

        let clear: PodcastPatch = serde_json::from_str(r#"{"description": null}"#)?;
        let cleared = clear.update(&mut con, podcast.id())?;
        assert_eq!(cleared.description(), None);
        assert_eq!(cleared.image_url(), Some("https://example.com/a.png"));
        Ok(())
    }

    #[test]
    fn test_validation() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let blank = NewPodcastBuilder::default().title("  ").build()?;
        assert!(matches!(blank.insert(&mut con), Err(DataError::Validation(_))));

        let bad_url = NewPodcastBuilder::default()
            .title("Foo")
            .image_url(Some("cover.png".to_string()))
            .build()?;
        assert!(matches!(bad_url.insert(&mut con), Err(DataError::Validation(_))));

        let patch = PodcastPatchBuilder::default().title("Foo").build()?;
        assert!(matches!(
            patch.update(&mut con, 42),
            Err(DataError::NotFound { kind: ResourceType::Podcasts, id: 42 })
        ));
        Ok(())
    }
}
