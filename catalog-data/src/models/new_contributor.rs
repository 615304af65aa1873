// new_contributor.rs
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
use crate::models::{Contributor, Insert, ResourceType, Update};
use crate::schema::contributors;
use crate::utils::{self, check_required, check_url, double_option, patched, present};

#[derive(Insertable, Deserialize)]
#[diesel(table_name = contributors)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into))]
/// The attributes of a `Contributor` that is about to be created.
pub struct NewContributor {
    name: String,
    bio: Option<String>,
    image_url: Option<String>,
    url: Option<String>,
    twitter: Option<String>,
    facebook: Option<String>,
}

impl NewContributor {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), DataError> {
        check_required("name", &self.name)?;
        check_url("image-url", self.image_url.as_deref())?;
        check_url("url", self.url.as_deref())
    }
}

impl Insert<Contributor> for NewContributor {
    type Error = DataError;

    fn insert(&self, con: &mut SqliteConnection) -> Result<Contributor, Self::Error> {
        use crate::schema::contributors::dsl::*;
        self.validate()?;

        let now = utils::now();
        info!("Inserting contributor {}", self.name);
        diesel::insert_into(contributors)
            .values((self, created_at.eq(now), updated_at.eq(now)))
            .returning(Contributor::as_returning())
            .get_result(con)
            .map_err(From::from)
    }
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = contributors)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
#[derive(Debug, Clone, Default, Builder, PartialEq)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into, strip_option))]
/// A partial update of a `Contributor`. Absent fields are left untouched.
pub struct ContributorPatch {
    #[serde(default, deserialize_with = "present")]
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    twitter: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    facebook: Option<Option<String>>,
}

impl ContributorPatch {
    fn validate(&self) -> Result<(), DataError> {
        if let Some(ref name) = self.name {
            check_required("name", name)?;
        }
        check_url("image-url", patched(&self.image_url))?;
        check_url("url", patched(&self.url))
    }
}

impl Update<Contributor> for ContributorPatch {
    type Error = DataError;

    fn update(&self, con: &mut SqliteConnection, cid: i32) -> Result<Contributor, Self::Error> {
        use crate::schema::contributors::dsl::*;
        self.validate()?;

        debug!("Updating contributor {}", cid);
        diesel::update(contributors.find(cid))
            .set((self, updated_at.eq(utils::now())))
            .returning(Contributor::as_returning())
            .get_result(con)
            .or_not_found(ResourceType::Contributors, cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use crate::database::temp_pool;
    use crate::factories;

    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_patch_changes_only_sent_attributes() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;
        let before = factories::contributor(&mut con)?;

        thread::sleep(Duration::from_millis(5));
        let patch: ContributorPatch = serde_json::from_str(r#"{"name": "Foo"}"#)?;
        let after = patch.update(&mut con, before.id())?;

        assert_eq!(after.name(), "Foo");
        assert_eq!(after.bio(), before.bio());
        assert_eq!(after.image_url(), before.image_url());
        assert_eq!(after.url(), before.url());
        assert_eq!(after.twitter(), before.twitter());
        assert_eq!(after.facebook(), before.facebook());
        assert_eq!(after.created_at(), before.created_at());
        assert!(after.updated_at() > before.updated_at());
        Ok(())
    }

    #[test]
    fn test_null_name_is_rejected() {
        assert!(serde_json::from_str::<ContributorPatch>(r#"{"name": null}"#).is_err());
    }
}
