// resources.rs
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

//! Rendering rows as resource objects, and creating or updating rows from
//! request documents.

use diesel::SqliteConnection;

use std::collections::BTreeMap;

use catalog_data::models::{NewEpisode, NewSeason};
use catalog_data::{Contributor, Entity, Episode, Insert, Podcast, ResourceType, Season, Update};

use crate::document::{
    check_type, NewResourceObject, PatchResourceObject, RelationshipObject, ResourceIdentifier,
    ResourceObject,
};
use crate::error::ApiError;
use crate::relationships::{Mutation, Relationship};

/// An `Entity` exposed over the api.
pub trait Resource: Entity {
    /// The id a to-one relationship of the row points to.
    fn to_one(&self, _rel: Relationship) -> Option<i32> {
        None
    }

    /// Set a to-one relationship on a row that is about to be created.
    fn attach(
        _new: &mut Self::New,
        rel: Relationship,
        _target: Option<i32>,
    ) -> Result<(), ApiError> {
        Err(ApiError::ValidationFailed(format!(
            "{} have no `{}` relationship",
            Self::KIND,
            rel.name()
        )))
    }
}

impl Resource for Podcast {}

impl Resource for Contributor {}

impl Resource for Season {
    fn to_one(&self, rel: Relationship) -> Option<i32> {
        match rel {
            Relationship::Podcast => Some(self.podcast_id()),
            _ => None,
        }
    }

    fn attach(new: &mut NewSeason, rel: Relationship, target: Option<i32>) -> Result<(), ApiError> {
        match (rel, target) {
            (Relationship::Podcast, Some(pid)) => {
                new.set_podcast_id(pid);
                Ok(())
            }
            _ => Err(ApiError::ValidationFailed(
                "A season must belong to a podcast".to_string(),
            )),
        }
    }
}

impl Resource for Episode {
    fn to_one(&self, rel: Relationship) -> Option<i32> {
        match rel {
            Relationship::Season => self.season_id(),
            _ => None,
        }
    }

    fn attach(
        new: &mut NewEpisode,
        rel: Relationship,
        target: Option<i32>,
    ) -> Result<(), ApiError> {
        match rel {
            Relationship::Season => {
                new.set_season_id(target);
                Ok(())
            }
            _ => Err(ApiError::ValidationFailed(format!(
                "`{}` can not be set on an episode",
                rel.name()
            ))),
        }
    }
}

/// The linkage of one relationship of `entity`.
pub fn relationship_object<R: Resource>(
    con: &mut SqliteConnection,
    entity: &R,
    rel: Relationship,
) -> Result<RelationshipObject, ApiError> {
    if rel.is_to_many() {
        let ids = rel.linked(con, entity.id())?;
        Ok(RelationshipObject::to_many(rel.identifiers(&ids)))
    } else {
        let ident = entity
            .to_one(rel)
            .map(|id| ResourceIdentifier::new(rel.target(), id));
        Ok(RelationshipObject::to_one(ident))
    }
}

/// Render `entity` with the linkage of all its relationships.
pub fn render<R: Resource>(
    con: &mut SqliteConnection,
    entity: &R,
) -> Result<ResourceObject, ApiError> {
    let attributes = serde_json::to_value(entity)
        .map_err(|err| ApiError::Internal(format!("Failed to render {}: {}", R::KIND, err)))?;

    let mut relationships = BTreeMap::new();
    for rel in Relationship::declared(R::KIND) {
        relationships.insert(rel.name(), relationship_object(con, entity, *rel)?);
    }

    Ok(ResourceObject {
        kind: R::KIND.as_str(),
        id: entity.id(),
        attributes,
        relationships,
    })
}

/// Load and render the row `id` of `kind`.
pub fn render_by_id(
    con: &mut SqliteConnection,
    kind: ResourceType,
    id: i32,
) -> Result<ResourceObject, ApiError> {
    fn load<R: Resource>(con: &mut SqliteConnection, id: i32) -> Result<ResourceObject, ApiError> {
        let entity = R::find(con, id)?;
        render(con, &entity)
    }

    match kind {
        ResourceType::Podcasts => load::<Podcast>(con, id),
        ResourceType::Seasons => load::<Season>(con, id),
        ResourceType::Episodes => load::<Episode>(con, id),
        ResourceType::Contributors => load::<Contributor>(con, id),
    }
}

/// Create a row from the primary data of a create document.
///
/// To-one relationships are set on the insert itself, to-many ones are
/// linked right after it.
pub fn create<R: Resource>(
    con: &mut SqliteConnection,
    data: NewResourceObject<R::New>,
) -> Result<R, ApiError> {
    check_type(&data.kind, R::KIND)?;

    let mut new = data.attributes;
    let mut given = Vec::new();
    let mut to_many = Vec::new();
    for (name, doc) in data.relationships {
        let rel = Relationship::find(R::KIND, &name).ok_or_else(|| {
            ApiError::ValidationFailed(format!("{} have no `{}` relationship", R::KIND, name))
        })?;

        if rel.is_to_many() {
            let ids = rel.target_ids(&rel.expect_many(doc.data)?)?;
            to_many.push((rel, ids));
        } else {
            let target = rel.expect_one(doc.data)?;
            R::attach(&mut new, rel, target)?;
        }
        given.push(rel);
    }

    let missing = Relationship::declared(R::KIND)
        .iter()
        .find(|rel| rel.is_required() && !given.contains(rel));
    if let Some(rel) = missing {
        return Err(ApiError::ValidationFailed(format!(
            "A {} requires a `{}` relationship",
            R::KIND.singular(),
            rel.name()
        )));
    }

    let entity = new.insert(con)?;
    for (rel, ids) in to_many {
        rel.mutate(con, entity.id(), Mutation::Replace, &ids)?;
    }
    Ok(entity)
}

/// Apply an update document to the row `id` and load it again.
pub fn update<R: Resource>(
    con: &mut SqliteConnection,
    id: i32,
    data: PatchResourceObject<R::Patch>,
) -> Result<R, ApiError> {
    check_type(&data.kind, R::KIND)?;
    if !data.targets(id) {
        return Err(ApiError::ValidationFailed(format!(
            "The document does not describe {} {}",
            R::KIND.singular(),
            id
        )));
    }

    R::find(con, id)?;
    if let Some(patch) = data.attributes {
        patch.update(con, id)?;
    }
    for (name, doc) in data.relationships {
        let rel = Relationship::find(R::KIND, &name).ok_or_else(|| {
            ApiError::ValidationFailed(format!("{} have no `{}` relationship", R::KIND, name))
        })?;
        rel.apply(con, id, doc.data)?;
    }

    R::find(con, id).map_err(From::from)
}
