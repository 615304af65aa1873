// relationships.rs
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

//! The declared relationships of every resource type, and the operations
//! that read and mutate them.

use diesel::SqliteConnection;

use catalog_data::{dbqueries, linkage, Owner, OwnerKind, ResourceType};

use crate::document::{Linkage, ResourceIdentifier};
use crate::error::ApiError;

/// A relationship a resource type exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// The contributors of a podcast, season or episode.
    Contributors(OwnerKind),
    /// The podcasts, seasons or episodes of a contributor.
    Owners(OwnerKind),
    /// The podcast a season belongs to. Required.
    Podcast,
    /// The season an episode belongs to, if any.
    Season,
}

/// The ways a to-many relationship can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Remove,
    Replace,
}

const CONTRIBUTOR: &[Relationship] = &[
    Relationship::Owners(OwnerKind::Podcast),
    Relationship::Owners(OwnerKind::Season),
    Relationship::Owners(OwnerKind::Episode),
];
const PODCAST: &[Relationship] = &[Relationship::Contributors(OwnerKind::Podcast)];
const SEASON: &[Relationship] = &[
    Relationship::Podcast,
    Relationship::Contributors(OwnerKind::Season),
];
const EPISODE: &[Relationship] = &[
    Relationship::Season,
    Relationship::Contributors(OwnerKind::Episode),
];

impl Relationship {
    /// Every relationship of `kind`.
    pub fn declared(kind: ResourceType) -> &'static [Relationship] {
        match kind {
            ResourceType::Contributors => CONTRIBUTOR,
            ResourceType::Podcasts => PODCAST,
            ResourceType::Seasons => SEASON,
            ResourceType::Episodes => EPISODE,
        }
    }

    pub fn find(kind: ResourceType, name: &str) -> Option<Relationship> {
        Relationship::declared(kind)
            .iter()
            .copied()
            .find(|rel| rel.name() == name)
    }

    /// Same as `find`, for relationship names that come from a url.
    pub fn resolve(kind: ResourceType, name: &str) -> Result<Relationship, ApiError> {
        Relationship::find(kind, name).ok_or_else(|| {
            ApiError::NotFound(format!("{} have no `{}` relationship", kind, name))
        })
    }

    /// The member name of the relationship in a resource object.
    pub fn name(self) -> &'static str {
        match self {
            Relationship::Contributors(_) => "contributors",
            Relationship::Owners(kind) => kind.resource_type().as_str(),
            Relationship::Podcast => "podcast",
            Relationship::Season => "season",
        }
    }

    /// The resource type on the other end.
    pub fn target(self) -> ResourceType {
        match self {
            Relationship::Contributors(_) => ResourceType::Contributors,
            Relationship::Owners(kind) => kind.resource_type(),
            Relationship::Podcast => ResourceType::Podcasts,
            Relationship::Season => ResourceType::Seasons,
        }
    }

    pub fn is_to_many(self) -> bool {
        matches!(self, Relationship::Contributors(_) | Relationship::Owners(_))
    }

    /// Whether the relationship must be given when a resource is created
    /// and can never be cleared.
    pub fn is_required(self) -> bool {
        self == Relationship::Podcast
    }

    pub fn identifiers(self, ids: &[i32]) -> Vec<ResourceIdentifier> {
        ids.iter()
            .map(|id| ResourceIdentifier::new(self.target(), *id))
            .collect()
    }

    fn target_id(self, ident: &ResourceIdentifier) -> Result<i32, ApiError> {
        if ident.kind == self.target().as_str() {
            Ok(ident.id)
        } else {
            Err(ApiError::ValidationFailed(format!(
                "The `{}` relationship takes `{}` identifiers, got `{}`",
                self.name(),
                self.target(),
                ident.kind
            )))
        }
    }

    /// The target ids of a list of identifiers, checking their type.
    pub fn target_ids(self, idents: &[ResourceIdentifier]) -> Result<Vec<i32>, ApiError> {
        idents.iter().map(|ident| self.target_id(ident)).collect()
    }

    /// The error for a linkage, or an operation, of the wrong cardinality.
    fn shape_error(self) -> ApiError {
        let expected = if self.is_to_many() {
            "is a to-many relationship and takes a list of identifiers"
        } else {
            "is a to-one relationship and takes a single identifier or null"
        };
        ApiError::ValidationFailed(format!("`{}` {}", self.name(), expected))
    }

    /// The identifiers of a to-many linkage.
    pub fn expect_many(self, linkage: Linkage) -> Result<Vec<ResourceIdentifier>, ApiError> {
        match linkage {
            Linkage::Many(idents) if self.is_to_many() => Ok(idents),
            _ => Err(self.shape_error()),
        }
    }

    /// The target id of a to-one linkage, `None` to clear it.
    pub fn expect_one(self, linkage: Linkage) -> Result<Option<i32>, ApiError> {
        match linkage {
            Linkage::One(ident) if !self.is_to_many() => {
                ident.map(|ident| self.target_id(&ident)).transpose()
            }
            _ => Err(self.shape_error()),
        }
    }

    /// The linked ids of a to-many relationship of the row `id`, in
    /// insertion order.
    pub fn linked(self, con: &mut SqliteConnection, id: i32) -> Result<Vec<i32>, ApiError> {
        let ids = match self {
            Relationship::Contributors(kind) => {
                linkage::list_contributors_of(con, Owner::new(kind, id))?
            }
            Relationship::Owners(kind) => linkage::list_owners_of_kind(con, id, kind)?,
            Relationship::Podcast | Relationship::Season => return Err(self.shape_error()),
        };
        Ok(ids)
    }

    /// Add, remove or replace the targets of a to-many relationship of the
    /// row `id`, returning the resulting linkage.
    pub fn mutate(
        self,
        con: &mut SqliteConnection,
        id: i32,
        op: Mutation,
        ids: &[i32],
    ) -> Result<Vec<i32>, ApiError> {
        debug!("{:?} {:?} of row {}: {:?}", op, self, id, ids);
        let linked = match (self, op) {
            (Relationship::Contributors(kind), Mutation::Add) => {
                linkage::add(con, Owner::new(kind, id), ids)?
            }
            (Relationship::Contributors(kind), Mutation::Remove) => {
                linkage::remove(con, Owner::new(kind, id), ids)?
            }
            (Relationship::Contributors(kind), Mutation::Replace) => {
                linkage::replace(con, Owner::new(kind, id), ids)?
            }
            (Relationship::Owners(kind), Mutation::Add) => {
                linkage::add_to_contributor(con, id, kind, ids)?
            }
            (Relationship::Owners(kind), Mutation::Remove) => {
                linkage::remove_from_contributor(con, id, kind, ids)?
            }
            (Relationship::Owners(kind), Mutation::Replace) => {
                linkage::replace_for_contributor(con, id, kind, ids)?
            }
            (Relationship::Podcast, _) | (Relationship::Season, _) => {
                return Err(self.shape_error())
            }
        };
        Ok(linked)
    }

    /// Point a to-one relationship of the row `id` at `target`.
    pub fn set_to_one(
        self,
        con: &mut SqliteConnection,
        id: i32,
        target: Option<i32>,
    ) -> Result<(), ApiError> {
        match (self, target) {
            (Relationship::Podcast, Some(pid)) => {
                dbqueries::set_season_podcast(con, id, pid)?;
            }
            (Relationship::Podcast, None) => {
                return Err(ApiError::ValidationFailed(
                    "A season must belong to a podcast".to_string(),
                ))
            }
            (Relationship::Season, target) => {
                dbqueries::set_episode_season(con, id, target)?;
            }
            _ => return Err(self.shape_error()),
        }
        Ok(())
    }

    /// Apply the linkage of an update document: to-one relationships are
    /// set, to-many ones replaced.
    pub fn apply(
        self,
        con: &mut SqliteConnection,
        id: i32,
        linkage: Linkage,
    ) -> Result<(), ApiError> {
        if self.is_to_many() {
            let ids = self.target_ids(&self.expect_many(linkage)?)?;
            self.mutate(con, id, Mutation::Replace, &ids).map(|_| ())
        } else {
            let target = self.expect_one(linkage)?;
            self.set_to_one(con, id, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_declared_names() {
        let names = |kind| {
            Relationship::declared(kind)
                .iter()
                .map(|rel| rel.name())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(ResourceType::Contributors),
            vec!["podcasts", "seasons", "episodes"]
        );
        assert_eq!(names(ResourceType::Podcasts), vec!["contributors"]);
        assert_eq!(names(ResourceType::Seasons), vec!["podcast", "contributors"]);
        assert_eq!(names(ResourceType::Episodes), vec!["season", "contributors"]);
    }

    #[test]
    fn test_resolve() {
        let rel = Relationship::resolve(ResourceType::Episodes, "season").unwrap();
        assert_eq!(rel, Relationship::Season);
        assert!(!rel.is_to_many());
        assert_eq!(rel.target(), ResourceType::Seasons);

        let rel = Relationship::resolve(ResourceType::Contributors, "seasons").unwrap();
        assert_eq!(rel, Relationship::Owners(OwnerKind::Season));
        assert!(rel.is_to_many());

        assert!(matches!(
            Relationship::resolve(ResourceType::Podcasts, "seasons"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_linkage_checks() {
        let rel = Relationship::Contributors(OwnerKind::Podcast);
        let good = vec![ResourceIdentifier::new(ResourceType::Contributors, 3)];
        let bad = vec![ResourceIdentifier::new(ResourceType::Podcasts, 3)];

        assert_eq!(rel.target_ids(&good).unwrap(), vec![3]);
        assert!(matches!(rel.target_ids(&bad), Err(ApiError::ValidationFailed(_))));
        assert!(rel.expect_many(Linkage::One(None)).is_err());
        assert!(rel.expect_one(Linkage::Many(good.clone())).is_err());

        let rel = Relationship::Season;
        assert_eq!(rel.expect_one(Linkage::One(None)).unwrap(), None);
        assert!(rel.expect_many(Linkage::Many(good)).is_err());
        assert!(rel.expect_one(Linkage::One(bad.into_iter().next())).is_err());
    }
}
