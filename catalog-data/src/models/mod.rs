// mod.rs
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

mod new_contributor;
mod new_episode;
mod new_podcast;
mod new_season;

mod contributable;
mod contributor;
mod episode;
mod podcast;
mod season;

use diesel::SqliteConnection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use std::fmt;
use std::str::FromStr;

use crate::errors::DataError;

pub(crate) use self::contributable::{Contributable, NewContributable};

pub use self::contributable::{Owner, OwnerKind};
pub use self::contributor::Contributor;
pub use self::episode::Episode;
pub use self::new_contributor::{ContributorPatch, NewContributor, NewContributorBuilder};
pub use self::new_episode::{EpisodePatch, NewEpisode, NewEpisodeBuilder};
pub use self::new_podcast::{NewPodcast, NewPodcastBuilder, PodcastPatch};
pub use self::new_season::{NewSeason, NewSeasonBuilder, SeasonPatch};
pub use self::podcast::Podcast;
pub use self::season::Season;

/// The four kinds of entity in the catalog.
///
/// The string form is the plural name used as the resource type on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Podcasts,
    Seasons,
    Episodes,
    Contributors,
}

impl ResourceType {
    /// Every resource type, in routing order.
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Contributors,
        ResourceType::Podcasts,
        ResourceType::Seasons,
        ResourceType::Episodes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Podcasts => "podcasts",
            ResourceType::Seasons => "seasons",
            ResourceType::Episodes => "episodes",
            ResourceType::Contributors => "contributors",
        }
    }

    /// Human readable singular, used in error messages.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceType::Podcasts => "podcast",
            ResourceType::Seasons => "season",
            ResourceType::Episodes => "episode",
            ResourceType::Contributors => "contributor",
        }
    }

    /// The `OwnerKind` a resource type plays in the contributable
    /// association, if any. Contributors are never owners.
    pub fn owner_kind(self) -> Option<OwnerKind> {
        match self {
            ResourceType::Podcasts => Some(OwnerKind::Podcast),
            ResourceType::Seasons => Some(OwnerKind::Season),
            ResourceType::Episodes => Some(OwnerKind::Episode),
            ResourceType::Contributors => None,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DataError::Validation(format!("Unknown resource type `{}`", s)))
    }
}

/// Create a row from a `New*` model.
pub trait Insert<T> {
    type Error;

    fn insert(&self, con: &mut SqliteConnection) -> Result<T, Self::Error>;
}

/// Apply a partial `*Patch` model to the row with the given id.
pub trait Update<T> {
    type Error;

    fn update(&self, con: &mut SqliteConnection, id: i32) -> Result<T, Self::Error>;
}

/// The read and delete half of the entity store, shared by every model.
///
/// Models serialize into their attribute object, and their `New`/`Patch`
/// companions deserialize from one.
pub trait Entity: Serialize + Sized + Send + 'static {
    /// The resource type of the model.
    const KIND: ResourceType;

    /// Insertable model used to create a row.
    type New: Insert<Self, Error = DataError> + DeserializeOwned + Send + 'static;
    /// Partial model used to update a row.
    type Patch: Update<Self, Error = DataError> + DeserializeOwned + Send + 'static;

    /// Primary key of the row.
    fn id(&self) -> i32;

    /// Load the row with the given id.
    fn find(con: &mut SqliteConnection, id: i32) -> Result<Self, DataError>;

    /// Load every row, or only the rows whose id is in `ids`.
    /// Results are ordered by id.
    fn search(con: &mut SqliteConnection, ids: Option<&[i32]>) -> Result<Vec<Self>, DataError>;

    /// Remove the row and everything that only exists because of it.
    fn delete(con: &mut SqliteConnection, id: i32) -> Result<(), DataError>;
}
