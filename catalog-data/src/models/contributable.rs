// contributable.rs
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

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;

use std::fmt;
use std::str::FromStr;

use crate::models::ResourceType;
use crate::schema::contributables;

/// Tags which table the `owner_id` of a contributable row points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum OwnerKind {
    Podcast,
    Season,
    Episode,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OwnerKind::Podcast => "podcast",
            OwnerKind::Season => "season",
            OwnerKind::Episode => "episode",
        }
    }

    /// The resource type of the owner table.
    pub fn resource_type(self) -> ResourceType {
        match self {
            OwnerKind::Podcast => ResourceType::Podcasts,
            OwnerKind::Season => ResourceType::Seasons,
            OwnerKind::Episode => ResourceType::Episodes,
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "podcast" => Ok(OwnerKind::Podcast),
            "season" => Ok(OwnerKind::Season),
            "episode" => Ok(OwnerKind::Episode),
            other => Err(format!("Unrecognized owner kind `{}`", other)),
        }
    }
}

impl ToSql<Text, Sqlite> for OwnerKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for OwnerKind {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(From::from)
    }
}

/// One side of the contributable association: a podcast, season or episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Owner {
    kind: OwnerKind,
    id: i32,
}

impl Owner {
    pub fn new(kind: OwnerKind, id: i32) -> Self {
        Owner { kind, id }
    }

    pub fn podcast(id: i32) -> Self {
        Owner::new(OwnerKind::Podcast, id)
    }

    pub fn season(id: i32) -> Self {
        Owner::new(OwnerKind::Season, id)
    }

    pub fn episode(id: i32) -> Self {
        Owner::new(OwnerKind::Episode, id)
    }

    pub fn kind(&self) -> OwnerKind {
        self.kind
    }

    pub fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = contributables)]
/// Diesel Model of the owner half of a contributables row.
pub(crate) struct Contributable {
    id: i32,
    owner_kind: OwnerKind,
    owner_id: i32,
}

impl Contributable {
    pub(crate) fn owner(&self) -> Owner {
        Owner::new(self.owner_kind, self.owner_id)
    }
}

#[derive(Insertable, Debug, Clone, Copy)]
#[diesel(table_name = contributables)]
pub(crate) struct NewContributable {
    contributor_id: i32,
    owner_kind: OwnerKind,
    owner_id: i32,
}

impl NewContributable {
    pub(crate) fn new(contributor_id: i32, owner: Owner) -> Self {
        NewContributable {
            contributor_id,
            owner_kind: owner.kind(),
            owner_id: owner.id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_kind_tags() {
        for kind in &[OwnerKind::Podcast, OwnerKind::Season, OwnerKind::Episode] {
            assert_eq!(kind.as_str().parse::<OwnerKind>(), Ok(*kind));
        }
        assert!("App\\Podcast".parse::<OwnerKind>().is_err());
        assert_eq!(OwnerKind::Episode.resource_type(), ResourceType::Episodes);
    }
}
