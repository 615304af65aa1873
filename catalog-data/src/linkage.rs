// linkage.rs
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

//! The contributable association between contributors and
//! podcasts, seasons and episodes.
//!
//! Every linkage returned here is ordered by insertion, which is the order
//! of the surrogate id of the `contributables` table.

use diesel::prelude::*;

use std::collections::HashSet;

use crate::dbqueries::{self, MAX_BOUND_IDS};
use crate::errors::DataError;
use crate::models::{Contributable, NewContributable, Owner, OwnerKind, ResourceType};
use crate::schema::contributables;

/// Everything a contributor is linked to, per owner kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owners {
    pub podcasts: Vec<i32>,
    pub seasons: Vec<i32>,
    pub episodes: Vec<i32>,
}

impl Owners {
    pub fn of_kind(&self, kind: OwnerKind) -> &[i32] {
        match kind {
            OwnerKind::Podcast => &self.podcasts,
            OwnerKind::Season => &self.seasons,
            OwnerKind::Episode => &self.episodes,
        }
    }
}

/// The side a mutation is anchored on.
///
/// `Owner` links contributors to one owner, `Contributor` links owners of a
/// single kind to one contributor.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    Owner(Owner),
    Contributor(i32, OwnerKind),
}

impl Anchor {
    fn kind(self) -> ResourceType {
        match self {
            Anchor::Owner(owner) => owner.kind().resource_type(),
            Anchor::Contributor(..) => ResourceType::Contributors,
        }
    }

    fn id(self) -> i32 {
        match self {
            Anchor::Owner(owner) => owner.id(),
            Anchor::Contributor(cid, _) => cid,
        }
    }

    fn target_kind(self) -> ResourceType {
        match self {
            Anchor::Owner(_) => ResourceType::Contributors,
            Anchor::Contributor(_, kind) => kind.resource_type(),
        }
    }

    fn row(self, target: i32) -> NewContributable {
        match self {
            Anchor::Owner(owner) => NewContributable::new(target, owner),
            Anchor::Contributor(cid, kind) => NewContributable::new(cid, Owner::new(kind, target)),
        }
    }

    fn linked(self, con: &mut SqliteConnection) -> QueryResult<Vec<i32>> {
        use crate::schema::contributables::dsl::*;

        match self {
            Anchor::Owner(owner) => contributables
                .filter(owner_kind.eq(owner.kind()))
                .filter(owner_id.eq(owner.id()))
                .order(id.asc())
                .select(contributor_id)
                .load(con),
            Anchor::Contributor(cid, kind) => contributables
                .filter(contributor_id.eq(cid))
                .filter(owner_kind.eq(kind))
                .order(id.asc())
                .select(owner_id)
                .load(con),
        }
    }

    /// Delete the rows of the anchor, all of them or only those of `targets`.
    fn unlink(self, con: &mut SqliteConnection, targets: Option<&[i32]>) -> QueryResult<usize> {
        match targets {
            Some(targets) => targets
                .chunks(MAX_BOUND_IDS)
                .try_fold(0, |n, chunk| -> QueryResult<usize> {
                    Ok(n + self.unlink_batch(con, Some(chunk))?)
                }),
            None => self.unlink_batch(con, None),
        }
    }

    fn unlink_batch(
        self,
        con: &mut SqliteConnection,
        targets: Option<&[i32]>,
    ) -> QueryResult<usize> {
        use crate::schema::contributables::dsl::*;

        let mut query = diesel::delete(contributables).into_boxed();
        query = match self {
            Anchor::Owner(owner) => query
                .filter(owner_kind.eq(owner.kind()))
                .filter(owner_id.eq(owner.id())),
            Anchor::Contributor(cid, kind) => query
                .filter(contributor_id.eq(cid))
                .filter(owner_kind.eq(kind)),
        };
        if let Some(targets) = targets {
            query = match self {
                Anchor::Owner(_) => query.filter(contributor_id.eq_any(targets)),
                Anchor::Contributor(..) => query.filter(owner_id.eq_any(targets)),
            };
        }

        query.execute(con)
    }

    fn link(self, con: &mut SqliteConnection, targets: &[i32]) -> QueryResult<usize> {
        if targets.is_empty() {
            return Ok(0);
        }

        // Three variables per row.
        let rows = targets.iter().map(|t| self.row(*t)).collect::<Vec<_>>();
        rows.chunks(MAX_BOUND_IDS / 3).try_fold(0, |n, batch| -> QueryResult<usize> {
            let inserted = diesel::insert_into(contributables::table)
                .values(batch)
                .execute(con)?;
            Ok(n + inserted)
        })
    }

    /// Resolve the anchor and then every target, so a missing row is
    /// reported before anything is written.
    fn resolve(self, con: &mut SqliteConnection, targets: &[i32]) -> Result<(), DataError> {
        dbqueries::ensure_exists(con, self.kind(), self.id())?;
        for target in targets {
            dbqueries::ensure_exists(con, self.target_kind(), *target)?;
        }
        Ok(())
    }

    fn add(self, con: &mut SqliteConnection, ids: &[i32]) -> Result<Vec<i32>, DataError> {
        con.transaction(|con| {
            let targets = dedup(ids);
            self.resolve(con, &targets)?;

            let prior = self.linked(con)?.into_iter().collect::<HashSet<_>>();
            let fresh = targets
                .into_iter()
                .filter(|t| !prior.contains(t))
                .collect::<Vec<_>>();
            debug!("Linking {:?} to {:?}", fresh, self);
            self.link(con, &fresh)?;

            self.linked(con).map_err(From::from)
        })
    }

    fn remove(self, con: &mut SqliteConnection, ids: &[i32]) -> Result<Vec<i32>, DataError> {
        con.transaction(|con| {
            let targets = dedup(ids);
            self.resolve(con, &targets)?;

            let removed = self.unlink(con, Some(&targets))?;
            debug!("Unlinked {} rows from {:?}", removed, self);

            self.linked(con).map_err(From::from)
        })
    }

    fn replace(self, con: &mut SqliteConnection, ids: &[i32]) -> Result<Vec<i32>, DataError> {
        con.transaction(|con| {
            let targets = dedup(ids);
            self.resolve(con, &targets)?;

            // Rows already in the requested order keep their surrogate id, so
            // their position on the other side does not move.
            let prior = self.linked(con)?;
            let wanted = targets.iter().copied().collect::<HashSet<_>>();
            let kept = prior
                .iter()
                .filter(|t| wanted.contains(*t))
                .zip(&targets)
                .take_while(|(linked, target)| linked == target)
                .count();
            let keep = targets[..kept].iter().copied().collect::<HashSet<_>>();
            let stale = prior
                .into_iter()
                .filter(|t| !keep.contains(t))
                .collect::<Vec<_>>();

            debug!("Replacing linkage of {:?} with {:?}", self, targets);
            self.unlink(con, Some(&stale))?;
            self.link(con, &targets[kept..])?;

            self.linked(con).map_err(From::from)
        })
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// The ids of the contributors of `owner`.
///
/// Does not check that the owner exists, an unknown owner has no contributors.
pub fn list_contributors_of(
    con: &mut SqliteConnection,
    owner: Owner,
) -> Result<Vec<i32>, DataError> {
    Anchor::Owner(owner).linked(con).map_err(From::from)
}

/// The ids of the owners of kind `kind` a contributor is linked to.
pub fn list_owners_of_kind(
    con: &mut SqliteConnection,
    cid: i32,
    kind: OwnerKind,
) -> Result<Vec<i32>, DataError> {
    Anchor::Contributor(cid, kind)
        .linked(con)
        .map_err(From::from)
}

/// Everything a contributor is linked to.
pub fn list_owners_of(con: &mut SqliteConnection, cid: i32) -> Result<Owners, DataError> {
    use crate::schema::contributables::dsl::*;

    let rows = contributables
        .filter(contributor_id.eq(cid))
        .order(id.asc())
        .select(Contributable::as_select())
        .load(con)?;

    let mut owners = Owners::default();
    for row in rows {
        let owner = row.owner();
        match owner.kind() {
            OwnerKind::Podcast => owners.podcasts.push(owner.id()),
            OwnerKind::Season => owners.seasons.push(owner.id()),
            OwnerKind::Episode => owners.episodes.push(owner.id()),
        }
    }
    Ok(owners)
}

/// Link contributors to an owner and return its contributors.
///
/// Contributors already linked, or repeated in `ids`, are skipped. The new
/// ones are appended in the order given.
pub fn add(con: &mut SqliteConnection, owner: Owner, ids: &[i32]) -> Result<Vec<i32>, DataError> {
    Anchor::Owner(owner).add(con, ids)
}

/// Unlink contributors from an owner and return its contributors.
///
/// Ids that are not linked are ignored.
pub fn remove(
    con: &mut SqliteConnection,
    owner: Owner,
    ids: &[i32],
) -> Result<Vec<i32>, DataError> {
    Anchor::Owner(owner).remove(con, ids)
}

/// Make `ids` the contributors of an owner, in that order.
///
/// Links that already lead the requested order are kept as they are. Every
/// other link is recreated, which moves the owner to the end of that
/// contributor's linkage.
pub fn replace(
    con: &mut SqliteConnection,
    owner: Owner,
    ids: &[i32],
) -> Result<Vec<i32>, DataError> {
    Anchor::Owner(owner).replace(con, ids)
}

/// Link owners of one kind to a contributor. Same rules as `add`.
pub fn add_to_contributor(
    con: &mut SqliteConnection,
    cid: i32,
    kind: OwnerKind,
    ids: &[i32],
) -> Result<Vec<i32>, DataError> {
    Anchor::Contributor(cid, kind).add(con, ids)
}

/// Unlink owners of one kind from a contributor. Same rules as `remove`.
pub fn remove_from_contributor(
    con: &mut SqliteConnection,
    cid: i32,
    kind: OwnerKind,
    ids: &[i32],
) -> Result<Vec<i32>, DataError> {
    Anchor::Contributor(cid, kind).remove(con, ids)
}

/// Make `ids` the owners of one kind of a contributor. Same rules as `replace`,
/// a recreated link moves the contributor to the end of that owner's linkage.
pub fn replace_for_contributor(
    con: &mut SqliteConnection,
    cid: i32,
    kind: OwnerKind,
    ids: &[i32],
) -> Result<Vec<i32>, DataError> {
    Anchor::Contributor(cid, kind).replace(con, ids)
}

pub(crate) fn purge_owner(con: &mut SqliteConnection, owner: Owner) -> QueryResult<usize> {
    Anchor::Owner(owner).unlink(con, None)
}

pub(crate) fn purge_contributor(con: &mut SqliteConnection, cid: i32) -> QueryResult<usize> {
    use crate::schema::contributables::dsl::*;

    diesel::delete(contributables.filter(contributor_id.eq(cid))).execute(con)
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use crate::database::temp_pool;
    use crate::factories;

    fn contributors(con: &mut SqliteConnection, n: usize) -> Result<Vec<i32>> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            ids.push(factories::contributor(con)?.id());
        }
        Ok(ids)
    }

    #[test]
    fn test_contributor_side_scenario() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let c = factories::contributor(&mut con)?.id();
        let p1 = factories::podcast(&mut con)?.id();
        let p2 = factories::podcast(&mut con)?.id();
        let p3 = factories::podcast(&mut con)?.id();
        let kind = OwnerKind::Podcast;

        let linkage = add_to_contributor(&mut con, c, kind, &[p1, p2, p3])?;
        assert_eq!(linkage, vec![p1, p2, p3]);

        let linkage = remove_from_contributor(&mut con, c, kind, &[p2])?;
        assert_eq!(linkage, vec![p1, p3]);

        let linkage = replace_for_contributor(&mut con, c, kind, &[p3, p1])?;
        assert_eq!(linkage, vec![p3, p1]);
        assert_eq!(list_owners_of(&mut con, c)?.podcasts, vec![p3, p1]);

        // Both sides see the same rows
        assert_eq!(list_contributors_of(&mut con, Owner::podcast(p1))?, vec![c]);
        assert!(list_contributors_of(&mut con, Owner::podcast(p2))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_add_appends_new_ids() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let episode = Owner::episode(factories::episode(&mut con)?.id());
        let ids = contributors(&mut con, 4)?;

        assert_eq!(add(&mut con, episode, &[ids[2], ids[0]])?, vec![ids[2], ids[0]]);
        // Already linked and repeated ids are skipped
        assert_eq!(
            add(&mut con, episode, &[ids[0], ids[3], ids[1], ids[3]])?,
            vec![ids[2], ids[0], ids[3], ids[1]]
        );
        assert_eq!(
            list_contributors_of(&mut con, episode)?,
            vec![ids[2], ids[0], ids[3], ids[1]]
        );
        Ok(())
    }

    #[test]
    fn test_remove_keeps_order() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let season = Owner::season(factories::season(&mut con)?.id());
        let ids = contributors(&mut con, 4)?;
        add(&mut con, season, &ids)?;

        // ids[1] twice and ids[1] not linked afterwards are both fine
        assert_eq!(
            remove(&mut con, season, &[ids[1], ids[1]])?,
            vec![ids[0], ids[2], ids[3]]
        );
        assert_eq!(remove(&mut con, season, &[ids[1]])?, vec![ids[0], ids[2], ids[3]]);
        assert_eq!(remove(&mut con, season, &[ids[3], ids[0]])?, vec![ids[2]]);
        Ok(())
    }

    #[test]
    fn test_replace_collapses_duplicates() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let podcast = Owner::podcast(factories::podcast(&mut con)?.id());
        let ids = contributors(&mut con, 3)?;
        add(&mut con, podcast, &[ids[0], ids[1]])?;

        assert_eq!(
            replace(&mut con, podcast, &[ids[2], ids[0], ids[2]])?,
            vec![ids[2], ids[0]]
        );
        assert!(replace(&mut con, podcast, &[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_replace_keeps_leading_links() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let c = factories::contributor(&mut con)?.id();
        let p1 = factories::podcast(&mut con)?.id();
        let p2 = factories::podcast(&mut con)?.id();
        add_to_contributor(&mut con, c, OwnerKind::Podcast, &[p1, p2])?;

        // Same linkage from the other side, the contributor order is untouched
        assert_eq!(replace(&mut con, Owner::podcast(p1), &[c])?, vec![c]);
        assert_eq!(list_owners_of_kind(&mut con, c, OwnerKind::Podcast)?, vec![p1, p2]);

        // A kept prefix survives, only the tail is recreated
        let ids = contributors(&mut con, 3)?;
        let owner = Owner::podcast(p2);
        add(&mut con, owner, &ids)?;
        assert_eq!(
            replace(&mut con, owner, &[c, ids[1], ids[0]])?,
            vec![c, ids[1], ids[0]]
        );
        assert_eq!(list_owners_of_kind(&mut con, c, OwnerKind::Podcast)?, vec![p1, p2]);
        assert_eq!(
            list_owners_of_kind(&mut con, ids[0], OwnerKind::Podcast)?,
            vec![p2]
        );
        assert!(list_owners_of_kind(&mut con, ids[2], OwnerKind::Podcast)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_large_batches() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        // Owner ids are not foreign keys, so plain numbers do for the rows
        let c = factories::contributor(&mut con)?.id();
        let anchor = Anchor::Contributor(c, OwnerKind::Episode);
        let owners = (1..=12_000).collect::<Vec<i32>>();

        assert_eq!(anchor.link(&mut con, &owners)?, 12_000);
        assert_eq!(anchor.linked(&mut con)?, owners);

        let mut doomed = (1..40_000).collect::<Vec<i32>>();
        doomed.retain(|id| id % 2 == 0);
        assert_eq!(anchor.unlink(&mut con, Some(&doomed))?, 6_000);
        assert_eq!(anchor.linked(&mut con)?.len(), 6_000);
        Ok(())
    }

    #[test]
    fn test_unknown_ids_change_nothing() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let podcast = Owner::podcast(factories::podcast(&mut con)?.id());
        let ids = contributors(&mut con, 2)?;
        add(&mut con, podcast, &[ids[0]])?;

        for result in vec![
            add(&mut con, podcast, &[ids[1], 404]),
            remove(&mut con, podcast, &[ids[0], 404]),
            replace(&mut con, podcast, &[ids[1], 404]),
        ] {
            assert!(matches!(
                result,
                Err(DataError::NotFound { kind: ResourceType::Contributors, id: 404 })
            ));
        }
        assert_eq!(list_contributors_of(&mut con, podcast)?, vec![ids[0]]);

        // The anchor is resolved before the targets
        assert!(matches!(
            add(&mut con, Owner::podcast(500), &[404]),
            Err(DataError::NotFound { kind: ResourceType::Podcasts, id: 500 })
        ));
        assert!(matches!(
            add_to_contributor(&mut con, 600, OwnerKind::Season, &[404]),
            Err(DataError::NotFound { kind: ResourceType::Contributors, id: 600 })
        ));
        assert!(matches!(
            add_to_contributor(&mut con, ids[1], OwnerKind::Season, &[404]),
            Err(DataError::NotFound { kind: ResourceType::Seasons, id: 404 })
        ));
        Ok(())
    }

    #[test]
    fn test_owner_kinds_are_distinct() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        // Rows of different tables may share the same id
        let podcast = factories::podcast(&mut con)?;
        let season = factories::season_of(&mut con, podcast.id())?;
        let episode = factories::episode(&mut con)?;
        let c = factories::contributor(&mut con)?.id();

        add(&mut con, Owner::podcast(podcast.id()), &[c])?;
        add(&mut con, Owner::episode(episode.id()), &[c])?;
        add_to_contributor(&mut con, c, OwnerKind::Season, &[season.id()])?;

        let owners = list_owners_of(&mut con, c)?;
        assert_eq!(
            owners,
            Owners {
                podcasts: vec![podcast.id()],
                seasons: vec![season.id()],
                episodes: vec![episode.id()],
            }
        );
        assert_eq!(owners.of_kind(OwnerKind::Season), &[season.id()]);

        assert_eq!(purge_owner(&mut con, Owner::episode(episode.id()))?, 1);
        assert_eq!(purge_contributor(&mut con, c)?, 2);
        assert_eq!(list_owners_of(&mut con, c)?, Owners::default());
        Ok(())
    }
}
