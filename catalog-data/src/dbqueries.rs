// dbqueries.rs
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

//! Random CRUD helper functions.

use diesel::dsl::exists as row_exists;
use diesel::prelude::*;
use diesel::select;

use crate::errors::{DataError, OrNotFound};
use crate::linkage;
use crate::models::*;
use crate::utils;

/// Upper bound of the ids bound in a single `IN (..)` query.
///
/// Sqlite refuses statements with more than 32766 variables.
pub(crate) const MAX_BOUND_IDS: usize = 10_000;

/// Load the rows of `ids` in batches of `MAX_BOUND_IDS`, ordered by id.
fn load_by_ids<T, K, F>(ids: &[i32], key: K, mut load: F) -> Result<Vec<T>, DataError>
where
    K: FnMut(&T) -> i32,
    F: FnMut(&[i32]) -> QueryResult<Vec<T>>,
{
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut rows = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(MAX_BOUND_IDS) {
        rows.extend(load(chunk)?);
    }
    rows.sort_by_key(key);
    Ok(rows)
}

pub fn get_podcast(con: &mut SqliteConnection, pid: i32) -> Result<Podcast, DataError> {
    use crate::schema::podcasts::dsl::*;

    podcasts
        .find(pid)
        .select(Podcast::as_select())
        .first(con)
        .or_not_found(ResourceType::Podcasts, pid)
}

pub fn get_podcasts(
    con: &mut SqliteConnection,
    filter_ids: Option<&[i32]>,
) -> Result<Vec<Podcast>, DataError> {
    use crate::schema::podcasts::dsl::*;

    match filter_ids {
        Some(filter_ids) => load_by_ids(filter_ids, Podcast::id, |chunk| {
            podcasts
                .filter(id.eq_any(chunk))
                .select(Podcast::as_select())
                .load(con)
        }),
        None => podcasts
            .select(Podcast::as_select())
            .order(id.asc())
            .load(con)
            .map_err(From::from),
    }
}

pub fn get_season(con: &mut SqliteConnection, sid: i32) -> Result<Season, DataError> {
    use crate::schema::seasons::dsl::*;

    seasons
        .find(sid)
        .select(Season::as_select())
        .first(con)
        .or_not_found(ResourceType::Seasons, sid)
}

pub fn get_seasons(
    con: &mut SqliteConnection,
    filter_ids: Option<&[i32]>,
) -> Result<Vec<Season>, DataError> {
    use crate::schema::seasons::dsl::*;

    match filter_ids {
        Some(filter_ids) => load_by_ids(filter_ids, Season::id, |chunk| {
            seasons
                .filter(id.eq_any(chunk))
                .select(Season::as_select())
                .load(con)
        }),
        None => seasons
            .select(Season::as_select())
            .order(id.asc())
            .load(con)
            .map_err(From::from),
    }
}

/// The seasons owned by a podcast, ordered by id.
pub fn get_podcast_seasons(
    con: &mut SqliteConnection,
    pid: i32,
) -> Result<Vec<Season>, DataError> {
    use crate::schema::seasons::dsl::*;

    seasons
        .filter(podcast_id.eq(pid))
        .select(Season::as_select())
        .order(id.asc())
        .load(con)
        .map_err(From::from)
}

pub fn get_episode(con: &mut SqliteConnection, eid: i32) -> Result<Episode, DataError> {
    use crate::schema::episodes::dsl::*;

    episodes
        .find(eid)
        .select(Episode::as_select())
        .first(con)
        .or_not_found(ResourceType::Episodes, eid)
}

pub fn get_episodes(
    con: &mut SqliteConnection,
    filter_ids: Option<&[i32]>,
) -> Result<Vec<Episode>, DataError> {
    use crate::schema::episodes::dsl::*;

    match filter_ids {
        Some(filter_ids) => load_by_ids(filter_ids, Episode::id, |chunk| {
            episodes
                .filter(id.eq_any(chunk))
                .select(Episode::as_select())
                .load(con)
        }),
        None => episodes
            .select(Episode::as_select())
            .order(id.asc())
            .load(con)
            .map_err(From::from),
    }
}

pub fn get_contributor(con: &mut SqliteConnection, cid: i32) -> Result<Contributor, DataError> {
    use crate::schema::contributors::dsl::*;

    contributors
        .find(cid)
        .select(Contributor::as_select())
        .first(con)
        .or_not_found(ResourceType::Contributors, cid)
}

pub fn get_contributors(
    con: &mut SqliteConnection,
    filter_ids: Option<&[i32]>,
) -> Result<Vec<Contributor>, DataError> {
    use crate::schema::contributors::dsl::*;

    match filter_ids {
        Some(filter_ids) => load_by_ids(filter_ids, Contributor::id, |chunk| {
            contributors
                .filter(id.eq_any(chunk))
                .select(Contributor::as_select())
                .load(con)
        }),
        None => contributors
            .select(Contributor::as_select())
            .order(id.asc())
            .load(con)
            .map_err(From::from),
    }
}

/// Check whether a row with the given id exists in the table of `kind`.
pub fn exists(con: &mut SqliteConnection, kind: ResourceType, row: i32) -> Result<bool, DataError> {
    use crate::schema::{contributors, episodes, podcasts, seasons};

    let found: QueryResult<bool> = match kind {
        ResourceType::Podcasts => select(row_exists(podcasts::table.find(row))).get_result(con),
        ResourceType::Seasons => select(row_exists(seasons::table.find(row))).get_result(con),
        ResourceType::Episodes => select(row_exists(episodes::table.find(row))).get_result(con),
        ResourceType::Contributors => {
            select(row_exists(contributors::table.find(row))).get_result(con)
        }
    };

    found.map_err(From::from)
}

/// Same as `exists` but a missing row is a `DataError::NotFound`.
pub fn ensure_exists(
    con: &mut SqliteConnection,
    kind: ResourceType,
    row: i32,
) -> Result<(), DataError> {
    if exists(con, kind, row)? {
        Ok(())
    } else {
        Err(DataError::not_found(kind, row))
    }
}

/// Move a season under another podcast.
///
/// The season is resolved before the podcast, and its `updated_at` is refreshed.
pub fn set_season_podcast(
    con: &mut SqliteConnection,
    sid: i32,
    pid: i32,
) -> Result<Season, DataError> {
    use crate::schema::seasons::dsl::*;

    con.transaction(|con| {
        ensure_exists(con, ResourceType::Seasons, sid)?;
        ensure_exists(con, ResourceType::Podcasts, pid)?;

        info!("Moving season {} to podcast {}", sid, pid);
        diesel::update(seasons.find(sid))
            .set((podcast_id.eq(pid), updated_at.eq(utils::now())))
            .returning(Season::as_returning())
            .get_result(con)
            .or_not_found(ResourceType::Seasons, sid)
    })
}

/// Attach an episode to a season, or detach it with `None`.
///
/// The episode is resolved before the season, and its `updated_at` is refreshed.
pub fn set_episode_season(
    con: &mut SqliteConnection,
    eid: i32,
    sid: Option<i32>,
) -> Result<Episode, DataError> {
    use crate::schema::episodes::dsl::*;

    con.transaction(|con| {
        ensure_exists(con, ResourceType::Episodes, eid)?;
        if let Some(sid) = sid {
            ensure_exists(con, ResourceType::Seasons, sid)?;
        }

        info!("Setting season of episode {} to {:?}", eid, sid);
        diesel::update(episodes.find(eid))
            .set((season_id.eq(sid), updated_at.eq(utils::now())))
            .returning(Episode::as_returning())
            .get_result(con)
            .or_not_found(ResourceType::Episodes, eid)
    })
}

/// Delete a podcast along with its seasons and every contributable row of
/// them. Episodes of the deleted seasons are kept, without a season.
pub fn remove_podcast(con: &mut SqliteConnection, pid: i32) -> Result<(), DataError> {
    use crate::schema::{podcasts, seasons};

    con.transaction(|con| {
        ensure_exists(con, ResourceType::Podcasts, pid)?;

        let owned = seasons::table
            .filter(seasons::podcast_id.eq(pid))
            .select(seasons::id)
            .load::<i32>(con)?;
        for sid in owned {
            delete_season(con, sid)?;
        }

        linkage::purge_owner(con, Owner::podcast(pid))?;
        info!("Removing podcast {}", pid);
        diesel::delete(podcasts::table.find(pid)).execute(con)?;
        Ok(())
    })
}

/// Delete a season and its contributable rows. Its episodes are detached.
pub fn remove_season(con: &mut SqliteConnection, sid: i32) -> Result<(), DataError> {
    con.transaction(|con| {
        ensure_exists(con, ResourceType::Seasons, sid)?;
        delete_season(con, sid).map(|_| ())
    })
}

fn delete_season(con: &mut SqliteConnection, sid: i32) -> Result<usize, DataError> {
    use crate::schema::{episodes, seasons};

    let detached = diesel::update(episodes::table.filter(episodes::season_id.eq(sid)))
        .set(episodes::season_id.eq(None::<i32>))
        .execute(con)?;
    debug!("Detached {} episodes from season {}", detached, sid);

    linkage::purge_owner(con, Owner::season(sid))?;
    info!("Removing season {}", sid);
    diesel::delete(seasons::table.find(sid))
        .execute(con)
        .map_err(From::from)
}

/// Delete an episode and its contributable rows.
pub fn remove_episode(con: &mut SqliteConnection, eid: i32) -> Result<(), DataError> {
    use crate::schema::episodes::dsl::*;

    con.transaction(|con| {
        ensure_exists(con, ResourceType::Episodes, eid)?;
        linkage::purge_owner(con, Owner::episode(eid))?;

        info!("Removing episode {}", eid);
        diesel::delete(episodes.find(eid)).execute(con)?;
        Ok(())
    })
}

/// Delete a contributor and every contributable row of it.
pub fn remove_contributor(con: &mut SqliteConnection, cid: i32) -> Result<(), DataError> {
    use crate::schema::contributors::dsl::*;

    con.transaction(|con| {
        ensure_exists(con, ResourceType::Contributors, cid)?;
        linkage::purge_contributor(con, cid)?;

        info!("Removing contributor {}", cid);
        diesel::delete(contributors.find(cid)).execute(con)?;
        Ok(())
    })
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
    fn test_search_filter() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let ids = (0..4)
            .map(|_| factories::podcast(&mut con).map(|p| p.id()))
            .collect::<Result<Vec<_>, _>>()?;

        let all = get_podcasts(&mut con, None)?;
        assert_eq!(all.iter().map(Podcast::id).collect::<Vec<_>>(), ids);

        let filter = [ids[3], ids[1], 999];
        let some = get_podcasts(&mut con, Some(&filter))?;
        assert_eq!(
            some.iter().map(Podcast::id).collect::<Vec<_>>(),
            vec![ids[1], ids[3]]
        );

        assert!(get_podcasts(&mut con, Some(&[]))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_search_filter_past_bind_limit() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let first = factories::contributor(&mut con)?.id();
        let second = factories::contributor(&mut con)?.id();

        let mut filter = (1..40_000).rev().collect::<Vec<i32>>();
        filter.push(first);
        let found = get_contributors(&mut con, Some(&filter))?;
        assert_eq!(
            found.iter().map(Contributor::id).collect::<Vec<_>>(),
            vec![first, second]
        );
        Ok(())
    }

    #[test]
    fn test_read_after_create() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let contributor = factories::contributor(&mut con)?;
        assert_eq!(get_contributor(&mut con, contributor.id())?, contributor);

        let episode = factories::episode(&mut con)?;
        assert_eq!(get_episode(&mut con, episode.id())?, episode);

        assert!(matches!(
            get_season(&mut con, 5),
            Err(DataError::NotFound { kind: ResourceType::Seasons, id: 5 })
        ));
        Ok(())
    }

    #[test]
    fn test_exists() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let season = factories::season(&mut con)?;
        assert!(exists(&mut con, ResourceType::Seasons, season.id())?);
        assert!(exists(&mut con, ResourceType::Podcasts, season.podcast_id())?);
        assert!(!exists(&mut con, ResourceType::Episodes, season.id())?);
        assert!(ensure_exists(&mut con, ResourceType::Contributors, 1).is_err());
        Ok(())
    }

    #[test]
    fn test_set_episode_season() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let episode = factories::episode(&mut con)?;
        let season = factories::season(&mut con)?;
        assert_eq!(episode.season_id(), None);

        thread::sleep(Duration::from_millis(5));
        let attached = set_episode_season(&mut con, episode.id(), Some(season.id()))?;
        assert_eq!(attached.season_id(), Some(season.id()));
        assert!(attached.updated_at() > episode.updated_at());
        assert_eq!(attached.title(), episode.title());

        let detached = set_episode_season(&mut con, episode.id(), None)?;
        assert_eq!(detached.season_id(), None);

        // The owner is resolved first
        assert!(matches!(
            set_episode_season(&mut con, 999, Some(998)),
            Err(DataError::NotFound { kind: ResourceType::Episodes, id: 999 })
        ));
        assert!(matches!(
            set_episode_season(&mut con, episode.id(), Some(998)),
            Err(DataError::NotFound { kind: ResourceType::Seasons, id: 998 })
        ));
        assert_eq!(get_episode(&mut con, episode.id())?.season_id(), None);
        Ok(())
    }

    #[test]
    fn test_set_season_podcast() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let season = factories::season(&mut con)?;
        let podcast = factories::podcast(&mut con)?;

        let moved = set_season_podcast(&mut con, season.id(), podcast.id())?;
        assert_eq!(moved.podcast_id(), podcast.id());
        assert_eq!(get_podcast_seasons(&mut con, podcast.id())?, vec![moved]);
        assert!(get_podcast_seasons(&mut con, season.podcast_id())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_remove_podcast_cascades() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let podcast = factories::podcast(&mut con)?;
        let season = factories::season_of(&mut con, podcast.id())?;
        let episode = factories::episode_of(&mut con, Some(season.id()))?;
        let contributor = factories::contributor(&mut con)?;
        linkage::add(&mut con, Owner::podcast(podcast.id()), &[contributor.id()])?;
        linkage::add(&mut con, Owner::season(season.id()), &[contributor.id()])?;
        linkage::add(&mut con, Owner::episode(episode.id()), &[contributor.id()])?;

        remove_podcast(&mut con, podcast.id())?;

        assert!(get_podcast(&mut con, podcast.id()).is_err());
        assert!(get_season(&mut con, season.id()).is_err());
        assert_eq!(get_episode(&mut con, episode.id())?.season_id(), None);

        let owners = linkage::list_owners_of(&mut con, contributor.id())?;
        assert!(owners.podcasts.is_empty());
        assert!(owners.seasons.is_empty());
        assert_eq!(owners.episodes, vec![episode.id()]);

        assert!(matches!(
            remove_podcast(&mut con, podcast.id()),
            Err(DataError::NotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_remove_contributor() -> Result<()> {
        let (_tmp, pool) = temp_pool()?;
        let mut con = pool.get()?;

        let episode = factories::episode(&mut con)?;
        let first = factories::contributor(&mut con)?;
        let second = factories::contributor(&mut con)?;
        let owner = Owner::episode(episode.id());
        linkage::add(&mut con, owner, &[first.id(), second.id()])?;

        remove_contributor(&mut con, first.id())?;
        assert!(get_contributor(&mut con, first.id()).is_err());
        assert_eq!(linkage::list_contributors_of(&mut con, owner)?, vec![second.id()]);

        remove_episode(&mut con, episode.id())?;
        let owners = linkage::list_owners_of(&mut con, second.id())?;
        assert!(owners.episodes.is_empty());
        Ok(())
    }
}
