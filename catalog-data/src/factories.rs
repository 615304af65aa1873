// factories.rs
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

//! Rows with plausible attributes, for tests and for seeding a database.

use diesel::SqliteConnection;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::DataError;
use crate::models::*;
use crate::utils;

static COUNTER: AtomicUsize = AtomicUsize::new(1);

fn next() -> usize {
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

fn built<T, E: std::fmt::Display>(res: Result<T, E>) -> Result<T, DataError> {
    res.map_err(|err| DataError::Validation(err.to_string()))
}

pub fn podcast(con: &mut SqliteConnection) -> Result<Podcast, DataError> {
    let n = next();
    let new = built(
        NewPodcastBuilder::default()
            .title(format!("Podcast {}", n))
            .description(Some(format!("The {}th podcast.", n)))
            .image_url(Some(format!("https://example.com/podcasts/{}.png", n)))
            .build(),
    )?;
    new.insert(con)
}

/// A season of a new podcast.
pub fn season(con: &mut SqliteConnection) -> Result<Season, DataError> {
    let parent = podcast(con)?;
    season_of(con, parent.id())
}

pub fn season_of(con: &mut SqliteConnection, podcast_id: i32) -> Result<Season, DataError> {
    let n = next();
    let new = built(
        NewSeasonBuilder::default()
            .podcast_id(podcast_id)
            .title(format!("Season {}", n))
            .number(Some(n as i32))
            .build(),
    )?;
    new.insert(con)
}

/// An episode without a season.
pub fn episode(con: &mut SqliteConnection) -> Result<Episode, DataError> {
    episode_of(con, None)
}

pub fn episode_of(
    con: &mut SqliteConnection,
    season_id: Option<i32>,
) -> Result<Episode, DataError> {
    let n = next();
    let new = built(
        NewEpisodeBuilder::default()
            .season_id(season_id)
            .title(format!("Episode {}", n))
            .media_url(Some(format!("https://example.com/episodes/{}.mp3", n)))
            .published_at(Some(utils::now()))
            .status(Some("published".to_string()))
            .number(Some(n as i32))
            .build(),
    )?;
    new.insert(con)
}

pub fn contributor(con: &mut SqliteConnection) -> Result<Contributor, DataError> {
    let n = next();
    let new = built(
        NewContributorBuilder::default()
            .name(format!("Contributor {}", n))
            .bio(Some("Talks a lot.".to_string()))
            .url(Some(format!("https://example.com/people/{}", n)))
            .twitter(Some(format!("@person{}", n)))
            .build(),
    )?;
    new.insert(con)
}
