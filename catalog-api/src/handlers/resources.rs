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

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::document::{Document, JsonApi, NewResourceObject, PatchResourceObject, ResourceObject};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::resources::{self, Resource};
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    #[serde(rename = "filter[id]")]
    filter_id: Option<String>,
}

impl SearchParams {
    /// The ids of a `filter[id]=1,2` query, if there is one.
    fn ids(&self) -> Result<Option<Vec<i32>>, ApiError> {
        let raw = match self.filter_id {
            Some(ref raw) => raw,
            None => return Ok(None),
        };

        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse().map_err(|_| {
                    ApiError::ValidationFailed(format!("Invalid id `{}` in filter[id]", s))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

pub async fn search<R: Resource>(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<JsonApi<Document<Vec<ResourceObject>>>, ApiError> {
    let Query(params) = query.map_err(|err| ApiError::ValidationFailed(err.body_text()))?;
    let ids = params.ids()?;

    let data = state
        .read(move |con| {
            let rows = R::search(con, ids.as_deref())?;
            rows.iter()
                .map(|row| resources::render(con, row))
                .collect::<Result<Vec<_>, _>>()
        })
        .await?;
    Ok(JsonApi(Document::new(data)))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    JsonApi(doc): JsonApi<Document<NewResourceObject<R::New>>>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .write(move |con| {
            let entity = resources::create::<R>(con, doc.data)?;
            resources::render(con, &entity)
        })
        .await?;

    info!("Created {} {}", R::KIND.singular(), created.id);
    let location = format!("/{}/{}", R::KIND, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        JsonApi(Document::new(created)),
    ))
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<JsonApi<Document<ResourceObject>>, ApiError> {
    let id = parse_id(R::KIND, &id)?;

    let data = state
        .read(move |con| {
            let entity = R::find(con, id)?;
            resources::render(con, &entity)
        })
        .await?;
    Ok(JsonApi(Document::new(data)))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonApi(doc): JsonApi<Document<PatchResourceObject<R::Patch>>>,
) -> Result<JsonApi<Document<ResourceObject>>, ApiError> {
    let id = parse_id(R::KIND, &id)?;

    let data = state
        .write(move |con| {
            let entity = resources::update::<R>(con, id, doc.data)?;
            resources::render(con, &entity)
        })
        .await?;
    Ok(JsonApi(Document::new(data)))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(R::KIND, &id)?;

    state
        .write(move |con| R::delete(con, id).map_err(From::from))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
