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

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::document::{
    Document, JsonApi, Linkage, RelationshipDocument, RelationshipObject, ResourceIdentifier,
};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::relationships::{Mutation, Relationship};
use crate::resources::{self, Resource};
use crate::state::AppState;

/// `GET /{kind}/{id}/{relationship}`
///
/// To-many relationships answer with their linkage and its total, to-one
/// relationships with the full related resource, or `null`.
pub async fn read_related<R: Resource>(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let id = parse_id(R::KIND, &id)?;
    let rel = Relationship::resolve(R::KIND, &name)?;

    if rel.is_to_many() {
        let linkage = state
            .read(move |con| {
                let entity = R::find(con, id)?;
                resources::relationship_object(con, &entity, rel)
            })
            .await?;
        return Ok(JsonApi(linkage).into_response());
    }

    let related = state
        .read(move |con| {
            let entity = R::find(con, id)?;
            entity
                .to_one(rel)
                .map(|target| resources::render_by_id(con, rel.target(), target))
                .transpose()
        })
        .await?;
    Ok(JsonApi(Document::new(related)).into_response())
}

/// `GET /{kind}/{id}/relationships/{relationship}`
pub async fn relationship<R: Resource>(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Result<JsonApi<RelationshipObject>, ApiError> {
    let id = parse_id(R::KIND, &id)?;
    let rel = Relationship::resolve(R::KIND, &name)?;

    let linkage = state
        .read(move |con| {
            let entity = R::find(con, id)?;
            resources::relationship_object(con, &entity, rel)
        })
        .await?;
    Ok(JsonApi(linkage))
}

async fn mutate<R: Resource>(
    state: AppState,
    id: String,
    name: String,
    linkage: Linkage,
    op: Mutation,
) -> Result<JsonApi<Document<Vec<ResourceIdentifier>>>, ApiError> {
    let id = parse_id(R::KIND, &id)?;
    let rel = Relationship::resolve(R::KIND, &name)?;
    let ids = rel.target_ids(&rel.expect_many(linkage)?)?;

    let linked = state
        .write(move |con| {
            R::find(con, id)?;
            rel.mutate(con, id, op, &ids)
        })
        .await?;
    Ok(JsonApi(Document::new(rel.identifiers(&linked))))
}

/// `POST /{kind}/{id}/relationships/{relationship}`
pub async fn add_related<R: Resource>(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    JsonApi(doc): JsonApi<RelationshipDocument>,
) -> Result<JsonApi<Document<Vec<ResourceIdentifier>>>, ApiError> {
    mutate::<R>(state, id, name, doc.data, Mutation::Add).await
}

/// `DELETE /{kind}/{id}/relationships/{relationship}`
pub async fn remove_related<R: Resource>(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    JsonApi(doc): JsonApi<RelationshipDocument>,
) -> Result<JsonApi<Document<Vec<ResourceIdentifier>>>, ApiError> {
    mutate::<R>(state, id, name, doc.data, Mutation::Remove).await
}

/// `PATCH /{kind}/{id}/relationships/{relationship}`
///
/// Replaces a to-many linkage, or points a to-one relationship elsewhere.
pub async fn patch_related<R: Resource>(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    JsonApi(doc): JsonApi<RelationshipDocument>,
) -> Result<Response, ApiError> {
    let rel = Relationship::resolve(R::KIND, &name)?;
    if rel.is_to_many() {
        let linked = mutate::<R>(state, id, name, doc.data, Mutation::Replace).await?;
        return Ok(linked.into_response());
    }

    let id = parse_id(R::KIND, &id)?;
    let target = rel.expect_one(doc.data)?;
    state
        .write(move |con| {
            R::find(con, id)?;
            rel.set_to_one(con, id, target)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
