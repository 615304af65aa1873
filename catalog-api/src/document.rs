// document.rs
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

//! Wire types of the JSON:API documents.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use std::collections::BTreeMap;

use catalog_data::ResourceType;

use crate::error::ApiError;

/// The media type of every response.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// A JSON:API document, as a request body extractor or as a response.
///
/// Requests are accepted regardless of their content type, as long as the
/// body parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonApi<T>(pub T);

impl<T, S> FromRequest<S> for JsonApi<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::ValidationFailed(err.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonApi)
            .map_err(|err| ApiError::ValidationFailed(format!("Malformed document: {}", err)))
    }
}

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE))],
                body,
            )
                .into_response(),
            Err(err) => {
                error!("Failed to serialize a document: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// The top level `{"data": ...}` object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document<T> {
    pub data: T,
}

impl<T> Document<T> {
    pub fn new(data: T) -> Self {
        Document { data }
    }
}

/// A `{type, id}` reference to a resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "string_id")]
    pub id: i32,
}

impl ResourceIdentifier {
    pub fn new(kind: ResourceType, id: i32) -> Self {
        ResourceIdentifier {
            kind: kind.as_str().to_owned(),
            id,
        }
    }
}

/// Ids are strings on the wire. Numbers are accepted on the way in.
mod string_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &i32, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<i32, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i32),
            Text(String),
        }

        match Raw::deserialize(de)? {
            Raw::Number(id) => Ok(id),
            Raw::Text(text) => text
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid resource id `{}`", text))),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub total: usize,
}

/// The linkage of one relationship of a resource object.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RelationshipObject {
    ToMany {
        data: Vec<ResourceIdentifier>,
        meta: Meta,
    },
    ToOne {
        data: Option<ResourceIdentifier>,
    },
}

impl RelationshipObject {
    pub fn to_many(data: Vec<ResourceIdentifier>) -> Self {
        let meta = Meta { total: data.len() };
        RelationshipObject::ToMany { data, meta }
    }

    pub fn to_one(data: Option<ResourceIdentifier>) -> Self {
        RelationshipObject::ToOne { data }
    }
}

/// A resource object as rendered in responses.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(with = "string_id")]
    pub id: i32,
    pub attributes: Value,
    pub relationships: BTreeMap<&'static str, RelationshipObject>,
}

/// The `data` member of a relationship in a request.
///
/// A list for to-many relationships, an identifier or `null` for to-one.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceIdentifier>),
    One(Option<ResourceIdentifier>),
}

/// A relationship in a request, `{"data": linkage}`.
pub type RelationshipDocument = Document<Linkage>;

/// The primary data of a create request.
#[derive(Deserialize, Debug)]
pub struct NewResourceObject<A> {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: A,
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipDocument>,
}

/// The primary data of an update request. Both members are optional.
#[derive(Deserialize, Debug)]
pub struct PatchResourceObject<P> {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<Value>,
    pub attributes: Option<P>,
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipDocument>,
}

impl<P> PatchResourceObject<P> {
    /// Whether the `id` member, if any, names the row at `id`.
    pub fn targets(&self, id: i32) -> bool {
        match self.id {
            None => true,
            Some(Value::String(ref text)) => text.parse::<i32>().ok() == Some(id),
            Some(Value::Number(ref number)) => number.as_i64() == Some(i64::from(id)),
            Some(_) => false,
        }
    }
}

/// Reject documents whose `type` member is not `kind`.
pub fn check_type(found: &str, kind: ResourceType) -> Result<(), ApiError> {
    if found == kind.as_str() {
        Ok(())
    } else {
        Err(ApiError::ValidationFailed(format!(
            "Expected a resource of type `{}`, got `{}`",
            kind, found
        )))
    }
}
