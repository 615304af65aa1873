// error.rs
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

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use catalog_data::errors::DataError;

use crate::document::JsonApi;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "Not Found",
            ApiError::ValidationFailed(_) => "Validation Failed",
            ApiError::Conflict(_) => "Conflict",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        if err.is_unique_violation() {
            return ApiError::Conflict(err.to_string());
        }

        match err {
            DataError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DataError::Validation(msg) => ApiError::ValidationFailed(msg),
            err => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        DataError::from(err).into()
    }
}

#[derive(Serialize, Debug)]
struct ErrorObject {
    status: String,
    title: &'static str,
    detail: String,
}

#[derive(Serialize, Debug)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let doc = ErrorDocument {
            errors: vec![ErrorObject {
                status: status.as_str().to_owned(),
                title: self.title(),
                detail: self.to_string(),
            }],
        };
        (status, JsonApi(doc)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use catalog_data::ResourceType;

    #[test]
    fn test_data_errors() {
        let err = ApiError::from(DataError::NotFound {
            kind: ResourceType::Episodes,
            id: 3,
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No episode with id 3 exists");

        let err = ApiError::from(DataError::Validation("nope".into()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(DataError::DieselMigrationError);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
