// utils.rs
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

//! Helper utilities for accomplishing various tasks.

use chrono::prelude::*;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::errors::DataError;

/// The current time, as stored in `created_at`/`updated_at` columns.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Render a Utc timestamp as ISO 8601 with an explicit offset,
/// e.g. `2018-01-01T10:00:00+00:00`.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(dt)
        .format(iso8601::FORMAT)
        .to_string()
}

/// Parse an RFC 3339 timestamp with any offset and normalize it to Utc.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s.trim()).map(|dt| dt.naive_utc())
}

/// Serde (de)serializers for timestamps on the wire.
pub mod iso8601 {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(de)?;
        super::parse_timestamp(&s).map_err(|err| {
            de::Error::custom(format!("invalid timestamp `{}`: {}", s, err))
        })
    }

    /// Same as the parent module, for nullable columns.
    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<NaiveDateTime>,
            ser: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => super::serialize(dt, ser),
                None => ser.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            de: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(deserialize_with = "super::deserialize")] NaiveDateTime);

            Option::<Wrapper>::deserialize(de).map(|w| w.map(|Wrapper(dt)| dt))
        }
    }

    /// Deserialize a nullable timestamp of a patch, see `super::double_option`.
    pub fn patch<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<Option<NaiveDateTime>>, D::Error> {
        option::deserialize(de).map(Some)
    }
}

/// Deserialize a nullable attribute of a patch.
///
/// Used together with `#[serde(default)]`, so that an absent key stays
/// `None`, an explicit `null` becomes `Some(None)` and a value becomes
/// `Some(Some(value))`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Deserialize a required attribute of a patch.
///
/// Used together with `#[serde(default)]`: an absent key stays `None`, while
/// an explicit `null` is an error since the column can not be cleared.
pub fn present<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(de).map(Some)
}

/// The new value of a nullable patch field, if it sets one.
pub(crate) fn patched(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(Option::as_deref)
}

/// Reject blank values of required text attributes.
pub(crate) fn check_required(field: &str, value: &str) -> Result<(), DataError> {
    if value.trim().is_empty() {
        return Err(DataError::Validation(format!(
            "The {} attribute must not be blank",
            field
        )));
    }
    Ok(())
}

/// Reject values of url attributes that are not absolute urls.
pub(crate) fn check_url(field: &str, value: Option<&str>) -> Result<(), DataError> {
    match value {
        Some(value) => Url::parse(value).map(|_| ()).map_err(|err| {
            DataError::Validation(format!(
                "The {} attribute must be a valid url: {}",
                field, err
            ))
        }),
        None => Ok(()),
    }
}
