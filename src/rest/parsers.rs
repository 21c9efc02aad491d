/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error;
use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;

// Format Flickr uses for taken dates
pub(crate) const MYSQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

// Parses a number the XML tree holds as a string
pub fn from_str_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.trim().parse::<T>().map_err(D::Error::custom)
}

// Parses an optional number, treating "" as absent
pub fn from_optional_str_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match from_empty_str_to_none(deserializer)? {
        Some(s) => s.trim().parse::<T>().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

// Parses the "0"/"1" visibility flags
pub fn from_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    match s.as_str() {
        "1" => Ok(true),
        "0" | "" => Ok(false),
        other => Err(D::Error::custom(format!("invalid flag {other:?}"))),
    }
}

// Parses unix timestamps such as dateupload and lastupdate
pub fn from_optional_unix_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs: Option<i64> = from_optional_str_number(deserializer)?;
    secs.map(|secs| {
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| D::Error::custom(format!("timestamp {secs} out of range")))
    })
    .transpose()
}

// Parses the mysql style datetaken value
pub fn from_optional_mysql_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match from_empty_str_to_none(deserializer)? {
        Some(s) => NaiveDateTime::parse_from_str(&s, MYSQL_DATETIME)
            .map(Some)
            .map_err(D::Error::custom),
        None => Ok(None),
    }
}

// Parses space separated lists such as tags
pub fn from_space_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(s.split_whitespace().map(str::to_string).collect())
}

// Parses strings that may be "" and sets to None
pub fn from_empty_str_to_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}
