use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Error, Debug, PartialEq, Eq)]
#[error("malformed date `{0}`")]
pub struct DateParseError(pub String);

/// Parses a calendar date in ISO (`2024-06-01`) or day-first dotted
/// (`01.06.2024`) form.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| DateParseError(text.to_string()))
}

/// Parses a wall-clock timestamp. RFC 3339 input keeps its local time and
/// drops the offset.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, DateParseError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| DateParseError(text.to_string()))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_date(&text).map_err(serde::de::Error::custom)
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .filter(|text| !text.trim().is_empty())
        .map(|text| parse_date(&text).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_datetime(&text).map_err(serde::de::Error::custom)
}
