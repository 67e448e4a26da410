use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stored in the draft when a date-of-birth input cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

const LENIENT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const LENIENT_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Server-assigned identifier. Backends hand out either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(id) => write!(f, "{id}"),
            StudentId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub surname: String,
    pub dob: String,
    pub course: String,
}

impl Student {
    /// Date of birth as a calendar date, if the server sent something readable.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.dob)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStudent {
    pub name: String,
    pub surname: String,
    pub dob: String,
    pub course: String,
}

impl DraftStudent {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Surname => &self.surname,
            DraftField::Dob => &self.dob,
            DraftField::Course => &self.course,
        }
    }

    /// Stores `raw` into `field`. Date of birth is normalized first.
    pub fn set_field(&mut self, field: DraftField, raw: &str) {
        let slot = match field {
            DraftField::Name => &mut self.name,
            DraftField::Surname => &mut self.surname,
            DraftField::Dob => &mut self.dob,
            DraftField::Course => &mut self.course,
        };
        *slot = match field {
            DraftField::Dob => normalize_dob(raw),
            _ => raw.to_string(),
        };
    }

    pub fn missing_fields(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Surname,
    Dob,
    Course,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Name,
        DraftField::Surname,
        DraftField::Dob,
        DraftField::Course,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Surname => "surname",
            DraftField::Dob => "dob",
            DraftField::Course => "course",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown form field '{0}' (expected name, surname, dob or course)")]
pub struct UnknownFieldError(pub String);

impl FromStr for DraftField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(DraftField::Name),
            "surname" => Ok(DraftField::Surname),
            "dob" => Ok(DraftField::Dob),
            "course" => Ok(DraftField::Course),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// Canonicalizes date-of-birth input to `YYYY-MM-DD`.
///
/// Empty input clears the field. Input no format recognizes yields
/// [`INVALID_DATE`] instead of an error.
pub fn normalize_dob(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match parse_calendar_date(raw) {
        Some(date) => date.format(CANONICAL_DATE_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc().date());
    }
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            LENIENT_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|parsed| parsed.date())
        })
}
