//! Shared domain enums, stored as short text codes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Raised when a stored or submitted code does not name a known variant
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// LocationType
// ---------------------------------------------------------------------------

/// How the user described the location of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    #[default]
    City,
    Zip,
    Coordinates,
    Landmark,
}

impl LocationType {
    pub const ALL: [LocationType; 4] = [
        LocationType::City,
        LocationType::Zip,
        LocationType::Coordinates,
        LocationType::Landmark,
    ];

    /// Stored code
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::City => "city",
            LocationType::Zip => "zip",
            LocationType::Coordinates => "coordinates",
            LocationType::Landmark => "landmark",
        }
    }

    /// Human-readable label used on forms
    pub fn label(&self) -> &'static str {
        match self {
            LocationType::City => "City",
            LocationType::Zip => "Zip Code",
            LocationType::Coordinates => "GPS Coordinates",
            LocationType::Landmark => "Landmark",
        }
    }
}

impl FromStr for LocationType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownCode {
                kind: "location type",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for LocationType {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SearchType
// ---------------------------------------------------------------------------

/// Kind of weather lookup recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Current,
    Forecast,
    Historical,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Current => "current",
            SearchType::Forecast => "forecast",
            SearchType::Historical => "historical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchType::Current => "Current Weather",
            SearchType::Forecast => "Forecast",
            SearchType::Historical => "Historical",
        }
    }
}

impl FromStr for SearchType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(SearchType::Current),
            "forecast" => Ok(SearchType::Forecast),
            "historical" => Ok(SearchType::Historical),
            other => Err(UnknownCode {
                kind: "search type",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SearchType {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
