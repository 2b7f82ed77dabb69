use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CensusError;

/// One identifying code of a geography level: the field name the backend
/// uses on demographic records, the attribute aliases boundary files use for
/// the same code (in priority order), and the fixed width it is padded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeField {
    pub record_field: &'static str,
    pub region_aliases: &'static [&'static str],
    pub width: usize,
}

pub const STATE_CODE: CodeField = CodeField {
    record_field: "state",
    region_aliases: &["STATEFP", "STATE"],
    width: 2,
};

pub const COUNTY_CODE: CodeField = CodeField {
    record_field: "county",
    region_aliases: &["COUNTYFP", "COUNTY"],
    width: 3,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoType {
    State,      // Joinable on the 2-digit state FIPS code
    County,     // County -> State, joinable on state + county FIPS
    Country,    // Outline only, carries no join codes
}

impl GeoType {
    pub fn to_str(&self) -> &'static str {
        match self {
            GeoType::State => "state",
            GeoType::County => "county",
            GeoType::Country => "country",
        }
    }

    /// Every level the boundary store loads at startup.
    pub fn order() -> [GeoType; 3] {
        [GeoType::State, GeoType::County, GeoType::Country]
    }

    /// Ordered code fields making up the join key at this level.
    /// Empty for levels that cannot be joined against demographic records.
    pub fn code_fields(&self) -> &'static [CodeField] {
        match self {
            GeoType::State => &[STATE_CODE],
            GeoType::County => &[STATE_CODE, COUNTY_CODE],
            GeoType::Country => &[],
        }
    }

    pub fn is_joinable(&self) -> bool { !self.code_fields().is_empty() }

    /// Returns true if `field` on a demographic record is one of this level's key fields.
    pub fn is_key_field(&self, field: &str) -> bool {
        self.code_fields().iter().any(|code| code.record_field == field)
    }
}

impl fmt::Display for GeoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for GeoType {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Ok(GeoType::State),
            "county" => Ok(GeoType::County),
            "country" => Ok(GeoType::Country),
            _ => Err(CensusError::UnsupportedGeographyLevel(s.to_string())),
        }
    }
}
