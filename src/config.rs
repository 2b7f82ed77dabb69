use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geography::GeoType;

pub const BACKEND_URL_ENV: &str = "CENSUS_BACKEND_URL";
pub const BOUNDARY_URL_ENV: &str = "CENSUS_BOUNDARY_URL";

/// File name of each boundary level, relative to the boundary base URL or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryFiles {
    pub state: String,
    pub county: String,
    pub country: String,
}

impl Default for BoundaryFiles {
    fn default() -> Self {
        Self {
            state: "us-states.json".to_string(),
            county: "us-counties.json".to_string(),
            country: "us-country.json".to_string(),
        }
    }
}

impl BoundaryFiles {
    pub fn file_for(&self, level: GeoType) -> &str {
        match level {
            GeoType::State => &self.state,
            GeoType::County => &self.county,
            GeoType::Country => &self.country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub boundary_base_url: String,
    pub boundary_files: BoundaryFiles,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            boundary_base_url: "http://localhost:8000/static".to_string(),
            boundary_files: BoundaryFiles::default(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Defaults, overridden by `CENSUS_BACKEND_URL` and `CENSUS_BOUNDARY_URL` when set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a JSON config document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(BACKEND_URL_ENV) { self.backend_url = url }
        if let Some(url) = non_empty(BOUNDARY_URL_ENV) { self.boundary_base_url = url }
        self
    }

    pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}
