use thiserror::Error;

use crate::geography::GeoType;

/// Failures talking to the query backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response from backend: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CensusError {
    /// A boundary collection could not be fetched or parsed. Fatal to startup.
    #[error("failed to load {layer} boundaries: {reason}")]
    BoundaryLoad { layer: GeoType, reason: String },

    #[error("unsupported geography level: {0}")]
    UnsupportedGeographyLevel(String),

    #[error("no data available for {0}")]
    NoDataForVariable(String),

    #[error("backend unreachable: {0}")]
    BackendUnreachable(#[from] BackendError),

    #[error("a query is already in flight")]
    QueryInFlight,

    #[error("variable {0} is not available in this dashboard")]
    UnknownVariable(String),

    #[error("no dashboard is currently displayed")]
    NotInDashboard,

    /// The dashboard named no display variable and offered none to pick from.
    #[error("the dashboard has no variables to display")]
    NoDashboardVariables,
}

impl CensusError {
    /// Whether the error leaves the session usable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CensusError::BoundaryLoad { .. })
    }
}
