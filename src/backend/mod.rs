mod response;
#[cfg(feature = "http")]
mod http;

use async_trait::async_trait;

use crate::error::BackendError;

pub use response::{DashboardMetadata, DashboardResponse, MapMetadata, MapResponse, QueryResponse};
#[cfg(feature = "http")]
pub use http::HttpBackend;

/// The natural-language query service.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn ask(&self, query: &str) -> Result<QueryResponse, BackendError>;

    /// Best-effort request that wakes a cold backend.
    async fn ping(&self) -> Result<(), BackendError>;
}
