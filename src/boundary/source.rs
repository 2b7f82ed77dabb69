use std::{collections::HashMap, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use crate::{config::BoundaryFiles, geography::GeoType};

/// Read-only access to the raw GeoJSON text of each boundary level.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    async fn fetch(&self, level: GeoType) -> Result<String>;
}

/// Boundary files stored in a local directory.
pub struct DirBoundarySource {
    root: PathBuf,
    files: BoundaryFiles,
}

impl DirBoundarySource {
    pub fn new(root: impl Into<PathBuf>, files: BoundaryFiles) -> Self {
        Self { root: root.into(), files }
    }

    fn full(&self, level: GeoType) -> PathBuf { self.root.join(self.files.file_for(level)) }
}

#[async_trait]
impl BoundarySource for DirBoundarySource {
    async fn fetch(&self, level: GeoType) -> Result<String> {
        let path = self.full(level);
        tokio::fs::read_to_string(&path).await
            .with_context(|| format!("[boundary] failed to read {}", path.display()))
    }
}

/// Simple in-memory source.
#[derive(Default, Clone)]
pub struct MemBoundarySource {
    pub(crate) files: HashMap<GeoType, String>,
}

impl MemBoundarySource {
    pub fn new(files: HashMap<GeoType, String>) -> Self { Self { files } }

    pub fn with(mut self, level: GeoType, geojson: impl Into<String>) -> Self {
        self.files.insert(level, geojson.into());
        self
    }
}

#[async_trait]
impl BoundarySource for MemBoundarySource {
    async fn fetch(&self, level: GeoType) -> Result<String> {
        self.files.get(&level).cloned()
            .ok_or_else(|| anyhow!("missing {level} boundaries"))
    }
}

/// Boundary files served over HTTP relative to a base URL.
#[cfg(feature = "http")]
pub struct HttpBoundarySource {
    client: reqwest::Client,
    base_url: String,
    files: BoundaryFiles,
}

#[cfg(feature = "http")]
impl HttpBoundarySource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, files: BoundaryFiles) -> Self {
        Self { client, base_url: base_url.into(), files }
    }

    pub fn from_config(client: reqwest::Client, config: &crate::config::Config) -> Self {
        Self::new(client, config.boundary_base_url.clone(), config.boundary_files.clone())
    }

    fn url(&self, level: GeoType) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.files.file_for(level))
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl BoundarySource for HttpBoundarySource {
    async fn fetch(&self, level: GeoType) -> Result<String> {
        let url = self.url(level);
        let response = self.client.get(&url).send().await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("[boundary] GET {url}"))?;
        response.text().await
            .with_context(|| format!("[boundary] reading body of {url}"))
    }
}
