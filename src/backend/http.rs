use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::{config::Config, error::BackendError};

use super::{QueryBackend, QueryResponse};

/// Backend reached over HTTP at `{base_url}/ask_ai`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("[backend] failed to build HTTP client")?;
        Ok(Self::with_client(client, &config.backend_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    fn url(&self, path: &str) -> String { format!("{}/{}", self.base_url, path) }
}

fn transport(e: reqwest::Error) -> BackendError { BackendError::Transport(e.to_string()) }

#[async_trait]
impl QueryBackend for HttpBackend {
    async fn ask(&self, query: &str) -> Result<QueryResponse, BackendError> {
        let response = self.client.post(self.url("ask_ai"))
            .json(&json!({ "query": query }))
            .send().await
            .and_then(|response| response.error_for_status())
            .map_err(transport)?;

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.client.get(self.url("")).send().await
            .map(|_| ())
            .map_err(transport)
    }
}
