//! JSON-over-HTTP render backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use reel_models::JobHandle;

use crate::backend::{PollStatus, RenderBackend, RenderRequest};
use crate::config::RenderConfig;
use crate::error::{WorkerError, WorkerResult};

/// Client for a render service exposing `/renders` endpoints.
#[derive(Debug, Clone)]
pub struct HttpRenderBackend {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    render_id: String,
    bucket_name: String,
}

impl HttpRenderBackend {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> WorkerResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            WorkerError::config_error(format!("Invalid render backend URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(WorkerError::config_error(format!(
                "Render backend URL '{}' cannot be a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorkerError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Build from render config. `None` when no backend URL is configured.
    pub fn from_config(config: &RenderConfig) -> WorkerResult<Option<Self>> {
        config
            .backend_url
            .as_deref()
            .map(|url| Self::new(url, config.api_key.clone(), config.http_timeout))
            .transpose()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl RenderBackend for HttpRenderBackend {
    async fn submit(&self, request: &RenderRequest) -> WorkerResult<JobHandle> {
        let url = self.endpoint(&["renders"]);
        debug!(composition = %request.composition_id, "Submitting render to {}", url);

        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                WorkerError::submission_failed(format!("Render backend unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::submission_failed(format!(
                "Render backend returned {}: {}",
                status, body
            )));
        }

        let accepted: SubmitResponse = response.json().await.map_err(|e| {
            WorkerError::submission_failed(format!("Failed to parse submit response: {}", e))
        })?;

        Ok(JobHandle {
            render_id: accepted.render_id,
            bucket_name: accepted.bucket_name,
        })
    }

    async fn poll(&self, handle: &JobHandle) -> WorkerResult<PollStatus> {
        let url = self.endpoint(&["renders", &handle.render_id]);

        let response = self
            .authorized(self.client.get(url))
            .query(&[("bucket", handle.bucket_name.as_str())])
            .send()
            .await
            .map_err(|e| WorkerError::poll_failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkerError::poll_failed(format!(
                "Render backend returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| WorkerError::poll_failed(format!("Failed to parse progress: {}", e)))
    }

    async fn fetch_output(&self, output_ref: &str) -> WorkerResult<Vec<u8>> {
        let url = Url::parse(output_ref).map_err(|e| {
            WorkerError::store_transfer(format!("Invalid output reference '{}': {}", output_ref, e))
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WorkerError::store_transfer(format!("Download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(WorkerError::store_transfer(format!(
                "Download returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WorkerError::store_transfer(format!("Download interrupted: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
