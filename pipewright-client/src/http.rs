//! HTTP implementation of the pipeline-service API

use std::time::Duration;

use async_trait::async_trait;
use pipewright_core::domain::definition::PipelineObjectSpec;
use pipewright_core::dto::pipeline::{
    CreatePipelineRequest, CreatePipelineResponse, DefinitionPayload, PipelineListing, PutOutcome,
    ValidationOutcome,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::service::PipelineService;

/// Timeout applied to every remote call made through [`HttpPipelineService::new`]
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the pipeline-orchestration service API
///
/// Requests carry a bearer token when one is configured. The base URL is
/// stored without a trailing slash so endpoint paths can be appended
/// directly.
#[derive(Debug, Clone)]
pub struct HttpPipelineService {
    base_url: String,
    api_token: Option<String>,
    client: Client,
}

impl HttpPipelineService {
    /// Creates a new client for the service at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service, e.g. `http://localhost:3000`
    /// * `api_token` - Optional bearer token sent with every request
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, matching
    /// the contract of [`reqwest::Client::new`].
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("failed to construct HTTP client");
        Self::with_client(base_url, api_token, client)
    }

    /// Creates a client using a preconfigured [`reqwest::Client`]
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service
    /// * `api_token` - Optional bearer token sent with every request
    /// * `client` - Client to issue requests with, for custom timeouts or
    ///   TLS settings
    pub fn with_client(base_url: impl Into<String>, api_token: Option<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_token,
            client,
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Handles a response that should contain a JSON body
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Handles a response where only the status code matters
    async fn handle_empty_response(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl PipelineService for HttpPipelineService {
    async fn create(&self, request: CreatePipelineRequest) -> Result<CreatePipelineResponse> {
        let url = format!("{}/api/pipeline/create", self.base_url);
        let response = self.request(Method::POST, &url).json(&request).send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, pipeline_id: &str) -> Result<()> {
        let url = format!("{}/api/pipeline/{}", self.base_url, pipeline_id);
        let response = self.request(Method::DELETE, &url).send().await?;
        Self::handle_empty_response(response).await
    }

    async fn list(&self, marker: Option<&str>) -> Result<PipelineListing> {
        let url = format!("{}/api/pipeline/list", self.base_url);
        let mut builder = self.request(Method::GET, &url);
        if let Some(marker) = marker {
            builder = builder.query(&[("marker", marker)]);
        }
        let response = builder.send().await?;
        Self::handle_response(response).await
    }

    async fn validate(
        &self,
        pipeline_id: &str,
        objects: &[PipelineObjectSpec],
    ) -> Result<ValidationOutcome> {
        let url = format!("{}/api/pipeline/{}/validate", self.base_url, pipeline_id);
        let payload = DefinitionPayload {
            objects: objects.to_vec(),
        };
        let response = self.request(Method::POST, &url).json(&payload).send().await?;
        Self::handle_response(response).await
    }

    async fn put(&self, pipeline_id: &str, objects: &[PipelineObjectSpec]) -> Result<PutOutcome> {
        let url = format!("{}/api/pipeline/{}/definition", self.base_url, pipeline_id);
        let payload = DefinitionPayload {
            objects: objects.to_vec(),
        };
        let response = self.request(Method::PUT, &url).json(&payload).send().await?;
        Self::handle_response(response).await
    }

    async fn activate(&self, pipeline_id: &str) -> Result<()> {
        let url = format!("{}/api/pipeline/{}/activate", self.base_url, pipeline_id);
        let response = self.request(Method::POST, &url).send().await?;
        Self::handle_empty_response(response).await
    }
}
