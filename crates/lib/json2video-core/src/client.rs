//! HTTP client for the json2video v2 API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::UpstreamError;
use crate::request::JsonObject;

pub const DEFAULT_API_BASE: &str = "https://api.json2video.com/v2";

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Serialize)]
struct NewTemplate<'a> {
    name: &'a str,
    description: &'a str,
}

/// Thin wrapper over the upstream REST endpoints.
///
/// Every call returns the decoded JSON body untouched; deciding whether it
/// represents success is left to the caller.
#[derive(Debug, Clone)]
pub struct Json2VideoClient {
    http: Client,
    base_url: String,
}

impl Json2VideoClient {
    /// Creates a client against `base_url` with default transport settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    /// Creates a client with an overall request timeout.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| UpstreamError::transport(err.to_string()))?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// `POST /movies`
    ///
    /// # Errors
    /// Returns transport and decoding failures.
    pub async fn create_movie(
        &self,
        api_key: &str,
        movie: &JsonObject,
    ) -> Result<Value, UpstreamError> {
        let request = self.http.post(self.url("movies")).json(movie);
        Self::send(request, api_key).await
    }

    /// `GET /movies?project=<id>`
    ///
    /// # Errors
    /// Returns transport and decoding failures.
    pub async fn get_movie(&self, api_key: &str, project: &str) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .get(self.url("movies"))
            .query(&[("project", project)]);
        Self::send(request, api_key).await
    }

    /// `POST /templates`
    ///
    /// # Errors
    /// Returns transport and decoding failures.
    pub async fn create_template(
        &self,
        api_key: &str,
        name: &str,
        description: &str,
    ) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .post(self.url("templates"))
            .json(&NewTemplate { name, description });
        Self::send(request, api_key).await
    }

    /// `GET /templates`
    ///
    /// # Errors
    /// Returns transport and decoding failures.
    pub async fn list_templates(&self, api_key: &str) -> Result<Value, UpstreamError> {
        let request = self
            .http
            .get(self.url("templates"))
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        Self::send(request, api_key).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn send(request: RequestBuilder, api_key: &str) -> Result<Value, UpstreamError> {
        let response = request
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|err| UpstreamError::transport(format!("json2video request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| UpstreamError::transport(format!("json2video response unreadable: {err}")))?;
        debug!(%status, bytes = body.len(), "json2video response received");

        // Non-2xx bodies still go through the success check so their payload is kept.
        serde_json::from_str(&body).map_err(|_| UpstreamError::malformed(&body))
    }
}
