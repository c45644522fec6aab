//! HTTP implementation of the listings backend.
//!
//! [`HttpBackend`] wraps a `reqwest::Client` built once with the configured
//! timeout. Responses are classified into the crate error type:
//!
//! - no response at all: [`HomescoutError::Network`]
//! - non-2xx status: [`HomescoutError::Api`] with the `{"error": ...}` string, if any
//! - 2xx with a body that does not match the contract: [`HomescoutError::Decode`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use tracing::Instrument;

use super::backend::Backend;
use super::models::{
    ErrorBody, FavoriteToggleResponse, PropertiesEnvelope, SaveSettingsRequest, SavedSettings,
    SettingsEnvelope,
};
use crate::domain::error::{HomescoutError, Result};
use crate::domain::{Property, Settings};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds a backend client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HomescoutError::Config`] if `base_url` is not an absolute
    /// `http`/`https` URL or the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use homescout::api::HttpBackend;
    /// use std::time::Duration;
    ///
    /// let backend = HttpBackend::new("http://localhost:5000", Duration::from_secs(30))?;
    /// assert_eq!(backend.base_url().as_str(), "http://localhost:5000/");
    /// # Ok::<(), homescout::HomescoutError>(())
    /// ```
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url: Url = base_url
            .trim()
            .parse()
            .map_err(|err| HomescoutError::Config(format!("invalid API URL '{base_url}': {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(HomescoutError::Config(format!(
                "API URL '{base_url}' must be an absolute http(s) URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| HomescoutError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HomescoutError::Config(format!("API URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and returns the raw body of a 2xx response.
    async fn execute(&self, method: Method, segments: &[&str], body: Option<&SaveSettingsRequest>) -> Result<Vec<u8>> {
        let url = self.endpoint(segments)?;
        let span = tracing::debug_span!("backend_request", %method, path = url.path());

        async move {
            let mut request = self.client.request(method, url);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|err| {
                tracing::debug!(error = %err, "request failed before a response");
                HomescoutError::Network(err.to_string())
            })?;

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|err| HomescoutError::Network(err.to_string()))?;

            if !status.is_success() {
                let message = serde_json::from_slice::<ErrorBody>(&bytes)
                    .ok()
                    .and_then(|body| body.error);
                tracing::debug!(status = status.as_u16(), message = ?message, "backend returned an error");
                return Err(HomescoutError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "backend responded");
            Ok(bytes.to_vec())
        }
        .instrument(span)
        .await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&SaveSettingsRequest>,
    ) -> Result<T> {
        let bytes = self.execute(method, segments, body).await?;
        serde_json::from_slice(&bytes).map_err(|err| HomescoutError::Decode(err.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        let envelope: PropertiesEnvelope = self.fetch(Method::GET, &["properties"], None).await?;
        Ok(envelope.properties)
    }

    async fn list_favorites(&self) -> Result<Vec<Property>> {
        let envelope: PropertiesEnvelope = self
            .fetch(Method::GET, &["properties", "favorites"], None)
            .await?;
        Ok(envelope.properties)
    }

    async fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let response: FavoriteToggleResponse = self
            .fetch(Method::PUT, &["properties", "favorite", id], None)
            .await?;
        Ok(response.favorited)
    }

    async fn get_settings(&self) -> Result<Settings> {
        let envelope: SettingsEnvelope = self.fetch(Method::GET, &["settings"], None).await?;
        Ok(envelope.settings)
    }

    async fn save_settings(&self, settings: &Settings) -> Result<SavedSettings> {
        let body = SaveSettingsRequest::from(settings);
        self.fetch(Method::PUT, &["settings"], Some(&body)).await
    }

    async fn manual_scrape(&self) -> Result<()> {
        self.execute(Method::POST, &["manual-scrape"], None).await?;
        Ok(())
    }
}
