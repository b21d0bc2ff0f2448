//! REST client for the dashboard API.
//!
//! Wraps the preference, config, template and default endpoints using
//! [`reqwest`]. Successful responses arrive in a `{ success, data }`
//! envelope which is unwrapped here.

use std::time::Duration;

use grantboard_core::capability::Capability;
use grantboard_core::preferences::{UpdateDashboardPreferences, UserDashboardPreferences};
use grantboard_core::widget::{DashboardCategory, DashboardConfig};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;

/// HTTP client for one dashboard API server.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

/// Errors from the dashboard REST client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Dashboard API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body was not a successful envelope.
    #[error("Malformed response envelope: {0}")]
    Envelope(String),

    /// The client was configured with unusable settings.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// A template as listed by `GET /api/dashboard/templates`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: DashboardCategory,
    pub required_capabilities: Vec<Capability>,
    pub config: DashboardConfig,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl DashboardApi {
    /// Build a client from `config`, applying its timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_client(client, config)
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// `GET /api/dashboard/preferences`
    pub async fn get_preferences(&self) -> Result<UserDashboardPreferences, ClientError> {
        let url = self.endpoint(&["preferences"]);
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::parse_envelope(response).await
    }

    /// `PUT /api/dashboard/preferences`
    pub async fn update_preferences(
        &self,
        patch: &UpdateDashboardPreferences,
    ) -> Result<UserDashboardPreferences, ClientError> {
        let url = self.endpoint(&["preferences"]);
        let response = self
            .authorized(self.client.put(url))
            .json(patch)
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    /// `DELETE /api/dashboard/preferences`
    pub async fn reset_preferences(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&["preferences"]);
        let response = self.authorized(self.client.delete(url)).send().await?;
        Self::check_status(response).await
    }

    /// `GET /api/dashboard/config/{dashboard_id}`
    pub async fn get_config(&self, dashboard_id: &str) -> Result<DashboardConfig, ClientError> {
        let url = self.endpoint(&["config", dashboard_id]);
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::parse_envelope(response).await
    }

    /// `PUT /api/dashboard/config/{dashboard_id}`
    pub async fn save_config(
        &self,
        config: &DashboardConfig,
    ) -> Result<DashboardConfig, ClientError> {
        let url = self.endpoint(&["config", &config.id]);
        let response = self
            .authorized(self.client.put(url))
            .json(config)
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    /// `GET /api/dashboard/templates`
    pub async fn list_templates(&self) -> Result<Vec<TemplateInfo>, ClientError> {
        let url = self.endpoint(&["templates"]);
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::parse_envelope(response).await
    }

    /// `GET /api/dashboard/default`
    pub async fn get_default(&self) -> Result<DashboardConfig, ClientError> {
        let url = self.endpoint(&["default"]);
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::parse_envelope(response).await
    }

    // ---- private helpers ----

    /// `{base}/api/dashboard/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "dashboard"]).extend(segments);
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or [`ClientError::Api`] with the status and body
    /// text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful `{ success, data }` body into the expected type.
    async fn parse_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let envelope = response.json::<Envelope<T>>().await?;
        match envelope {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope { error, .. } => Err(ClientError::Envelope(
                error.unwrap_or_else(|| "response carried no data".to_string()),
            )),
        }
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn api(base: &str) -> DashboardApi {
        DashboardApi::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn endpoint_joins_and_encodes_segments() {
        let api = api("http://localhost:3000");
        assert_eq!(
            api.endpoint(&["config", "my board"]).as_str(),
            "http://localhost:3000/api/dashboard/config/my%20board"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let api = api("http://gateway.local/grants/");
        assert_eq!(
            api.endpoint(&["preferences"]).as_str(),
            "http://gateway.local/grants/api/dashboard/preferences"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = DashboardApi::new(&ClientConfig::new("not a url")).unwrap_err();
        assert_matches!(err, ClientError::Config(_));

        let err = DashboardApi::new(&ClientConfig::new("mailto:ops@example.org")).unwrap_err();
        assert_matches!(err, ClientError::Config(_));
    }
}
