//! HTTP transport for controller connectors.
//!
//! Wraps a `reqwest::Client` with URL building, authentication, status code
//! mapping and an optional bounded retry loop. Retries live here and nowhere
//! above: the page walker in [`crate::pagination`] never retries.

use crate::secure_string::SecureString;
use crate::traits::{AuthConfig, ConnectorConfig, ConnectorError, ConnectorResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Per-request overrides on top of the connector configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers for this request only.
    pub headers: Vec<(String, String)>,
    /// Credentials replacing the configured ones for this request.
    pub credentials: Option<(String, SecureString)>,
}

impl RequestOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, secret: SecureString) -> Self {
        self.credentials = Some((username.into(), secret));
        self
    }
}

/// `Authorization` value for the controller's XREST scheme.
pub(crate) fn xrest_authorization(username: &str, secret: &SecureString) -> String {
    let token = BASE64.encode(format!("{}:{}", username, secret.expose_secret()));
    format!("XREST {}", token)
}

/// HTTP client bound to one controller endpoint.
pub struct HttpClient {
    client: Client,
    config: ConnectorConfig,
}

impl HttpClient {
    /// Creates a new HTTP client from connector configuration.
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        if !config.verify_tls {
            warn!(
                base_url = %config.base_url,
                connector_name = %config.name,
                "TLS certificate verification disabled for controller endpoint"
            );
        }

        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                reqwest::header::HeaderName::try_from(key.as_str()),
                reqwest::header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, val);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .default_headers(headers)
            .build()
            .map_err(|e| ConnectorError::ConfigError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Builds a URL from a path.
    pub fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Executes a GET request.
    pub async fn get(&self, path: &str, options: &RequestOptions) -> ConnectorResult<Response> {
        let url = self.build_url(path);
        let request = self.apply_options(self.client.get(&url), options);
        self.execute_with_retry(request).await
    }

    /// Executes a GET request and deserializes a JSON array.
    ///
    /// `204 No Content` and an empty body both decode to an empty list; that
    /// is how the controller signals the end of a paginated collection.
    pub async fn get_json_list<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ConnectorResult<Vec<T>> {
        let response = self.get(path, options).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;
        parse_json_list(status, &text)
    }

    fn apply_options(&self, mut request: RequestBuilder, options: &RequestOptions) -> RequestBuilder {
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        match (&options.credentials, &self.config.auth) {
            (Some((username, secret)), _)
            | (None, AuthConfig::XRest {
                username,
                password: secret,
            }) => request.header(AUTHORIZATION, xrest_authorization(username, secret)),
            (None, AuthConfig::None) => request,
        }
    }

    /// Executes a request, retrying server errors and transport failures up to
    /// `max_retries` times.
    async fn execute_with_retry(&self, request: RequestBuilder) -> ConnectorResult<Response> {
        let mut last_error = None;
        let mut delay = Duration::from_millis(100);

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!("Retry attempt {} after {:?}", attempt, delay);
                sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }

            let request_clone = request
                .try_clone()
                .ok_or_else(|| ConnectorError::Internal("Failed to clone request".to_string()))?;

            match request_clone.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        return Err(ConnectorError::RateLimited(retry_after));
                    }

                    if status.is_server_error() {
                        last_error = Some(ConnectorError::RequestFailed(format!(
                            "Server error: {}",
                            status
                        )));
                        if attempt < self.config.max_retries {
                            warn!("Server error {}, retrying...", status);
                            continue;
                        }
                        break;
                    }

                    if status.is_client_error() {
                        return Err(map_client_error(status, response).await);
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        ConnectorError::Timeout(e.to_string())
                    } else if e.is_connect() {
                        ConnectorError::ConnectionFailed(e.to_string())
                    } else {
                        ConnectorError::RequestFailed(e.to_string())
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ConnectorError::Internal("Unknown error".to_string())))
    }
}

async fn map_client_error(status: StatusCode, response: Response) -> ConnectorError {
    match status {
        StatusCode::UNAUTHORIZED => ConnectorError::AuthenticationFailed("Unauthorized".into()),
        StatusCode::FORBIDDEN => ConnectorError::AuthorizationDenied("Forbidden".into()),
        StatusCode::NOT_FOUND => ConnectorError::NotFound("Resource not found".into()),
        StatusCode::BAD_REQUEST => {
            let body = response.text().await.unwrap_or_default();
            ConnectorError::RequestFailed(format!("Bad request: {}", body))
        }
        _ => ConnectorError::RequestFailed(format!("Client error: {}", status)),
    }
}

/// Decodes a JSON array body, treating an empty or blank body as no items.
pub(crate) fn parse_json_list<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
) -> ConnectorResult<Vec<T>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|e| {
        ConnectorError::InvalidResponse(format!(
            "Failed to parse response (status {}): {} - Body: {}",
            status,
            e,
            trimmed.chars().take(500).collect::<String>()
        ))
    })
}
