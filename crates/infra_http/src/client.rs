//! Shared HTTP client and per-system endpoints
//!
//! [`HttpClient`] owns the connection pool. [`RestEndpoint`] binds it to one
//! external system: base URL, default headers, and the translation of
//! transport failures and HTTP statuses into [`PortError`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

use core_kernel::{ExternalSystemConfig, PortError};

use crate::config::HttpClientConfig;
use crate::error::HttpError;

/// Connection pool shared by every adapter
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// One external system reached through the shared client
#[derive(Debug, Clone)]
pub struct RestEndpoint {
    http: HttpClient,
    config: ExternalSystemConfig,
    headers: HeaderMap,
    service: &'static str,
}

impl RestEndpoint {
    /// Validates the base URL and default headers of the system
    pub fn new(
        http: HttpClient,
        config: ExternalSystemConfig,
        service: &'static str,
    ) -> Result<Self, HttpError> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(HttpError::InvalidBaseUrl {
                url: config.base_url.clone(),
                message: "expected an http:// or https:// URL".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::invalid_header(name, e))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| HttpError::invalid_header(name, e))?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            http,
            config,
            headers,
            service,
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .client
            .get(self.config.url(path))
            .headers(self.headers.clone())
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .client
            .post(self.config.url(path))
            .headers(self.headers.clone())
    }

    /// Sends a request, mapping transport failures
    pub async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response, PortError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        debug!(
            service = self.service,
            operation,
            status = response.status().as_u16(),
            "Response received"
        );
        Ok(response)
    }

    /// Sends a request and decodes a successful JSON body
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
        entity_id: impl std::fmt::Display,
    ) -> Result<T, PortError> {
        let response = self.send(request, operation).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, operation, entity_id));
        }
        self.decode_json(response, operation).await
    }

    /// Reads and decodes the body of a response
    pub async fn decode_json<T: DeserializeOwned>(
        &self,
        response: Response,
        operation: &str,
    ) -> Result<T, PortError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        trace!(service = self.service, operation, bytes = body.len(), "Decoding body");

        serde_json::from_slice(&body).map_err(|e| {
            PortError::transformation(format!("{} returned an unexpected body: {}", operation, e))
        })
    }

    /// Maps a non-success status to the matching port error
    pub fn status_error(
        &self,
        status: StatusCode,
        operation: &str,
        entity_id: impl std::fmt::Display,
    ) -> PortError {
        match status {
            StatusCode::NOT_FOUND => PortError::not_found(operation, entity_id),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
                message: format!("{} answered HTTP {}", self.service, status.as_u16()),
            },
            StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
                service: self.service.to_string(),
            },
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
                PortError::ServiceUnavailable {
                    service: self.service.to_string(),
                }
            }
            other => PortError::UnexpectedStatus {
                service: self.service.to_string(),
                status: other.as_u16(),
            },
        }
    }

    fn transport_error(&self, operation: &str, err: reqwest::Error) -> PortError {
        if err.is_timeout() {
            PortError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.http.timeout.as_millis() as u64,
            }
        } else if err.is_decode() {
            PortError::transformation(format!("{} returned an unreadable body: {}", operation, err))
        } else {
            PortError::connection_with_source(format!("{} request to {} failed", operation, self.service), err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(config: ExternalSystemConfig) -> Result<RestEndpoint, HttpError> {
        let http = HttpClient::new(&HttpClientConfig::default())?;
        RestEndpoint::new(http, config, "claims")
    }

    #[test]
    fn test_rejects_invalid_header() {
        let config = ExternalSystemConfig::new("http://localhost").with_header("Bad Header", "x");
        assert!(matches!(endpoint(config), Err(HttpError::InvalidHeader { .. })));
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let config = ExternalSystemConfig::new("internal-api.example.com");
        assert!(matches!(endpoint(config), Err(HttpError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_status_mapping() {
        let endpoint = endpoint(ExternalSystemConfig::new("http://localhost")).unwrap();

        assert!(endpoint.status_error(StatusCode::NOT_FOUND, "claim lookup", 1).is_not_found());
        assert!(matches!(
            endpoint.status_error(StatusCode::FORBIDDEN, "claim lookup", 1),
            PortError::Unauthorized { .. }
        ));
        assert!(matches!(
            endpoint.status_error(StatusCode::SERVICE_UNAVAILABLE, "claim lookup", 1),
            PortError::ServiceUnavailable { .. }
        ));
        assert!(matches!(
            endpoint.status_error(StatusCode::INTERNAL_SERVER_ERROR, "claim lookup", 1),
            PortError::UnexpectedStatus { status: 500, .. }
        ));
    }
}
