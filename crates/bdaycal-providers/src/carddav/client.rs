//! HTTP client for remote contact fetches.
//!
//! This module provides the low-level HTTP client that handles:
//! - Basic authentication
//! - GET and REPORT methods
//! - TLS configuration and a bounded request timeout

use base64::Engine;
use reqwest::{Client, Method, Response, StatusCode};
use tracing::{debug, trace, warn};

use crate::error::{SourceError, SourceResult};

use super::config::CardDavConfig;

/// HTTP client for remote contact operations.
pub struct CardDavClient {
    /// The underlying HTTP client.
    client: Client,
    /// Configuration.
    config: CardDavConfig,
}

impl CardDavClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: CardDavConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SourceError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Performs a GET request.
    pub async fn get(&self, url: &str) -> SourceResult<String> {
        self.request(Method::GET, url, None).await
    }

    /// Performs a REPORT request.
    ///
    /// Used for addressbook-query.
    pub async fn report(&self, url: &str, body: &str) -> SourceResult<String> {
        let method = Method::from_bytes(b"REPORT")
            .map_err(|_| SourceError::internal("Invalid HTTP method: REPORT"))?;
        self.request(method, url, Some(body)).await
    }

    /// Performs an HTTP request with a single authentication retry.
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
    ) -> SourceResult<String> {
        // First attempt, unauthenticated
        let response = self.send_request(method.clone(), url, body, None).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.config.has_credentials() {
            debug!("Received 401, retrying with Basic credentials");
            let auth = match (&self.config.username, &self.config.password) {
                (Some(u), Some(p)) => basic_auth(u, p),
                _ => {
                    return Err(SourceError::authentication(
                        "Credentials required but not configured",
                    ));
                }
            };
            let response = self.send_request(method, url, body, Some(auth)).await?;
            return self.handle_response(response).await;
        }

        self.handle_response(response).await
    }

    /// Sends a request, optionally with an Authorization header.
    async fn send_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&str>,
        auth: Option<String>,
    ) -> SourceResult<Response> {
        let mut request = self.client.request(method.clone(), url);

        // Set Content-Type and Depth for XML report bodies
        if body.is_some() {
            request = request
                .header("Content-Type", "application/xml; charset=utf-8")
                .header("Depth", "1");
        }

        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }

        if let Some(b) = body {
            request = request.body(b.to_string());
        }

        trace!(method = %method, url = %url, "Sending request");

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::network(format!("Request timed out: {}", e))
            } else {
                SourceError::network(format!("Request failed: {}", e))
            }
        })
    }

    /// Handles the HTTP response and extracts the body.
    ///
    /// Any status at or above 400 is a failure.
    async fn handle_response(&self, response: Response) -> SourceResult<String> {
        let status = response.status();
        trace!(status = %status, "Received response");

        match status {
            StatusCode::OK | StatusCode::MULTI_STATUS => response
                .text()
                .await
                .map_err(|e| SourceError::network(format!("Failed to read response: {}", e))),
            StatusCode::UNAUTHORIZED => Err(SourceError::authentication(
                "Authentication failed: invalid credentials",
            )),
            StatusCode::FORBIDDEN => Err(SourceError::authentication(
                "Access denied to the address book",
            )),
            StatusCode::NOT_FOUND => Err(SourceError::not_found(
                "Address book or contact file not found",
            )),
            s if s.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(SourceError::server(format!(
                    "Server error ({}): {}",
                    s, body
                )))
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %s, body = %body, "Unexpected response status");
                Err(SourceError::invalid_response(format!(
                    "Unexpected status {}: {}",
                    s, body
                )))
            }
        }
    }

    /// Returns the endpoint URL from the configuration.
    pub fn url(&self) -> &str {
        self.config.url_str()
    }
}

/// Builds an HTTP Basic Authorization header value (RFC 7617).
pub(crate) fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    format!("Basic {}", encoded)
}
