// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper bound to a single collection endpoint.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder};

use crate::config::{AuthMethod, CalDavConfig, Endpoint};
use crate::error::CalDavError;
use crate::status::classify;

/// HTTP client for `CalDAV` operations against one endpoint.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    endpoint: Endpoint,
}

/// Status, headers and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Passes the response through if its status is a success.
    ///
    /// # Errors
    ///
    /// Returns the classified error for any non-2xx status.
    pub fn error_for_status(self) -> Result<Self, CalDavError> {
        match classify(self.status) {
            Ok(()) => Ok(self),
            Err(err) => {
                tracing::warn!(status = self.status, %err, "request failed");
                Err(err)
            }
        }
    }
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or HTTP client creation fails.
    pub fn new(config: &CalDavConfig) -> Result<Self, CalDavError> {
        let endpoint = Endpoint::from_config(config)?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Returns the endpoint this client talks to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Sends one request to the collection URL and collects the response.
    ///
    /// The status code is not interpreted here.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read.
    pub async fn execute(
        &self,
        method: Method,
        headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<RawResponse, CalDavError> {
        let url = self.endpoint.collection_url();
        let mut req = self.build_request(method.clone(), &url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.text().await?;
        tracing::debug!(%method, url = %url, status, "CalDAV request completed");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Builds a request with authentication headers.
    fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.client.request(method, url);

        match self.endpoint.auth() {
            AuthMethod::Basic { username, password } => req.basic_auth(username, Some(password)),
            AuthMethod::Bearer { token } => req.bearer_auth(token),
            AuthMethod::None => req,
        }
    }
}

/// Resolves a WebDAV extension method such as `PROPFIND` or `MKCALENDAR`.
///
/// # Errors
///
/// Returns an error if the name is not a valid HTTP token.
pub fn dav_method(name: &str) -> Result<Method, CalDavError> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| CalDavError::Http(format!("Invalid method {name}: {e}")))
}
