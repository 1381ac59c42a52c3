// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use reqwest::Url;

use crate::error::CalDavError;

/// `CalDAV` authentication method.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "type")]
pub enum AuthMethod {
    /// No authentication.
    #[serde(rename = "none")]
    #[default]
    None,
    /// Basic authentication (username/password).
    #[serde(rename = "basic")]
    Basic {
        /// Username for authentication.
        username: String,
        /// Password for authentication.
        password: String,
    },
    /// Bearer token authentication (OAuth).
    #[serde(rename = "bearer")]
    Bearer {
        /// Bearer token.
        token: String,
    },
}

/// `CalDAV` collection configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CalDavConfig {
    /// Absolute URL of the collection (a calendar, or a principal for discovery).
    pub url: String,
    /// Authentication method.
    #[serde(default)]
    pub auth: AuthMethod,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("sabredav-caldav/", env!("CARGO_PKG_VERSION")).to_string()
}

impl CalDavConfig {
    /// Creates a configuration for `url` with default settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Returns a copy of this configuration pointing at another URL.
    ///
    /// Credentials, timeout and user agent are kept.
    #[must_use]
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }
}

impl Default for CalDavConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth: AuthMethod::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// URL scheme of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// Returns the scheme as written in URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single collection endpoint: where requests go and how they authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_uri: String,
    host: String,
    scheme: Scheme,
    auth: AuthMethod,
}

impl Endpoint {
    /// Validates the configured URL and builds the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::Config`] if the URL does not parse, is not
    /// `http`/`https`, or has no host.
    pub fn from_config(config: &CalDavConfig) -> Result<Self, CalDavError> {
        let url = Url::parse(&config.url)
            .map_err(|e| CalDavError::Config(format!("invalid URL '{}': {e}", config.url)))?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(CalDavError::Config(format!(
                    "unsupported URL scheme '{other}'"
                )));
            }
        };

        let host = url
            .host_str()
            .ok_or_else(|| CalDavError::Config(format!("URL '{}' has no host", config.url)))?;
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            base_uri: config.url.trim_end_matches('/').to_string(),
            host,
            scheme,
            auth: config.auth.clone(),
        })
    }

    /// Returns the base URI without a trailing slash.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the host, including a non-default port.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the URL scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the credentials used for this endpoint.
    #[must_use]
    pub const fn auth(&self) -> &AuthMethod {
        &self.auth
    }

    /// Returns `scheme://host`, the prefix for absolutizing server hrefs.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Returns the URL requests are sent to: the base URI with one trailing slash.
    #[must_use]
    pub fn collection_url(&self) -> String {
        format!("{}/", self.base_uri)
    }

    /// Turns a server-relative href into an absolute URL, dropping one trailing slash.
    #[must_use]
    pub fn absolute_url(&self, href: &str) -> String {
        let href = href.strip_suffix('/').unwrap_or(href);
        format!("{}{href}", self.origin())
    }
}
