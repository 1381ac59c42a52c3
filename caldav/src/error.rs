// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// `CalDAV` client errors.
///
/// The first six variants are derived from the HTTP status of a response (see
/// [`classify`](crate::classify)); the rest come from the client itself.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalDavError {
    /// Resource not found (404).
    #[error("Resource not found")]
    NotFound,

    /// Access to the resource is forbidden (403).
    #[error("Access forbidden")]
    Forbidden,

    /// The request conflicts with the current state of the resource (409).
    #[error("Conflict with the current state of the resource")]
    Conflict,

    /// Precondition failed (412), e.g. `ETag` mismatch or an existing resource.
    #[error("Precondition failed")]
    PreconditionFailed,

    /// Server-side failure (5xx).
    #[error("Server error: HTTP {0}")]
    ServerError(u16),

    /// Any other non-success status code.
    #[error("Unexpected HTTP status: {0}")]
    UnknownStatus(u16),

    /// A successful response lacks an element the operation requires.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A PROPFIND was asked for a property outside the known set.
    #[error("Property not supported: {0}")]
    PropertyNotSupported(String),

    /// Sharing was requested for a sharee type other than email.
    #[error("Sharee type not supported: {0}")]
    UnsupportedShareeType(String),

    /// A sharee privilege other than `read` or `read-write` was named.
    #[error("Privilege not supported: {0} (expected read or read-write)")]
    UnsupportedPrivilege(String),

    /// HTTP layer error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// XML parsing/writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalDavError {
    pub(crate) fn missing(element: &str) -> Self {
        Self::MalformedResponse(format!("missing <{element}> element"))
    }
}

impl From<reqwest::Error> for CalDavError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<quick_xml::Error> for CalDavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for CalDavError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}
