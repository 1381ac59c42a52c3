// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

/// Resource href (path).
///
/// A `Href` is the server-relative path of a resource, such as
/// `/calendars/user/work/event1.ics`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Href(String);

impl Href {
    /// Creates a new `Href` from a string.
    #[must_use]
    pub const fn new(href: String) -> Self {
        Self(href)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last non-empty path segment, e.g. `event1.ics`.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).next_back()
    }
}

impl Deref for Href {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Href {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Href {
    fn from(href: String) -> Self {
        Self(href)
    }
}

impl From<&str> for Href {
    fn from(href: &str) -> Self {
        Self(href.to_string())
    }
}

/// Entity tag for change detection.
///
/// An `ETag` is an opaque content version returned by the server, used for
/// optimistic concurrency and change detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ETag(String);

impl ETag {
    /// Creates a new `ETag` from a string.
    #[must_use]
    pub const fn new(etag: String) -> Self {
        Self(etag)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strips one pair of enclosing quotes (`"..."` or `'...'`).
    ///
    /// Values without matching quotes at both ends, such as weak tags
    /// (`W/"abc"`), are returned unchanged.
    #[must_use]
    pub fn unquoted(self) -> Self {
        let inner = ['"', '\''].into_iter().find_map(|quote| {
            self.0
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
                .map(str::to_string)
        });
        inner.map_or(self, Self)
    }
}

impl Deref for ETag {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ETag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ETag {
    fn from(etag: String) -> Self {
        Self(etag)
    }
}

impl From<&str> for ETag {
    fn from(etag: &str) -> Self {
        Self(etag.to_string())
    }
}

/// Metadata of a calendar collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarInfo {
    /// The display name of the calendar.
    pub display_name: String,
    /// Token to pass to the next incremental sync.
    pub sync_token: String,
    /// The collection tag (`CTag`).
    pub ctag: String,
    /// Absolute URL of the calendar, without a trailing slash.
    pub url: String,
    /// HTTP status reported for the entry's properties.
    pub status: u16,
}

/// A resource created or modified since the previous sync token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    /// Last path segment of the resource href.
    pub uri: String,
    /// Entity tag, with enclosing quotes removed.
    pub etag: ETag,
}

/// Result of an incremental `sync-collection` report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// Changed resources in document order.
    pub changes: Vec<ChangeEntry>,
    /// Identifiers of deleted resources in document order.
    pub deletions: Vec<String>,
    /// Token for the next incremental sync.
    pub sync_token: String,
}

/// Invitation status of a sharee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InviteStatus {
    /// The sharee accepted the invitation.
    Accepted,
}

/// A principal the calendar is shared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareeInfo {
    /// The sharee href, usually a `mailto:` URI.
    pub href: String,
    /// Access level, e.g. `read` or `read-write`.
    pub access: String,
    /// Invitation status, `None` when not accepted.
    pub status: Option<InviteStatus>,
    /// Common name, when the server supplies it.
    pub common_name: Option<String>,
    /// Calendar URI of the share, when the server supplies it.
    pub uri: Option<String>,
    /// Principal of the sharee, when the server supplies it.
    pub principal: Option<String>,
}

/// Owner of a shared calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organizer {
    /// The organizer href.
    pub href: String,
    /// Calendar URI, when the server supplies it.
    pub uri: Option<String>,
}

/// Sharing state of a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sharees {
    /// The calendar owner.
    pub organizer: Organizer,
    /// Everyone the calendar is shared with, in document order.
    pub sharees: Vec<ShareeInfo>,
}
