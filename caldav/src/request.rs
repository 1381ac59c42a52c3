// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request builders for `CalDAV` operations.

use std::fmt;
use std::str::FromStr;

use crate::error::CalDavError;
use crate::xml::{DocumentWriter, Namespace};

/// A property that can be requested with PROPFIND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prop {
    key: &'static str,
    namespace: Namespace,
}

impl Prop {
    const fn new(key: &'static str, namespace: Namespace) -> Self {
        Self { key, namespace }
    }

    /// Returns the snake_case key, e.g. `sync_token`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        self.key
    }

    /// Returns the namespace the property lives in.
    #[must_use]
    pub const fn namespace(self) -> Namespace {
        self.namespace
    }

    /// Returns the XML local name, e.g. `sync-token`.
    #[must_use]
    pub fn element_name(self) -> String {
        self.key.replace('_', "-")
    }
}

/// The properties a PROPFIND call site may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySet {
    /// Calendar collection metadata: `displayname`, `sync_token`, `getctag`.
    Calendar,
    /// Principal discovery: `calendar_home_set`.
    Principal,
}

const CALENDAR_PROPS: &[Prop] = &[
    Prop::new("displayname", Namespace::Dav),
    Prop::new("sync_token", Namespace::Dav),
    Prop::new("getctag", Namespace::CalendarServer),
];

const PRINCIPAL_PROPS: &[Prop] = &[Prop::new("calendar_home_set", Namespace::CalDav)];

impl PropertySet {
    /// Returns the properties known to this set.
    #[must_use]
    pub const fn known(self) -> &'static [Prop] {
        match self {
            Self::Calendar => CALENDAR_PROPS,
            Self::Principal => PRINCIPAL_PROPS,
        }
    }

    /// Looks up a property by its snake_case key.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::PropertyNotSupported`] if the key is not in this set.
    pub fn lookup(self, key: &str) -> Result<Prop, CalDavError> {
        self.known()
            .iter()
            .copied()
            .find(|p| p.key == key)
            .ok_or_else(|| {
                let known: Vec<_> = self.known().iter().map(|p| p.key).collect();
                CalDavError::PropertyNotSupported(format!(
                    "{key} (known properties: {})",
                    known.join(", ")
                ))
            })
    }

    const fn namespaces(self) -> &'static [Namespace] {
        match self {
            Self::Calendar => &[Namespace::Dav, Namespace::CalendarServer],
            Self::Principal => &[Namespace::Dav, Namespace::CalDav],
        }
    }
}

/// PROPFIND request builder.
#[derive(Debug)]
pub struct PropFindRequest {
    set: PropertySet,
    props: Vec<Prop>,
}

impl PropFindRequest {
    /// Creates an empty PROPFIND request for a property set.
    #[must_use]
    pub const fn new(set: PropertySet) -> Self {
        Self {
            set,
            props: Vec::new(),
        }
    }

    /// Creates a PROPFIND request for `keys`, validating all of them first.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::PropertyNotSupported`] for the first unknown key.
    pub fn with_properties(set: PropertySet, keys: &[&str]) -> Result<Self, CalDavError> {
        let props = keys
            .iter()
            .map(|key| set.lookup(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { set, props })
    }

    /// Adds a property to the request.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::PropertyNotSupported`] if the key is not in the set.
    pub fn add_property(&mut self, key: &str) -> Result<&mut Self, CalDavError> {
        let prop = self.set.lookup(key)?;
        self.props.push(prop);
        Ok(self)
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CalDavError> {
        let mut doc = DocumentWriter::new(Namespace::Dav, "propfind", self.set.namespaces())?;
        doc.open(Namespace::Dav, "prop")?;
        for prop in &self.props {
            doc.empty(prop.namespace, &prop.element_name())?;
        }
        doc.close(Namespace::Dav, "prop")?;
        doc.finish(Namespace::Dav, "propfind")
    }
}

/// MKCALENDAR request builder.
#[derive(Debug, Default)]
pub struct MkCalendarRequest {
    display_name: String,
    description: Option<String>,
}

impl MkCalendarRequest {
    /// Creates a new MKCALENDAR request.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: None,
        }
    }

    /// Sets the calendar description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the XML body for the MKCALENDAR request.
    ///
    /// Empty display names and descriptions are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CalDavError> {
        let mut doc = DocumentWriter::new(
            Namespace::CalDav,
            "mkcalendar",
            &[Namespace::Dav, Namespace::CalDav],
        )?;
        doc.open(Namespace::Dav, "set")?.open(Namespace::Dav, "prop")?;
        if !self.display_name.is_empty() {
            doc.text(Namespace::Dav, "displayname", &self.display_name)?;
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            doc.text(Namespace::CalDav, "calendar-description", desc)?;
        }
        doc.close(Namespace::Dav, "prop")?.close(Namespace::Dav, "set")?;
        doc.finish(Namespace::CalDav, "mkcalendar")
    }
}

/// PROPPATCH request builder for calendar properties.
#[derive(Debug, Default)]
pub struct PropPatchRequest {
    display_name: Option<String>,
    description: Option<String>,
}

impl PropPatchRequest {
    /// Creates a PROPPATCH request that changes nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            display_name: None,
            description: None,
        }
    }

    /// Sets a new display name.
    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the XML body for the PROPPATCH request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CalDavError> {
        let mut doc = DocumentWriter::new(
            Namespace::Dav,
            "propertyupdate",
            &[Namespace::Dav, Namespace::CalDav],
        )?;
        doc.open(Namespace::Dav, "set")?.open(Namespace::Dav, "prop")?;
        if let Some(name) = &self.display_name {
            doc.text(Namespace::Dav, "displayname", name)?;
        }
        if let Some(desc) = &self.description {
            doc.text(Namespace::CalDav, "calendar-description", desc)?;
        }
        doc.close(Namespace::Dav, "prop")?.close(Namespace::Dav, "set")?;
        doc.finish(Namespace::Dav, "propertyupdate")
    }
}

/// `sync-collection` REPORT request builder (RFC 6578).
#[derive(Debug)]
pub struct SyncCollectionRequest {
    sync_token: String,
}

impl SyncCollectionRequest {
    /// Creates a report asking for changes since `sync_token`.
    #[must_use]
    pub fn new(sync_token: impl Into<String>) -> Self {
        Self {
            sync_token: sync_token.into(),
        }
    }

    /// Builds the XML body for the REPORT request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CalDavError> {
        let mut doc = DocumentWriter::new(Namespace::Dav, "sync-collection", &[Namespace::Dav])?;
        doc.text(Namespace::Dav, "sync-token", &self.sync_token)?
            .text(Namespace::Dav, "sync-level", "1")?
            .open(Namespace::Dav, "prop")?
            .empty(Namespace::Dav, "getetag")?
            .close(Namespace::Dav, "prop")?;
        doc.finish(Namespace::Dav, "sync-collection")
    }
}

/// PROPFIND request for the `cs:invite` property (sharing state).
#[derive(Debug, Clone, Copy, Default)]
pub struct InviteRequest;

impl InviteRequest {
    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(self) -> Result<String, CalDavError> {
        let mut doc = DocumentWriter::new(
            Namespace::Dav,
            "propfind",
            &[Namespace::Dav, Namespace::CalendarServer],
        )?;
        doc.open(Namespace::Dav, "prop")?
            .empty(Namespace::CalendarServer, "invite")?
            .close(Namespace::Dav, "prop")?;
        doc.finish(Namespace::Dav, "propfind")
    }
}

/// Access granted to a sharee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Privilege {
    /// Read-only access.
    Read,
    /// Read and write access.
    #[default]
    ReadWrite,
}

impl Privilege {
    /// Returns the `cs` element name for the privilege.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ReadWrite => "read-write",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = CalDavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "read-write" | "write-read" => Ok(Self::ReadWrite),
            _ => Err(CalDavError::UnsupportedPrivilege(s.to_string())),
        }
    }
}

/// Kind of sharee addresses in a share request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShareeType {
    /// Email addresses, sent as `mailto:` hrefs. The only supported type.
    #[default]
    Email,
    /// Any other address type.
    Other(String),
}

impl FromStr for ShareeType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "email" => Self::Email,
            other => Self::Other(other.to_string()),
        })
    }
}

/// POST body for sharing a calendar (`CalendarServer` sharing extension).
#[derive(Debug, Clone, Default)]
pub struct ShareRequest {
    adds: Vec<String>,
    removes: Vec<String>,
    summary: Option<String>,
    common_name: Option<String>,
    privilege: Privilege,
    sharee_type: Option<ShareeType>,
}

impl ShareRequest {
    /// Creates an empty share request granting read-write access.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares the calendar with `address`.
    #[must_use]
    pub fn add(mut self, address: impl Into<String>) -> Self {
        self.adds.push(address.into());
        self
    }

    /// Revokes the share of `address`.
    #[must_use]
    pub fn remove(mut self, address: impl Into<String>) -> Self {
        self.removes.push(address.into());
        self
    }

    /// Sets the invitation summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the common name sent with every added sharee.
    #[must_use]
    pub fn common_name(mut self, common_name: impl Into<String>) -> Self {
        self.common_name = Some(common_name.into());
        self
    }

    /// Sets the access granted to added sharees.
    #[must_use]
    pub const fn privilege(mut self, privilege: Privilege) -> Self {
        self.privilege = privilege;
        self
    }

    /// Declares the type of the sharee addresses.
    #[must_use]
    pub fn sharee_type(mut self, sharee_type: ShareeType) -> Self {
        self.sharee_type = Some(sharee_type);
        self
    }

    /// Checks that the sharee type, if given, is supported.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::UnsupportedShareeType`] for anything but email.
    pub fn validate(&self) -> Result<(), CalDavError> {
        match &self.sharee_type {
            None | Some(ShareeType::Email) => Ok(()),
            Some(ShareeType::Other(kind)) => Err(CalDavError::UnsupportedShareeType(kind.clone())),
        }
    }

    /// Builds the XML body for the POST request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CalDavError> {
        let mut doc = DocumentWriter::new(
            Namespace::CalendarServer,
            "share",
            &[Namespace::Dav, Namespace::CalendarServer],
        )?;

        for address in &self.adds {
            doc.open(Namespace::CalendarServer, "set")?
                .text(Namespace::Dav, "href", &mailto(address))?;
            if let Some(name) = &self.common_name {
                doc.text(Namespace::CalendarServer, "common-name", name)?;
            }
            if let Some(summary) = &self.summary {
                doc.text(Namespace::CalendarServer, "summary", summary)?;
            }
            doc.empty(Namespace::CalendarServer, self.privilege.as_str())?
                .close(Namespace::CalendarServer, "set")?;
        }

        for address in &self.removes {
            doc.open(Namespace::CalendarServer, "remove")?
                .text(Namespace::Dav, "href", &mailto(address))?
                .close(Namespace::CalendarServer, "remove")?;
        }

        doc.finish(Namespace::CalendarServer, "share")
    }
}

/// Prefixes bare addresses with `mailto:`; values that already carry a URI
/// scheme are kept.
fn mailto(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("mailto:{address}")
    }
}
