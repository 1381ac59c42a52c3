// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` client for managing calendar collections on `SabreDAV`-style servers.
//!
//! The crate translates calendar-level operations (discovery, info, creation,
//! property updates, deletion, sharing and `sync-collection` based incremental
//! sync) into WebDAV/`CalDAV` requests and parses the multi-status answers back
//! into typed records. Every operation is a single round trip:
//! build the XML body, send it, classify the HTTP status, parse the response.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod client;
mod config;
mod error;
mod http;
mod request;
mod response;
mod status;
mod types;
mod xml;

pub use crate::client::CalendarClient;
pub use crate::config::{AuthMethod, CalDavConfig, Endpoint, Scheme};
pub use crate::error::CalDavError;
pub use crate::http::{HttpClient, RawResponse};
pub use crate::request::{
    InviteRequest, MkCalendarRequest, Privilege, Prop, PropFindRequest, PropPatchRequest,
    PropertySet, ShareRequest, ShareeType, SyncCollectionRequest,
};
pub use crate::response::{
    Invite, MultiStatusResponse, PropStat, Properties, ResponseItem, STATUS_NOT_FOUND,
};
pub use crate::status::classify;
pub use crate::types::{
    CalendarInfo, ChangeEntry, ChangeSet, ETag, Href, InviteStatus, Organizer, ShareeInfo,
    Sharees,
};
pub use crate::xml::Namespace;
