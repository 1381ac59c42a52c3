// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for WebDAV/CalDAV operations.

use quick_xml::events::Event;

use crate::config::Endpoint;
use crate::error::CalDavError;
use crate::types::{
    CalendarInfo, ChangeEntry, ChangeSet, ETag, Href, InviteStatus, Organizer, ShareeInfo,
    Sharees,
};
use crate::xml::{XmlReader, local_name, read_text, reader, skip_element, unexpected_eof};

/// Status line a `sync-collection` report uses for deleted members.
pub const STATUS_NOT_FOUND: &str = "HTTP/1.1 404 Not Found";

/// `WebDAV` multistatus response.
#[derive(Debug, Clone, Default)]
pub struct MultiStatusResponse {
    /// The response items, in document order.
    pub responses: Vec<ResponseItem>,
    /// Document-level sync token of a `sync-collection` report.
    pub sync_token: Option<String>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone, Default)]
pub struct ResponseItem {
    /// The resource href.
    pub href: Option<Href>,
    /// Response-level status line, present e.g. for deleted members.
    pub status: Option<String>,
    /// Property groups with their status.
    pub prop_stats: Vec<PropStat>,
}

/// Property stat with status and value.
#[derive(Debug, Clone, Default)]
pub struct PropStat {
    /// The properties of this group.
    pub props: Properties,
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
}

/// WebDAV/CalDAV properties this client reads.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// `d:displayname`.
    pub display_name: Option<String>,
    /// `d:sync-token`.
    pub sync_token: Option<String>,
    /// `cs:getctag`.
    pub ctag: Option<String>,
    /// `d:getetag`.
    pub etag: Option<ETag>,
    /// `c:calendar-description`.
    pub calendar_description: Option<String>,
    /// `c:calendar-home-set`.
    pub calendar_home_set: Option<Href>,
    /// `cs:invite`.
    pub invite: Option<Invite>,
}

/// Content of a `cs:invite` property.
#[derive(Debug, Clone, Default)]
pub struct Invite {
    /// The calendar owner.
    pub organizer: Option<Organizer>,
    /// The sharees.
    pub users: Vec<ShareeInfo>,
}

impl PropStat {
    /// Returns the numeric code of the status line (its second token).
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        status_code(&self.status)
    }

    fn is_success(&self) -> bool {
        self.status_code().is_some_and(|code| (200..300).contains(&code))
    }
}

impl ResponseItem {
    /// Returns the href.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::MalformedResponse`] if the entry has no href.
    pub fn href(&self) -> Result<&Href, CalDavError> {
        self.href.as_ref().ok_or_else(|| CalDavError::missing("href"))
    }

    /// Returns the first status line of the entry: the response-level one if
    /// present, otherwise the first propstat's.
    #[must_use]
    pub fn status_line(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or_else(|| self.prop_stats.first().map(|p| p.status.as_str()))
    }

    /// Returns the first propstat with a 2xx status.
    #[must_use]
    pub fn ok_props(&self) -> Option<&PropStat> {
        self.prop_stats.iter().find(|p| p.is_success())
    }
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails or the root is not `multistatus`.
    pub fn from_xml(xml: &str) -> Result<Self, CalDavError> {
        let mut reader = reader(xml);
        let mut multistatus = Self::default();
        let mut has_root = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match local_name(&e).as_str() {
                    "multistatus" if !has_root => has_root = true,
                    "response" if has_root => {
                        multistatus.responses.push(parse_response(&mut reader)?);
                    }
                    "sync-token" if has_root => {
                        multistatus.sync_token = Some(read_text(&mut reader)?);
                    }
                    _ => skip_element(&mut reader)?,
                },
                Event::Empty(e) => match local_name(&e).as_str() {
                    "multistatus" if !has_root => has_root = true,
                    "response" if has_root => {
                        multistatus.responses.push(ResponseItem::default());
                    }
                    "sync-token" if has_root => multistatus.sync_token = Some(String::new()),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if has_root {
            Ok(multistatus)
        } else {
            Err(CalDavError::missing("multistatus"))
        }
    }

    /// Converts the response of a calendar PROPFIND into the record of its first entry.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::MalformedResponse`] if there is no entry or the
    /// entry is incomplete.
    pub fn into_calendar_info(self, endpoint: &Endpoint) -> Result<CalendarInfo, CalDavError> {
        let response = self
            .responses
            .first()
            .ok_or_else(|| CalDavError::missing("response"))?;
        calendar_info(response, endpoint)
    }

    /// Extracts the absolute calendar home URL from a principal PROPFIND.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::MalformedResponse`] if no entry carries a
    /// `calendar-home-set` href.
    pub fn into_home_url(self, endpoint: &Endpoint) -> Result<String, CalDavError> {
        self.responses
            .iter()
            .flat_map(|r| &r.prop_stats)
            .find_map(|p| p.props.calendar_home_set.as_ref())
            .map(|href| endpoint.absolute_url(href))
            .ok_or_else(|| CalDavError::missing("calendar-home-set"))
    }

    /// Splits a `sync-collection` report into changes and deletions.
    ///
    /// An entry whose status line is [`STATUS_NOT_FOUND`] was deleted; every
    /// other entry was created or modified.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::MalformedResponse`] if an entry lacks its href,
    /// status or `ETag`, or the document has no sync token.
    pub fn into_change_set(self) -> Result<ChangeSet, CalDavError> {
        let mut changes = Vec::new();
        let mut deletions = Vec::new();

        for response in &self.responses {
            let uri = response
                .href()?
                .last_segment()
                .ok_or_else(|| CalDavError::MalformedResponse("empty href".to_string()))?
                .to_string();
            let status = response
                .status_line()
                .ok_or_else(|| CalDavError::missing("status"))?;

            if status == STATUS_NOT_FOUND {
                deletions.push(uri);
            } else {
                let etag = response
                    .prop_stats
                    .iter()
                    .find_map(|p| p.props.etag.clone())
                    .ok_or_else(|| CalDavError::missing("getetag"))?;
                changes.push(ChangeEntry {
                    uri,
                    etag: etag.unquoted(),
                });
            }
        }

        let sync_token = self
            .sync_token
            .ok_or_else(|| CalDavError::missing("sync-token"))?;

        Ok(ChangeSet {
            changes,
            deletions,
            sync_token,
        })
    }

    /// Extracts the organizer and sharees from a `cs:invite` PROPFIND.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::MalformedResponse`] if there is no invite
    /// property or it has no organizer.
    pub fn into_sharees(self) -> Result<Sharees, CalDavError> {
        let invite = self
            .responses
            .into_iter()
            .flat_map(|r| r.prop_stats)
            .find_map(|p| p.props.invite)
            .ok_or_else(|| CalDavError::missing("invite"))?;

        let organizer = invite
            .organizer
            .ok_or_else(|| CalDavError::missing("organizer"))?;

        Ok(Sharees {
            organizer,
            sharees: invite.users,
        })
    }
}

fn status_code(line: &str) -> Option<u16> {
    line.split_whitespace().nth(1)?.parse().ok()
}

fn calendar_info(
    response: &ResponseItem,
    endpoint: &Endpoint,
) -> Result<CalendarInfo, CalDavError> {
    let href = response.href()?;
    let prop_stat = response
        .ok_props()
        .or_else(|| response.prop_stats.first())
        .ok_or_else(|| CalDavError::missing("propstat"))?;
    let status = prop_stat.status_code().ok_or_else(|| {
        CalDavError::MalformedResponse(format!("invalid status line '{}'", prop_stat.status))
    })?;
    let props = &prop_stat.props;

    Ok(CalendarInfo {
        display_name: required(props.display_name.as_ref(), "displayname")?,
        sync_token: required(props.sync_token.as_ref(), "sync-token")?,
        ctag: required(props.ctag.as_ref(), "getctag")?,
        url: endpoint.absolute_url(href),
        status,
    })
}

fn required(value: Option<&String>, element: &str) -> Result<String, CalDavError> {
    value.cloned().ok_or_else(|| CalDavError::missing(element))
}

fn parse_response(reader: &mut XmlReader<'_>) -> Result<ResponseItem, CalDavError> {
    let mut item = ResponseItem::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "href" => item.href = Some(Href::new(read_text(reader)?)),
                "status" => item.status = Some(read_text(reader)?),
                "propstat" => item.prop_stats.push(parse_propstat(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e).as_str() {
                "href" => item.href = Some(Href::new(String::new())),
                "status" => item.status = Some(String::new()),
                "propstat" => item.prop_stats.push(PropStat::default()),
                _ => {}
            },
            Event::End(_) => return Ok(item),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn parse_propstat(reader: &mut XmlReader<'_>) -> Result<PropStat, CalDavError> {
    let mut prop_stat = PropStat::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "prop" => prop_stat.props = parse_prop(reader)?,
                "status" => prop_stat.status = read_text(reader)?,
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e).as_str() {
                "prop" => prop_stat.props = Properties::default(),
                "status" => prop_stat.status = String::new(),
                _ => {}
            },
            Event::End(_) => return Ok(prop_stat),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn parse_prop(reader: &mut XmlReader<'_>) -> Result<Properties, CalDavError> {
    let mut props = Properties::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "displayname" => props.display_name = Some(read_text(reader)?),
                "sync-token" => props.sync_token = Some(read_text(reader)?),
                "getctag" => props.ctag = Some(read_text(reader)?),
                "getetag" => props.etag = Some(ETag::new(read_text(reader)?)),
                "calendar-description" => props.calendar_description = Some(read_text(reader)?),
                "calendar-home-set" => props.calendar_home_set = parse_nested_href(reader)?,
                "invite" => props.invite = Some(parse_invite(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e).as_str() {
                "displayname" => props.display_name = Some(String::new()),
                "sync-token" => props.sync_token = Some(String::new()),
                "getctag" => props.ctag = Some(String::new()),
                "getetag" => props.etag = Some(ETag::new(String::new())),
                "calendar-description" => props.calendar_description = Some(String::new()),
                "invite" => props.invite = Some(Invite::default()),
                _ => {}
            },
            Event::End(_) => return Ok(props),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

/// Reads the first `href` child of the current element.
fn parse_nested_href(reader: &mut XmlReader<'_>) -> Result<Option<Href>, CalDavError> {
    let mut href = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "href" if href.is_none() => href = Some(Href::new(read_text(reader)?)),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) if href.is_none() && local_name(&e) == "href" => {
                href = Some(Href::new(String::new()));
            }
            Event::End(_) => return Ok(href),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn parse_invite(reader: &mut XmlReader<'_>) -> Result<Invite, CalDavError> {
    let mut invite = Invite::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "organizer" => invite.organizer = Some(parse_organizer(reader)?),
                "user" => invite.users.push(parse_user(reader)?),
                _ => skip_element(reader)?,
            },
            Event::End(_) => return Ok(invite),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

fn parse_organizer(reader: &mut XmlReader<'_>) -> Result<Organizer, CalDavError> {
    let mut href = None;
    let mut uri = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "href" => href = Some(read_text(reader)?),
                "uri" => uri = Some(read_text(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e).as_str() {
                "href" => href = Some(String::new()),
                "uri" => uri = Some(String::new()),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }

    Ok(Organizer {
        href: href.ok_or_else(|| CalDavError::missing("organizer/href"))?,
        uri,
    })
}

fn parse_user(reader: &mut XmlReader<'_>) -> Result<ShareeInfo, CalDavError> {
    let mut href = None;
    let mut access = None;
    let mut status = None;
    let mut common_name = None;
    let mut uri = None;
    let mut principal = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match local_name(&e).as_str() {
                "href" => href = Some(read_text(reader)?),
                "access" => access = parse_access(reader)?,
                "invite-accepted" => {
                    status = Some(InviteStatus::Accepted);
                    skip_element(reader)?;
                }
                "common-name" => common_name = Some(read_text(reader)?),
                "uri" => uri = Some(read_text(reader)?),
                "principal" => principal = Some(read_text(reader)?),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match local_name(&e).as_str() {
                "invite-accepted" => status = Some(InviteStatus::Accepted),
                "href" => href = Some(String::new()),
                "common-name" => common_name = Some(String::new()),
                "uri" => uri = Some(String::new()),
                "principal" => principal = Some(String::new()),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }

    Ok(ShareeInfo {
        href: href.ok_or_else(|| CalDavError::missing("user/href"))?,
        access: access.ok_or_else(|| CalDavError::missing("user/access"))?,
        status,
        common_name,
        uri,
        principal,
    })
}

/// Returns the local name of the first child element of `cs:access`.
fn parse_access(reader: &mut XmlReader<'_>) -> Result<Option<String>, CalDavError> {
    let mut access = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                access.get_or_insert_with(|| local_name(&e));
                skip_element(reader)?;
            }
            Event::Empty(e) => {
                access.get_or_insert_with(|| local_name(&e));
            }
            Event::End(_) => return Ok(access),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}
