// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` client for calendar collection operations.

use std::sync::Arc;

use reqwest::Method;

use crate::config::{CalDavConfig, Endpoint};
use crate::error::CalDavError;
use crate::http::{HttpClient, RawResponse, dav_method};
use crate::request::{
    InviteRequest, MkCalendarRequest, PropFindRequest, PropPatchRequest, PropertySet,
    ShareRequest, SyncCollectionRequest,
};
use crate::response::MultiStatusResponse;
use crate::types::{CalendarInfo, ChangeSet, Sharees};

const CONTENT_TYPE_XML: (&str, &str) = ("Content-Type", "application/xml");
const DEPTH_ZERO: (&str, &str) = ("Depth", "0");

/// `CalDAV` client bound to a single calendar collection.
///
/// # Example
///
/// ```ignore
/// use sabredav_caldav::{AuthMethod, CalDavConfig, CalendarClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let principal = CalDavConfig {
///     url: "https://dav.example.com/principals/user".to_string(),
///     auth: AuthMethod::Basic {
///         username: "user".to_string(),
///         password: "pass".to_string(),
///     },
///     ..Default::default()
/// };
///
/// let calendar = CalendarClient::discover(&principal, "work").await?;
/// let info = calendar.info().await?;
/// let changes = calendar.fetch_changes(&info.sync_token).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: Arc<HttpClient>,
}

impl CalendarClient {
    /// Creates a client for the calendar at `config.url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or HTTP client initialization fails.
    pub fn new(config: &CalDavConfig) -> Result<Self, CalDavError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Resolves the calendar home URL of the principal at `principal.url`.
    ///
    /// The returned URL is absolute and has no trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no
    /// `calendar-home-set`.
    #[tracing::instrument(skip(principal), fields(url = %principal.url))]
    pub async fn resolve_home_url(principal: &CalDavConfig) -> Result<String, CalDavError> {
        let http = HttpClient::new(principal)?;
        let body =
            PropFindRequest::with_properties(PropertySet::Principal, &["calendar_home_set"])?
                .build()?;

        let resp = http
            .execute(
                dav_method("PROPFIND")?,
                &[CONTENT_TYPE_XML, DEPTH_ZERO],
                Some(body),
            )
            .await?
            .error_for_status()?;

        let home = MultiStatusResponse::from_xml(&resp.body)?.into_home_url(http.endpoint())?;
        tracing::debug!(home = %home, "resolved calendar home");
        Ok(home)
    }

    /// Creates a client for `calendar` inside a resolved calendar home.
    ///
    /// Credentials and HTTP settings are taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is invalid.
    pub fn in_home(
        config: &CalDavConfig,
        home_url: &str,
        calendar: &str,
    ) -> Result<Self, CalDavError> {
        let url = format!(
            "{}/{}",
            home_url.trim_end_matches('/'),
            calendar.trim_matches('/')
        );
        Self::new(&config.with_url(url))
    }

    /// Resolves the calendar home of a principal and creates a client for
    /// `calendar` inside it.
    ///
    /// Each call performs the discovery round trip. Use [`resolve_home_url`]
    /// and [`in_home`] to reuse a home URL across calendars.
    ///
    /// [`resolve_home_url`]: Self::resolve_home_url
    /// [`in_home`]: Self::in_home
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails.
    pub async fn discover(principal: &CalDavConfig, calendar: &str) -> Result<Self, CalDavError> {
        let home = Self::resolve_home_url(principal).await?;
        Self::in_home(principal, &home, calendar)
    }

    /// Returns the calendar endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        self.http.endpoint()
    }

    /// Fetches display name, sync token and ctag of the calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is incomplete.
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn info(&self) -> Result<CalendarInfo, CalDavError> {
        let body = PropFindRequest::with_properties(
            PropertySet::Calendar,
            &["displayname", "sync_token", "getctag"],
        )?
        .build()?;

        let resp = self
            .send(
                dav_method("PROPFIND")?,
                &[CONTENT_TYPE_XML, DEPTH_ZERO],
                Some(body),
            )
            .await?;

        MultiStatusResponse::from_xml(&resp.body)?.into_calendar_info(self.endpoint())
    }

    /// Creates the calendar collection and returns its info.
    ///
    /// The collection must not exist yet. Creation only succeeds once the
    /// follow-up [`info`](Self::info) call does.
    ///
    /// # Errors
    ///
    /// Returns an error if MKCALENDAR or the follow-up info request fails.
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn create(
        &self,
        display_name: &str,
        description: Option<&str>,
    ) -> Result<CalendarInfo, CalDavError> {
        let mut request = MkCalendarRequest::new(display_name);
        if let Some(description) = description {
            request = request.description(description);
        }

        self.send(
            dav_method("MKCALENDAR")?,
            &[("DAV", "resource-must-be-null"), CONTENT_TYPE_XML],
            Some(request.build()?),
        )
        .await?;

        self.info().await
    }

    /// Changes the display name and/or description of the calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if PROPPATCH fails.
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn update(
        &self,
        display_name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), CalDavError> {
        let mut request = PropPatchRequest::new();
        if let Some(display_name) = display_name {
            request = request.display_name(display_name);
        }
        if let Some(description) = description {
            request = request.description(description);
        }

        self.send(
            dav_method("PROPPATCH")?,
            &[CONTENT_TYPE_XML],
            Some(request.build()?),
        )
        .await?;
        Ok(())
    }

    /// Deletes the calendar collection.
    ///
    /// # Errors
    ///
    /// Returns an error if DELETE fails, e.g. [`CalDavError::NotFound`].
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn delete(&self) -> Result<(), CalDavError> {
        self.send(Method::DELETE, &[], None).await?;
        Ok(())
    }

    /// Shares the calendar or revokes shares.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::UnsupportedShareeType`] without sending anything
    /// if the request names a sharee type other than email, or an error if
    /// POST fails.
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn share(&self, request: &ShareRequest) -> Result<(), CalDavError> {
        request.validate()?;
        self.send(Method::POST, &[CONTENT_TYPE_XML], Some(request.build()?))
            .await?;
        Ok(())
    }

    /// Lists the organizer and the sharees of the calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no invite.
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn fetch_sharees(&self) -> Result<Sharees, CalDavError> {
        let resp = self
            .send(
                dav_method("PROPFIND")?,
                &[CONTENT_TYPE_XML, DEPTH_ZERO],
                Some(InviteRequest.build()?),
            )
            .await?;

        MultiStatusResponse::from_xml(&resp.body)?.into_sharees()
    }

    /// Fetches the resources changed and deleted since `sync_token`.
    ///
    /// The returned [`ChangeSet::sync_token`] is the token for the next call;
    /// persisting it is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the REPORT fails or the response is incomplete.
    #[tracing::instrument(skip(self), fields(url = self.endpoint().base_uri()))]
    pub async fn fetch_changes(&self, sync_token: &str) -> Result<ChangeSet, CalDavError> {
        let body = SyncCollectionRequest::new(sync_token).build()?;
        let resp = self
            .send(dav_method("REPORT")?, &[CONTENT_TYPE_XML], Some(body))
            .await?;

        let changes = MultiStatusResponse::from_xml(&resp.body)?.into_change_set()?;
        tracing::debug!(
            changes = changes.changes.len(),
            deletions = changes.deletions.len(),
            "fetched changes"
        );
        Ok(changes)
    }

    /// Executes a request and fails on any non-2xx status.
    async fn send(
        &self,
        method: Method,
        headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<RawResponse, CalDavError> {
        self.http
            .execute(method, headers, body)
            .await?
            .error_for_status()
    }
}
