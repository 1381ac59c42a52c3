// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request building tests.

use sabredav_caldav::{
    CalDavError, InviteRequest, MkCalendarRequest, Privilege, PropFindRequest, PropPatchRequest,
    PropertySet, ShareRequest, ShareeType, SyncCollectionRequest,
};

#[test]
fn request_propfind_calendar_properties() {
    let request = PropFindRequest::with_properties(
        PropertySet::Calendar,
        &["displayname", "sync_token", "getctag"],
    )
    .expect("Known properties");

    let xml = request.build().expect("Failed to build PROPFIND XML");

    assert!(xml.contains("<d:propfind"));
    assert!(xml.contains("xmlns:d=\"DAV:\""));
    assert!(xml.contains("xmlns:cs=\"http://calendarserver.org/ns/\""));
    assert!(!xml.contains("xmlns:c="));
    assert!(xml.contains("<d:prop>"));
    assert_eq!(xml.matches("<d:displayname/>").count(), 1);
    assert_eq!(xml.matches("<d:sync-token/>").count(), 1);
    assert_eq!(xml.matches("<cs:getctag/>").count(), 1);
    assert!(!xml.contains("sync_token"));
    assert!(xml.contains("</d:prop>"));
    assert!(xml.contains("</d:propfind>"));
}

#[test]
fn request_propfind_principal_properties() {
    let request =
        PropFindRequest::with_properties(PropertySet::Principal, &["calendar_home_set"])
            .expect("Known property");

    let xml = request.build().expect("Failed to build PROPFIND XML");

    assert!(xml.contains("xmlns:d=\"DAV:\""));
    assert!(xml.contains("xmlns:c=\"urn:ietf:params:xml:ns:caldav\""));
    assert!(!xml.contains("xmlns:cs="));
    assert_eq!(xml.matches("<c:calendar-home-set/>").count(), 1);
}

#[test]
fn request_propfind_subset_emits_only_requested() {
    let request = PropFindRequest::with_properties(PropertySet::Calendar, &["getctag"])
        .expect("Known property");

    let xml = request.build().expect("Failed to build PROPFIND XML");

    assert!(xml.contains("<cs:getctag/>"));
    assert!(!xml.contains("displayname"));
    assert!(!xml.contains("sync-token"));
}

#[test]
fn request_propfind_rejects_unknown_property() {
    let err = PropFindRequest::with_properties(PropertySet::Calendar, &["displayname", "color"])
        .expect_err("Unknown property must fail");
    assert!(matches!(err, CalDavError::PropertyNotSupported(ref key) if key.contains("color")));

    // Known in another set is still unknown here.
    let err = PropFindRequest::with_properties(PropertySet::Principal, &["getctag"])
        .expect_err("Property of another set must fail");
    assert!(matches!(err, CalDavError::PropertyNotSupported(_)));
}

#[test]
fn request_propfind_add_property_validates() {
    let mut request = PropFindRequest::new(PropertySet::Calendar);
    request
        .add_property("displayname")
        .expect("Known property");
    assert!(request.add_property("calendar_home_set").is_err());

    let xml = request.build().expect("Failed to build PROPFIND XML");
    assert!(xml.contains("<d:displayname/>"));
    assert!(!xml.contains("calendar-home-set"));
}

#[test]
fn request_property_set_tags_namespaces() {
    let ctag = PropertySet::Calendar.lookup("getctag").expect("Known");
    assert_eq!(ctag.namespace().prefix(), "cs");
    assert_eq!(ctag.element_name(), "getctag");

    let token = PropertySet::Calendar.lookup("sync_token").expect("Known");
    assert_eq!(token.namespace().prefix(), "d");
    assert_eq!(token.element_name(), "sync-token");

    let home = PropertySet::Principal
        .lookup("calendar_home_set")
        .expect("Known");
    assert_eq!(home.namespace().uri(), "urn:ietf:params:xml:ns:caldav");
    assert_eq!(home.element_name(), "calendar-home-set");
}

#[test]
fn request_mkcalendar_builds_xml() {
    let xml = MkCalendarRequest::new("Test Calendar")
        .description("Team events")
        .build()
        .expect("Failed to build MKCALENDAR XML");

    assert!(xml.contains("<c:mkcalendar"));
    assert!(xml.contains("xmlns:d=\"DAV:\""));
    assert!(xml.contains("xmlns:c=\"urn:ietf:params:xml:ns:caldav\""));
    assert!(xml.contains("<d:set>"));
    assert!(xml.contains("<d:displayname>Test Calendar</d:displayname>"));
    assert!(xml.contains("<c:calendar-description>Team events</c:calendar-description>"));
    assert!(xml.contains("</c:mkcalendar>"));
}

#[test]
fn request_mkcalendar_omits_empty_fields() {
    let xml = MkCalendarRequest::new("")
        .build()
        .expect("Failed to build MKCALENDAR XML");

    assert!(xml.contains("<d:prop>"));
    assert!(!xml.contains("displayname"));
    assert!(!xml.contains("calendar-description"));
}

#[test]
fn request_mkcalendar_escapes_text() {
    let xml = MkCalendarRequest::new("Work & <Life>")
        .build()
        .expect("Failed to build MKCALENDAR XML");

    assert!(xml.contains("Work &amp; &lt;Life&gt;"));
}

#[test]
fn request_proppatch_builds_xml() {
    let xml = PropPatchRequest::new()
        .display_name("Renamed")
        .build()
        .expect("Failed to build PROPPATCH XML");

    assert!(xml.contains("<d:propertyupdate"));
    assert!(xml.contains("<d:displayname>Renamed</d:displayname>"));
    assert!(!xml.contains("calendar-description"));

    let xml = PropPatchRequest::new()
        .description("New description")
        .build()
        .expect("Failed to build PROPPATCH XML");

    assert!(!xml.contains("displayname"));
    assert!(xml.contains("<c:calendar-description>New description</c:calendar-description>"));
}

#[test]
fn request_sync_collection_builds_xml() {
    let xml = SyncCollectionRequest::new("http://sabre.io/ns/sync/15")
        .build()
        .expect("Failed to build sync-collection XML");

    assert!(xml.contains("<d:sync-collection xmlns:d=\"DAV:\">"));
    assert!(xml.contains("<d:sync-token>http://sabre.io/ns/sync/15</d:sync-token>"));
    assert!(xml.contains("<d:sync-level>1</d:sync-level>"));
    assert!(xml.contains("<d:getetag/>"));
    assert!(xml.contains("</d:sync-collection>"));
}

#[test]
fn request_invite_propfind_builds_xml() {
    let xml = InviteRequest.build().expect("Failed to build PROPFIND XML");

    assert!(xml.contains("<d:propfind"));
    assert!(xml.contains("xmlns:cs=\"http://calendarserver.org/ns/\""));
    assert!(xml.contains("<cs:invite/>"));
}

#[test]
fn request_share_builds_sets_and_removes() {
    let xml = ShareRequest::new()
        .add("alice@example.com")
        .add("bob@example.com")
        .remove("carol@example.com")
        .summary("Team calendar")
        .common_name("Team")
        .privilege(Privilege::Read)
        .build()
        .expect("Failed to build share XML");

    assert!(xml.contains("<cs:share"));
    assert!(xml.contains("xmlns:d=\"DAV:\""));
    assert!(xml.contains("xmlns:cs=\"http://calendarserver.org/ns/\""));
    assert_eq!(xml.matches("<cs:set>").count(), 2);
    assert_eq!(xml.matches("<cs:remove>").count(), 1);
    assert!(xml.contains("<d:href>mailto:alice@example.com</d:href>"));
    assert!(xml.contains("<d:href>mailto:bob@example.com</d:href>"));
    assert!(xml.contains("<d:href>mailto:carol@example.com</d:href>"));
    assert_eq!(xml.matches("<cs:summary>Team calendar</cs:summary>").count(), 2);
    assert_eq!(xml.matches("<cs:common-name>Team</cs:common-name>").count(), 2);
    assert_eq!(xml.matches("<cs:read/>").count(), 2);
    assert!(!xml.contains("read-write"));
}

#[test]
fn request_share_defaults() {
    let xml = ShareRequest::new()
        .add("mailto:alice@example.com")
        .build()
        .expect("Failed to build share XML");

    assert!(xml.contains("<d:href>mailto:alice@example.com</d:href>"));
    assert!(!xml.contains("mailto:mailto:"));
    assert!(xml.contains("<cs:read-write/>"));
    assert!(!xml.contains("cs:summary"));
    assert!(!xml.contains("cs:common-name"));
    assert!(!xml.contains("cs:remove"));
}

#[test]
fn request_share_validates_sharee_type() {
    let request = ShareRequest::new().add("alice@example.com");
    assert!(request.validate().is_ok());
    assert!(request.clone().sharee_type(ShareeType::Email).validate().is_ok());

    let err = request
        .sharee_type(ShareeType::Other("other".to_string()))
        .validate()
        .expect_err("Only email is supported");
    assert_eq!(err, CalDavError::UnsupportedShareeType("other".to_string()));
}

#[test]
fn request_privilege_parses_spellings() {
    assert_eq!("read".parse::<Privilege>(), Ok(Privilege::Read));
    assert_eq!("read-write".parse::<Privilege>(), Ok(Privilege::ReadWrite));
    assert_eq!("write-read".parse::<Privilege>(), Ok(Privilege::ReadWrite));
    assert_eq!(
        "admin".parse::<Privilege>(),
        Err(CalDavError::UnsupportedPrivilege("admin".to_string()))
    );
    assert_eq!(Privilege::default(), Privilege::ReadWrite);
}

#[test]
fn request_sharee_type_parses() {
    assert_eq!("email".parse::<ShareeType>(), Ok(ShareeType::Email));
    assert_eq!(
        "principal".parse::<ShareeType>(),
        Ok(ShareeType::Other("principal".to_string()))
    );
}
