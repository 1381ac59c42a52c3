// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for WebDAV/CalDAV processing.

use std::io::Cursor;

use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::CalDavError;

/// XML namespaces used in requests and responses, with the prefixes this
/// crate binds them to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `WebDAV` core namespace.
    Dav,
    /// `CalendarServer` extension namespace (ctag, sharing).
    CalendarServer,
    /// `CalDAV` namespace (RFC 4791).
    CalDav,
}

impl Namespace {
    /// Returns the element prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dav => "d",
            Self::CalendarServer => "cs",
            Self::CalDav => "c",
        }
    }

    /// Returns the namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Dav => "DAV:",
            Self::CalendarServer => "http://calendarserver.org/ns/",
            Self::CalDav => "urn:ietf:params:xml:ns:caldav",
        }
    }

    const fn xmlns(self) -> &'static str {
        match self {
            Self::Dav => "xmlns:d",
            Self::CalendarServer => "xmlns:cs",
            Self::CalDav => "xmlns:c",
        }
    }

    /// Returns `prefix:local`.
    #[must_use]
    pub fn qualify(self, local: &str) -> String {
        format!("{}:{local}", self.prefix())
    }
}

/// Indented XML document writer with namespace-qualified element helpers.
pub struct DocumentWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl DocumentWriter {
    /// Starts a document whose root element declares `namespaces`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn new(ns: Namespace, root: &str, namespaces: &[Namespace]) -> Result<Self, CalDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut elem = BytesStart::new(ns.qualify(root));
        for namespace in namespaces {
            elem.push_attribute((namespace.xmlns(), namespace.uri()));
        }
        writer.write_event(Event::Start(elem))?;
        Ok(Self { writer })
    }

    /// Opens `<ns:name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn open(&mut self, ns: Namespace, name: &str) -> Result<&mut Self, CalDavError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(ns.qualify(name))))?;
        Ok(self)
    }

    /// Closes `</ns:name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn close(&mut self, ns: Namespace, name: &str) -> Result<&mut Self, CalDavError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(ns.qualify(name))))?;
        Ok(self)
    }

    /// Writes `<ns:name/>`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn empty(&mut self, ns: Namespace, name: &str) -> Result<&mut Self, CalDavError> {
        self.writer
            .write_event(Event::Empty(BytesStart::new(ns.qualify(name))))?;
        Ok(self)
    }

    /// Writes `<ns:name>text</ns:name>`, escaping the text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn text(
        &mut self,
        ns: Namespace,
        name: &str,
        text: &str,
    ) -> Result<&mut Self, CalDavError> {
        let name = ns.qualify(name);
        self.writer
            .write_event(Event::Start(BytesStart::new(name.as_str())))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(self)
    }

    /// Closes the root element and returns the document.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the output is not UTF-8.
    pub fn finish(mut self, ns: Namespace, root: &str) -> Result<String, CalDavError> {
        self.close(ns, root)?;
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| CalDavError::Xml(format!("UTF-8 error: {e}")))
    }
}

/// Reader over an in-memory document.
pub type XmlReader<'a> = Reader<&'a [u8]>;

/// Creates a reader for `xml`.
pub fn reader(xml: &str) -> XmlReader<'_> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;
    reader
}

/// Returns the local name (prefix stripped) of an element.
pub fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().local_name().into_inner()).into_owned()
}

/// Reads the text content of the element whose start tag was just consumed,
/// up to and including its end tag. Nested markup is skipped.
///
/// # Errors
///
/// Returns an error if XML parsing fails or the document ends early.
pub fn read_text(reader: &mut XmlReader<'_>) -> Result<String, CalDavError> {
    let mut text = String::new();
    let mut depth = 1_usize;

    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(e) if depth == 1 => {
                text.push_str(&e.xml_content().map_err(quick_xml::Error::from)?);
            }
            Event::CData(e) if depth == 1 => {
                text.push_str(&e.decode().map_err(quick_xml::Error::from)?);
            }
            Event::GeneralRef(e) if depth == 1 => text.push_str(&resolve_reference(&e)?),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

/// Skips the element whose start tag was just consumed, including its end tag.
///
/// # Errors
///
/// Returns an error if XML parsing fails or the document ends early.
pub fn skip_element(reader: &mut XmlReader<'_>) -> Result<(), CalDavError> {
    let mut depth = 1_usize;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
    }
}

/// Error for a document that ends inside an element.
pub fn unexpected_eof() -> CalDavError {
    CalDavError::Xml("Unexpected EOF".to_string())
}

/// Resolves a predefined entity (`quot`, `amp`, ...) or a character reference (`#34`, `#x22`).
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, CalDavError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch.to_string());
    }

    let name = reference.decode().map_err(quick_xml::Error::from)?;
    resolve_xml_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| CalDavError::Xml(format!("unknown entity reference &{name};")))
}
