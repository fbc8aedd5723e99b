//! XML utilities for CardDAV WebDAV operations.
//!
//! This module generates the `addressbook-query` REPORT body and parses
//! the multistatus response it returns.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use std::io::Cursor;

/// DAV namespace
pub const DAV_NS: &str = "DAV:";
/// CardDAV namespace
pub const CARDDAV_NS: &str = "urn:ietf:params:xml:ns:carddav";

/// Generates an addressbook-query REPORT body.
///
/// Requests the etag and the full address-data of every contact resource
/// in the collection.
pub fn addressbook_query_body() -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    // <card:addressbook-query xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav">
    let mut query = BytesStart::new("card:addressbook-query");
    query.push_attribute(("xmlns:d", DAV_NS));
    query.push_attribute(("xmlns:card", CARDDAV_NS));
    writer.write_event(Event::Start(query)).unwrap();

    // <d:prop>
    writer
        .write_event(Event::Start(BytesStart::new("d:prop")))
        .unwrap();
    write_empty_element(&mut writer, "d:getetag");
    write_empty_element(&mut writer, "card:address-data");
    writer
        .write_event(Event::End(BytesEnd::new("d:prop")))
        .unwrap();

    // </card:addressbook-query>
    writer
        .write_event(Event::End(BytesEnd::new("card:addressbook-query")))
        .unwrap();

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

/// Parses a multistatus response and extracts every address-data fragment.
///
/// Fragments are returned in document order. Unparseable XML yields an
/// empty list, which the caller treats as a failed query.
pub fn parse_multistatus(xml: &str) -> Vec<String> {
    let mut fragments = Vec::new();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_address_data = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if local_name(&name) == "address-data" {
                    in_address_data = true;
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if local_name(&name) == "address-data" {
                    in_address_data = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_address_data {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if !text.is_empty() {
                        fragments.push(text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_address_data {
                    let text = String::from_utf8_lossy(&e).to_string();
                    if !text.is_empty() {
                        fragments.push(text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    fragments
}

/// Helper to write an empty XML element.
fn write_empty_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str) {
    writer
        .write_event(Event::Empty(BytesStart::new(name)))
        .unwrap();
}

/// Extracts the local name from a potentially namespaced element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}
