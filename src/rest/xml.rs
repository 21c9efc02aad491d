/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Turns the XML returned by the REST endpoint into a navigable [`Value`] tree.
//!
//! Attributes are stored under `@name`, element text under `#text`, and repeated child
//! elements are collected into an array. Elements with neither attributes nor content become
//! `null`. Everything is kept as a string; typed mapping happens in the entity deserializers.

use crate::rest::errors::FlickrError;
use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::Event;
use quick_xml::events::attributes::Attributes;
use serde::Deserialize;
use serde_json::{Map, Value, json};

pub(crate) const ATTRIBUTE_PREFIX: &str = "@";
pub(crate) const TEXT_KEY: &str = "#text";

/// Text content of an element such as `<frob>...</frob>`
#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct Text {
    #[serde(default, rename = "#text")]
    pub(crate) text: String,
}

/// Parses a response body into a tree rooted at its document element
pub fn parse(body: &[u8]) -> Result<Value, FlickrError> {
    let mut reader = Reader::from_reader(body);
    let mut stack: Vec<(String, Map<String, Value>)> = Vec::new();
    let mut current_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut obj = Map::new();
                add_attributes(e.attributes(), &mut obj)?;
                stack.push((name, obj));
                current_text.clear();
            }
            Event::End(_) => {
                if let Some((name, mut obj)) = stack.pop() {
                    if !current_text.is_empty() {
                        obj.insert(
                            TEXT_KEY.to_string(),
                            Value::String(std::mem::take(&mut current_text)),
                        );
                    }
                    let value = if obj.is_empty() {
                        Value::Null
                    } else {
                        Value::Object(obj)
                    };
                    match stack.last_mut() {
                        Some((_, parent)) => add_to_parent(parent, &name, value),
                        None => return Ok(json!({ name: value })),
                    }
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut obj = Map::new();
                add_attributes(e.attributes(), &mut obj)?;
                let value = if obj.is_empty() {
                    Value::Null
                } else {
                    Value::Object(obj)
                };
                match stack.last_mut() {
                    Some((_, parent)) => add_to_parent(parent, &name, value),
                    None => return Ok(json!({ name: value })),
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    current_text.push_str(trimmed);
                }
            }
            Event::CData(e) => {
                current_text.push_str(&String::from_utf8_lossy(e.into_inner().as_ref()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Reaching the end before the document element closed means the body was cut short
    let open = stack.pop().map(|(name, _)| name).unwrap_or_default();
    Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(open)).into())
}

/// Child elements of a node as a list, whether the tree holds none, one or many of them
pub fn children(node: Option<&Value>) -> Vec<Value> {
    match node {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

fn add_attributes(attributes: Attributes, obj: &mut Map<String, Value>) -> Result<(), FlickrError> {
    for attr in attributes {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = format!(
            "{}{}",
            ATTRIBUTE_PREFIX,
            String::from_utf8_lossy(attr.key.as_ref())
        );
        let value = attr.unescape_value()?;
        obj.insert(key, json!(value));
    }
    Ok(())
}

fn add_to_parent(parent: &mut Map<String, Value>, name: &str, value: Value) {
    match parent.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let old_value = existing.take();
            *existing = json!([old_value, value]);
        }
        None => {
            parent.insert(name.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_text_and_repeats() {
        let body = br#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="ok">
  <photos page="1" pages="1" perpage="2" total="2">
    <photo id="1" title="one &amp; only" />
    <photo id="2" title="two" />
  </photos>
  <frob>abc</frob>
</rsp>"#;
        let tree = parse(body).unwrap();
        let rsp = &tree["rsp"];
        assert_eq!(rsp["@stat"], "ok");
        assert_eq!(rsp["frob"]["#text"], "abc");
        assert_eq!(rsp["photos"]["photo"][0]["@title"], "one & only");
        assert_eq!(children(rsp["photos"].get("photo")).len(), 2);
    }

    #[test]
    fn single_and_missing_children_normalise() {
        let tree = parse(br#"<rsp stat="ok"><photos page="1"><photo id="9"/></photos></rsp>"#).unwrap();
        let photos = &tree["rsp"]["photos"];
        assert_eq!(children(photos.get("photo")).len(), 1);
        assert!(children(photos.get("missing")).is_empty());
    }

    #[test]
    fn rejects_broken_markup() {
        let err = parse(b"<rsp stat=\"ok\"><frob></rsp>").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn truncated_and_empty_bodies_are_malformed() {
        for body in [
            &b""[..],
            b"   ",
            b"<rsp stat=\"ok\">",
            b"<rsp stat=\"ok\"><photos page=\"1\">",
        ] {
            let err = parse(body).unwrap_err();
            assert!(matches!(err, FlickrError::MalformedXml(_)), "{:?}", err);
            assert!(err.is_transport());
        }
    }

    #[test]
    fn empty_element_forms_agree() {
        let open_close = parse(br#"<rsp stat="ok"><photos></photos></rsp>"#).unwrap();
        let self_closing = parse(br#"<rsp stat="ok"><photos/></rsp>"#).unwrap();
        assert_eq!(open_close, self_closing);
        assert!(open_close["rsp"]["photos"].is_null());
        assert!(children(open_close["rsp"].get("photos")).is_empty());
    }
}
