//! Generic XML-to-table conversion
//!
//! A part is parsed into a tree of elements. Each element exposes its
//! attributes as named columns and its child elements as rows, so callers
//! select sections by element name (`numFmts`, `cellXfs`, `sheetData`, ...).
//! Names are stored without namespace prefixes and text content is dropped.

use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use std::collections::VecDeque;

use crate::error::{ExtractError, ExtractResult};

/// One XML element with its attributes and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Attribute value by local name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children with the given name
    pub fn children_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Shallowest descendant with the given name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        let mut queue: VecDeque<&XmlElement> = self.children.iter().collect();
        while let Some(element) = queue.pop_front() {
            if element.name == name {
                return Some(element);
            }
            queue.extend(element.children.iter());
        }
        None
    }

    /// Rows of a section: the `row` children of the shallowest `section`
    /// element. Empty when the section is absent.
    pub fn section_rows<'s>(&'s self, section: &str, row: &'s str) -> Vec<&'s XmlElement> {
        self.find(section)
            .map(|s| s.children_named(row).collect())
            .unwrap_or_default()
    }
}

/// Parse a part into its root element. An empty document yields an
/// element with no name and no children; input that ends inside an open
/// element is an error.
pub fn parse_xml(part: &str, bytes: &[u8]) -> ExtractResult<XmlElement> {
    let xml_error = |source: quick_xml::Error| ExtractError::Xml {
        part: part.to_string(),
        source,
    };

    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => stack.push(element_from(&e).map_err(xml_error)?),
            Event::Empty(e) => {
                let element = element_from(&e).map_err(xml_error)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(IllFormedError::MissingEndTag(open.name.clone()).into()));
    }

    Ok(root.unwrap_or_default())
}

fn element_from(e: &BytesStart<'_>) -> Result<XmlElement, quick_xml::Error> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}
