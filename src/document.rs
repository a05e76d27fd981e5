//! XML document tree
//!
//! A small owned element tree used both for the emitted schema and for
//! instance documents. Parsing is event-driven via quick-xml; serialization
//! pretty-prints with two-space indentation.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

/// XML element in the document tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Element tag name, including any prefix
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Get the tag name without its prefix
    pub fn local_name(&self) -> &str {
        match self.tag.split_once(':') {
            Some((_, local)) => local,
            None => &self.tag,
        }
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, appending in document order
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Add an attribute (builder form)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set text content (builder form)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Find the first child with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.local_name() == local_name)
    }

    /// Find all children with the given local name
    pub fn find_children(&self, local_name: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// Parse an XML document, returning its root element
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(Self::from_start(&e)?);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.add_child(current),
                            None => root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::from_start(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("failed to unescape text: {}", e)))?
                            .to_string();
                        if !text.trim().is_empty() {
                            current.text = Some(text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // comments, processing instructions, declarations
            }
            buf.clear();
        }

        root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
    }

    /// Build an element from a start-tag event
    fn from_start(start: &BytesStart) -> Result<Element> {
        let name_bytes = start.name();
        let tag = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| Error::Xml(format!("invalid element name: {}", e)))?
            .to_string();

        let mut element = Element::new(tag);

        for attr_result in start.attributes() {
            let attr =
                attr_result.map_err(|e| Error::Xml(format!("failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("failed to unescape attribute value: {}", e)))?
                .to_string();

            element.attributes.push((attr_name, attr_value));
        }

        Ok(element)
    }

    /// Serialize this element as pretty-printed XML with two-space indentation
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_into(&mut writer)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Xml(format!("serialized XML is not UTF-8: {}", e)))
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer
                .write_event(Event::Empty(start))
                .map_err(|e| Error::Xml(e.to_string()))?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| Error::Xml(e.to_string()))?;

        if let Some(ref text) = self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| Error::Xml(e.to_string()))?;
        }

        for child in &self.children {
            child.write_into(writer)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.tag.as_str())))
            .map_err(|e| Error::Xml(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_xml() {
        let root = Element::parse("<root><child>text</child></root>").unwrap();

        assert_eq!(root.tag, "root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, "child");
        assert_eq!(root.children[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn test_parse_with_attributes() {
        let root = Element::parse(r#"<root attr1="value1" attr2="value2"><child/></root>"#).unwrap();

        assert_eq!(root.get_attribute("attr1"), Some("value1"));
        assert_eq!(root.get_attribute("attr2"), Some("value2"));
        assert!(root.get_attribute("missing").is_none());
    }

    #[test]
    fn test_local_name() {
        let element = Element::new("xsd:element");
        assert_eq!(element.local_name(), "element");

        let plain = Element::new("address");
        assert_eq!(plain.local_name(), "address");
    }

    #[test]
    fn test_find_children() {
        let root = Element::parse("<root><a/><b/><a/></root>").unwrap();
        assert_eq!(root.find_children("a").len(), 2);
        assert!(root.find_child("b").is_some());
    }

    #[test]
    fn test_pretty_print() {
        let mut root = Element::new("root");
        root.add_child(Element::new("a").with_text("1"));
        root.add_child(Element::new("empty"));

        let xml = root.to_pretty_string().unwrap();
        assert_eq!(xml, "<root>\n  <a>1</a>\n  <empty/>\n</root>");
    }

    #[test]
    fn test_roundtrip_escaping() {
        let root = Element::new("root")
            .with_attribute("note", "a<b")
            .with_text("x & y");

        let xml = root.to_pretty_string().unwrap();
        let parsed = Element::parse(&xml).unwrap();

        assert_eq!(parsed.get_attribute("note"), Some("a<b"));
        assert_eq!(parsed.text.as_deref(), Some("x & y"));
    }
}
