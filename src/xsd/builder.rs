//! Schema element construction
//!
//! Thin wrapper over the document model that keeps namespace-prefix
//! bookkeeping out of the lowerer: every element it creates carries the
//! `xsd:` prefix, and `base`/`type` attributes naming an XMLSchema built-in
//! are rewritten to their prefixed form.

use crate::document::Element;
use crate::XSD_NAMESPACE;

/// XMLSchema built-in base names that take the `xsd:` prefix
const BUILTIN_BASE_NAMES: [&str; 7] = [
    "string", "integer", "decimal", "dateTime", "date", "time", "boolean",
];

/// Attribute keys whose values may name a built-in base
const TYPE_ATTRIBUTES: [&str; 2] = ["base", "type"];

/// Builder for `xsd:`-prefixed schema elements
pub struct XsdBuilder;

impl XsdBuilder {
    /// Create the `<xsd:schema>` root with its namespace binding
    pub fn schema() -> Element {
        Element::new("xsd:schema").with_attribute("xmlns:xsd", XSD_NAMESPACE)
    }

    /// Create a detached schema element with rewritten type attributes
    pub fn element(local: &str, attributes: &[(&str, &str)]) -> Element {
        let mut element = Element::new(format!("xsd:{}", local));
        for (name, value) in attributes {
            element.set_attribute(*name, Self::rewrite_attribute(name, value));
        }
        element
    }

    /// Append a schema element to a parent, returning the new child for chaining
    pub fn append<'a>(
        parent: &'a mut Element,
        local: &str,
        attributes: &[(&str, &str)],
    ) -> &'a mut Element {
        let index = parent.children.len();
        parent.add_child(Self::element(local, attributes));
        &mut parent.children[index]
    }

    fn rewrite_attribute(name: &str, value: &str) -> String {
        if TYPE_ATTRIBUTES.contains(&name) && BUILTIN_BASE_NAMES.contains(&value) {
            format!("xsd:{}", value)
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_root() {
        let schema = XsdBuilder::schema();
        assert_eq!(schema.tag, "xsd:schema");
        assert_eq!(schema.get_attribute("xmlns:xsd"), Some(XSD_NAMESPACE));
    }

    #[test]
    fn test_builtin_type_rewritten() {
        let element = XsdBuilder::element("element", &[("name", "a"), ("type", "integer")]);
        assert_eq!(element.tag, "xsd:element");
        assert_eq!(element.get_attribute("name"), Some("a"));
        assert_eq!(element.get_attribute("type"), Some("xsd:integer"));
    }

    #[test]
    fn test_base_rewritten() {
        let element = XsdBuilder::element("restriction", &[("base", "date")]);
        assert_eq!(element.get_attribute("base"), Some("xsd:date"));
    }

    #[test]
    fn test_derived_type_untouched() {
        let element = XsdBuilder::element("element", &[("name", "d"), ("type", "dateType")]);
        assert_eq!(element.get_attribute("type"), Some("dateType"));
    }

    #[test]
    fn test_non_type_attribute_untouched() {
        let element = XsdBuilder::element("element", &[("name", "string")]);
        assert_eq!(element.get_attribute("name"), Some("string"));
    }

    #[test]
    fn test_append_chains() {
        let mut schema = XsdBuilder::schema();
        let all = XsdBuilder::append(&mut schema, "all", &[]);
        XsdBuilder::append(all, "element", &[("name", "a"), ("type", "string")]);

        assert_eq!(schema.children.len(), 1);
        assert_eq!(schema.children[0].tag, "xsd:all");
        assert_eq!(schema.children[0].children[0].tag, "xsd:element");
    }
}
