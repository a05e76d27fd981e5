//! Library of derived simple types
//!
//! Every schema starts with the same six named simple types. Transformed
//! strings lower to these by name; `nullType` backs the null kind. The
//! date and time types are unions so that both the lexical XSD form and the
//! recognized plain-text forms validate.

use crate::document::Element;
use crate::xsd::builder::XsdBuilder;

/// Day-first numeric date, `/` or `.` separated
pub const DATE_PATTERN: &str = r"(0?[1-9]|[12][0-9]|3[01])[/.](0?[1-9]|1[0-2])[/.]\d{4}";

/// 24-hour clock time
pub const TIME_24H_PATTERN: &str = "([0-1]?[0-9]|2[0-3]):([0-5][0-9])";

/// 12-hour clock time with meridiem
pub const TIME_12H_PATTERN: &str = r"(0?[0-9]|1[01]):([0-5][0-9]) (AM|PM|a\.m\.|p\.m\.)";

/// Integer carried as a string
pub const INTEGER_STRING_PATTERN: &str = "(0|-?[1-9]*)";

/// Boolean carried as a string
pub const BOOLEAN_STRING_PATTERN: &str = "true|false";

/// http/https/ftp URI
pub const URI_PATTERN: &str = r"(https?|ftp):\/\/[^{}]+\.[^{}]+";

/// Emit the six library simple types directly under `<xsd:schema>`
pub fn emit_basic_types(schema: &mut Element) {
    schema.add_child(union_type(
        "dateType",
        vec![
            restriction("date", None),
            restriction("string", Some(DATE_PATTERN)),
        ],
    ));

    schema.add_child(union_type(
        "timeType",
        vec![
            restriction("time", None),
            restriction("string", Some(TIME_24H_PATTERN)),
            restriction("string", Some(TIME_12H_PATTERN)),
        ],
    ));

    schema.add_child(restriction_type(
        "integerStringType",
        restriction("string", Some(INTEGER_STRING_PATTERN)),
    ));

    schema.add_child(restriction_type(
        "booleanStringType",
        restriction("string", Some(BOOLEAN_STRING_PATTERN)),
    ));

    schema.add_child(restriction_type(
        "uriType",
        restriction("string", Some(URI_PATTERN)),
    ));

    let mut null_restriction = restriction("string", None);
    null_restriction.add_child(XsdBuilder::element("length", &[("value", "0")]));
    schema.add_child(restriction_type("nullType", null_restriction));
}

/// `<xsd:restriction base=…>` with an optional pattern facet
fn restriction(base: &str, pattern: Option<&str>) -> Element {
    let mut element = XsdBuilder::element("restriction", &[("base", base)]);
    if let Some(pattern) = pattern {
        element.add_child(XsdBuilder::element("pattern", &[("value", pattern)]));
    }
    element
}

/// Named `<xsd:simpleType>` wrapping a single restriction
fn restriction_type(name: &str, restriction: Element) -> Element {
    let mut simple_type = XsdBuilder::element("simpleType", &[("name", name)]);
    simple_type.add_child(restriction);
    simple_type
}

/// Named `<xsd:simpleType>` with a union of anonymous restricted members
fn union_type(name: &str, members: Vec<Element>) -> Element {
    let mut simple_type = XsdBuilder::element("simpleType", &[("name", name)]);
    let union = XsdBuilder::append(&mut simple_type, "union", &[]);
    for member in members {
        let wrapper = XsdBuilder::append(union, "simpleType", &[]);
        wrapper.add_child(member);
    }
    simple_type
}
