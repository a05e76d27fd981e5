//! Type graph lowering
//!
//! Walks the type graph depth-first and emits XSD constructs: primitives as
//! inline `<xsd:element>` declarations, arrays and classes as named
//! `<xsd:complexType>` definitions, primitive unions as named
//! `<xsd:simpleType>` unions. Named types are allocated `complexType1`,
//! `complexType2`, … in visit order and deduplicated through the
//! processed-typeref map, which is also what breaks cycles: a second
//! encounter of a typeref emits a reference to the existing name and does
//! not re-descend.

use std::collections::HashMap;

use crate::document::Element;
use crate::error::{Error, Result};
use crate::typegraph::{StringFormat, TypeGraph, TypeKind, TypeRef};
use crate::xsd::builder::XsdBuilder;

/// Occurrence attributes for array item elements
const ITEM_OCCURS: [(&str, &str); 2] = [("maxOccurs", "unbounded"), ("minOccurs", "0")];

/// Occurrence attributes for optional class properties
const OPTIONAL_OCCURS: [(&str, &str); 1] = [("minOccurs", "0")];

/// A named use of a type, captured for top-level element resolution
#[derive(Debug, Clone)]
pub struct RecordedElement {
    /// The element tag
    pub tag: String,
    /// The resolved XSD type name the tag refers to
    pub type_name: String,
    /// Ancestor-key history for collision disambiguation, nearest first
    pub prefix_chain: Vec<String>,
}

/// Per-render lowering state
pub struct Lowerer<'g> {
    graph: &'g TypeGraph,
    processed: HashMap<TypeRef, String>,
    complex_types: Vec<Option<Element>>,
    recorded: Vec<RecordedElement>,
}

impl<'g> Lowerer<'g> {
    /// Create a lowerer over a type graph
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self {
            graph,
            processed: HashMap::new(),
            complex_types: Vec::new(),
            recorded: Vec::new(),
        }
    }

    /// Lower the top-level type
    ///
    /// The top level emits no local element; its top-level declaration comes
    /// from the element resolver, so the root is recorded here whatever its
    /// kind.
    pub fn lower_top_level(&mut self, name: &str, r: TypeRef) -> Result<()> {
        let graph = self.graph;
        match graph.kind(r) {
            TypeKind::None
            | TypeKind::Any
            | TypeKind::Map
            | TypeKind::Object
            | TypeKind::Enum => Ok(()),
            TypeKind::Null
            | TypeKind::Bool
            | TypeKind::Integer
            | TypeKind::Double
            | TypeKind::String
            | TypeKind::Transformed(_) => {
                let type_name = primitive_type_name(graph.kind(r))
                    .ok_or_else(|| Error::Internal("primitive kind without a type name".into()))?;
                self.record(name, type_name, &[]);
                Ok(())
            }
            TypeKind::Array { .. } | TypeKind::Class { .. } | TypeKind::Union { .. } => {
                let type_name = self.lower_composite(name, r, &[])?;
                self.record(name, &type_name, &[]);
                Ok(())
            }
        }
    }

    /// Consume the lowerer, returning complex types in visit order and the
    /// recorded element table
    pub fn finish(self) -> Result<(Vec<Element>, Vec<RecordedElement>)> {
        let mut complex_types = Vec::with_capacity(self.complex_types.len());
        for slot in self.complex_types {
            complex_types.push(
                slot.ok_or_else(|| Error::Internal("unfilled complex type slot".to_string()))?,
            );
        }
        Ok((complex_types, self.recorded))
    }

    /// Lower a type into a schema fragment at element position `key`
    fn lower_into(
        &mut self,
        key: &str,
        r: TypeRef,
        parent: &mut Element,
        occurs: &[(&str, &str)],
        chain: &[String],
    ) -> Result<()> {
        let graph = self.graph;
        match graph.kind(r) {
            TypeKind::None | TypeKind::Any | TypeKind::Map | TypeKind::Object | TypeKind::Enum => {
                Ok(())
            }
            TypeKind::Null
            | TypeKind::Bool
            | TypeKind::Integer
            | TypeKind::Double
            | TypeKind::String
            | TypeKind::Transformed(_) => {
                let type_name = primitive_type_name(graph.kind(r))
                    .ok_or_else(|| Error::Internal("primitive kind without a type name".into()))?;
                parent.add_child(local_element(key, type_name, occurs));
                Ok(())
            }
            TypeKind::Array { .. } | TypeKind::Class { .. } | TypeKind::Union { .. } => {
                let type_name = self.lower_composite(key, r, chain)?;
                parent.add_child(local_element(key, &type_name, occurs));
                self.record(key, &type_name, chain);
                Ok(())
            }
        }
    }

    /// Allocate (or reuse) the named type definition for an array, class, or
    /// primitive union
    fn lower_composite(&mut self, key: &str, r: TypeRef, chain: &[String]) -> Result<String> {
        if let Some(existing) = self.processed.get(&r) {
            return Ok(existing.clone());
        }

        let name = format!("complexType{}", self.processed.len() + 1);
        self.processed.insert(r, name.clone());
        let slot = self.complex_types.len();
        self.complex_types.push(None);

        let graph = self.graph;
        let definition = match graph.kind(r) {
            TypeKind::Array { items } => {
                let mut sequence = XsdBuilder::element("sequence", &[]);
                let item_key = format!("{}Item", key);
                self.lower_into(&item_key, *items, &mut sequence, &ITEM_OCCURS, chain)?;

                let mut complex = XsdBuilder::element("complexType", &[("name", &name)]);
                complex.add_child(sequence);
                complex
            }
            TypeKind::Class { properties } => {
                let child_chain = extend_chain(chain, key);
                let mut all = XsdBuilder::element("all", &[]);
                for property in properties {
                    let occurs: &[(&str, &str)] = if property.optional {
                        &OPTIONAL_OCCURS
                    } else {
                        &[]
                    };
                    self.lower_into(&property.name, property.ty, &mut all, occurs, &child_chain)?;
                }

                let mut complex = XsdBuilder::element("complexType", &[("name", &name)]);
                complex.add_child(all);
                complex
            }
            TypeKind::Union { members } => {
                let mut union = XsdBuilder::element("union", &[]);
                for member in members {
                    let member_kind = graph.kind(*member);
                    let base = primitive_type_name(member_kind).ok_or_else(|| {
                        Error::UnsupportedUnion(format!(
                            "union member of kind '{}' under '{}'",
                            kind_name(member_kind),
                            key
                        ))
                    })?;
                    let mut wrapper = XsdBuilder::element("simpleType", &[]);
                    wrapper.add_child(XsdBuilder::element("restriction", &[("base", base)]));
                    union.add_child(wrapper);
                }

                let mut simple = XsdBuilder::element("simpleType", &[("name", &name)]);
                simple.add_child(union);
                simple
            }
            TypeKind::None
            | TypeKind::Any
            | TypeKind::Null
            | TypeKind::Bool
            | TypeKind::Integer
            | TypeKind::Double
            | TypeKind::String
            | TypeKind::Map
            | TypeKind::Object
            | TypeKind::Enum
            | TypeKind::Transformed(_) => {
                return Err(Error::Internal(format!(
                    "lower_composite on kind '{}'",
                    kind_name(graph.kind(r))
                )))
            }
        };

        self.complex_types[slot] = Some(definition);
        Ok(name)
    }

    /// Record a named use of a type, keeping the first prefix chain per
    /// distinct (tag, type) pair
    fn record(&mut self, tag: &str, type_name: &str, chain: &[String]) {
        let already = self
            .recorded
            .iter()
            .any(|e| e.tag == tag && e.type_name == type_name);
        if already {
            return;
        }
        self.recorded.push(RecordedElement {
            tag: tag.to_string(),
            type_name: type_name.to_string(),
            prefix_chain: chain.to_vec(),
        });
    }
}

/// Local `<xsd:element name=… type=…>` with occurrence attributes
fn local_element(key: &str, type_name: &str, occurs: &[(&str, &str)]) -> Element {
    let mut attributes = vec![("name", key), ("type", type_name)];
    attributes.extend_from_slice(occurs);
    XsdBuilder::element("element", &attributes)
}

/// Extend a prefix chain on descent into a class at element `key`
///
/// The new nearest entry is the title-cased key; every prior entry gains the
/// key as a suffix, so entry `i` always concatenates the `i + 1` nearest
/// ancestors, outermost first.
fn extend_chain(chain: &[String], key: &str) -> Vec<String> {
    let titled = title_case(key);
    let mut extended = Vec::with_capacity(chain.len() + 1);
    extended.push(titled.clone());
    for entry in chain {
        extended.push(format!("{}{}", entry, titled));
    }
    extended
}

/// Uppercase the first character
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// XSD type name for a primitive kind, `None` for structural kinds
fn primitive_type_name(kind: &TypeKind) -> Option<&'static str> {
    match kind {
        TypeKind::Null => Some("nullType"),
        TypeKind::Bool => Some("boolean"),
        TypeKind::Integer => Some("integer"),
        TypeKind::Double => Some("decimal"),
        TypeKind::String => Some("string"),
        TypeKind::Transformed(StringFormat::Date) => Some("dateType"),
        TypeKind::Transformed(StringFormat::Time) => Some("timeType"),
        TypeKind::Transformed(StringFormat::DateTime) => Some("dateTime"),
        TypeKind::Transformed(StringFormat::Uri) => Some("uriType"),
        TypeKind::Transformed(StringFormat::IntegerString) => Some("integerStringType"),
        TypeKind::Transformed(StringFormat::BoolString) => Some("booleanStringType"),
        TypeKind::None
        | TypeKind::Any
        | TypeKind::Map
        | TypeKind::Object
        | TypeKind::Enum
        | TypeKind::Array { .. }
        | TypeKind::Class { .. }
        | TypeKind::Union { .. } => None,
    }
}

/// Short kind name for error messages
fn kind_name(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::None => "none",
        TypeKind::Any => "any",
        TypeKind::Null => "null",
        TypeKind::Bool => "bool",
        TypeKind::Integer => "integer",
        TypeKind::Double => "double",
        TypeKind::String => "string",
        TypeKind::Array { .. } => "array",
        TypeKind::Class { .. } => "class",
        TypeKind::Map => "map",
        TypeKind::Object => "object",
        TypeKind::Enum => "enum",
        TypeKind::Union { .. } => "union",
        TypeKind::Transformed(_) => "transformed-string",
    }
}
