//! Inferred type graph
//!
//! The read-only description of a JSON shape that the schema renderer
//! consumes. Nodes live in an arena owned by [`TypeGraph`]; a [`TypeRef`] is
//! a stable handle usable as a map key, so structurally shared (and even
//! cyclic) graphs deduplicate naturally.

use crate::error::{Error, Result};

/// Opaque identity of a type node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(usize);

/// Recognized string transformation formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Combined date and time
    DateTime,
    /// http/https/ftp URI
    Uri,
    /// Integer carried as a string
    IntegerString,
    /// Boolean carried as a string
    BoolString,
}

/// A property of a class type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassProperty {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: TypeRef,
    /// Whether the property may be absent
    pub optional: bool,
}

/// A type node, tagged over the closed kind set
///
/// `Map`, `Object`, `Enum`, and unions with non-primitive members are part
/// of the kind set so dispatch stays exhaustive, but the renderer lowers
/// none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// No type information
    None,
    /// Any value
    Any,
    /// Exactly null
    Null,
    /// Boolean
    Bool,
    /// Integral number
    Integer,
    /// Floating-point number
    Double,
    /// Arbitrary string
    String,
    /// Homogeneous array
    Array {
        /// Item type
        items: TypeRef,
    },
    /// Class with named properties in declaration order
    Class {
        /// Properties in declaration order
        properties: Vec<ClassProperty>,
    },
    /// String-keyed map (not lowered)
    Map,
    /// Open-property object (not lowered)
    Object,
    /// Enumeration (not lowered)
    Enum,
    /// Union of member types
    Union {
        /// Member types in declaration order
        members: Vec<TypeRef>,
    },
    /// String matching a recognized format
    Transformed(StringFormat),
}

impl TypeKind {
    /// Whether this kind lowers to an inline primitive element
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeKind::Null
                | TypeKind::Bool
                | TypeKind::Integer
                | TypeKind::Double
                | TypeKind::String
                | TypeKind::Transformed(_)
        )
    }
}

/// Arena of type nodes plus the declared top levels
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    nodes: Vec<TypeKind>,
    top_levels: Vec<(String, TypeRef)>,
}

impl TypeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its handle
    pub fn add(&mut self, kind: TypeKind) -> TypeRef {
        self.nodes.push(kind);
        TypeRef(self.nodes.len() - 1)
    }

    /// Look up a node by handle
    pub fn kind(&self, r: TypeRef) -> &TypeKind {
        &self.nodes[r.0]
    }

    /// Replace a node in place
    ///
    /// Used by inference to tie recursive knots after children are built.
    pub fn replace(&mut self, r: TypeRef, kind: TypeKind) {
        self.nodes[r.0] = kind;
    }

    /// Declare a named top level
    pub fn add_top_level(&mut self, name: impl Into<String>, r: TypeRef) {
        self.top_levels.push((name.into(), r));
    }

    /// All declared top levels
    pub fn top_levels(&self) -> &[(String, TypeRef)] {
        &self.top_levels
    }

    /// The single top level this renderer supports
    pub fn single_top_level(&self) -> Result<(&str, TypeRef)> {
        match self.top_levels.as_slice() {
            [(name, r)] => Ok((name.as_str(), *r)),
            [] => Err(Error::NotImplemented("no top-level type".to_string())),
            many => Err(Error::NotImplemented(format!(
                "multiple top-level types ({})",
                many.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typeref_identity() {
        let mut graph = TypeGraph::new();
        let a = graph.add(TypeKind::Integer);
        let b = graph.add(TypeKind::Integer);

        assert_ne!(a, b);
        assert_eq!(graph.kind(a), graph.kind(b));
    }

    #[test]
    fn test_single_top_level() {
        let mut graph = TypeGraph::new();
        assert!(graph.single_top_level().is_err());

        let r = graph.add(TypeKind::String);
        graph.add_top_level("Root", r);
        let (name, top) = graph.single_top_level().unwrap();
        assert_eq!(name, "Root");
        assert_eq!(top, r);

        graph.add_top_level("Other", r);
        assert!(matches!(
            graph.single_top_level(),
            Err(Error::NotImplemented(_))
        ));
    }

    #[test]
    fn test_is_primitive() {
        assert!(TypeKind::Integer.is_primitive());
        assert!(TypeKind::Transformed(StringFormat::Date).is_primitive());
        assert!(!TypeKind::Map.is_primitive());
        assert!(!TypeKind::Array { items: TypeRef(0) }.is_primitive());
    }

    #[test]
    fn test_replace_for_recursion() {
        let mut graph = TypeGraph::new();
        let slot = graph.add(TypeKind::None);
        let arr = graph.add(TypeKind::Array { items: slot });
        graph.replace(
            slot,
            TypeKind::Class {
                properties: vec![ClassProperty {
                    name: "children".to_string(),
                    ty: arr,
                    optional: true,
                }],
            },
        );

        match graph.kind(slot) {
            TypeKind::Class { properties } => assert_eq!(properties[0].ty, arr),
            other => panic!("unexpected kind: {:?}", other),
        }
    }
}
