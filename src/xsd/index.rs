//! Schema indexing
//!
//! Re-parses an emitted schema into dictionaries the converter can walk:
//! by-name maps over simple types, complex types, and top-level elements,
//! plus by-path dictionaries keyed by dotted tag paths from each top-level
//! element. The converter never touches the schema tree itself; it drives
//! entirely off these tables.

use std::collections::HashMap;

use crate::document::Element;
use crate::error::{Error, Result};

/// Classified kind of a referenced type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Unclassifiable
    None,
    /// Passthrough
    Any,
    /// Null (empty string content)
    Null,
    /// Boolean
    Bool,
    /// Integral number
    Integer,
    /// Decimal number
    Double,
    /// Plain string
    Str,
    /// Recognized date
    Date,
    /// Recognized time
    Time,
    /// Recognized date-time
    DateTime,
    /// Recognized URI
    Uri,
    /// Integer carried as a string
    IntegerString,
    /// Boolean carried as a string
    BoolString,
    /// Union of primitive kinds
    Union,
    /// Array complex type
    Array,
    /// Class complex type
    Class,
}

/// One declared property of a class complex type
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    /// Referenced type name
    pub type_name: String,
    /// True when the declaration carries `minOccurs="0"`
    pub optional: bool,
    /// Classified kind of the referenced type
    pub kind: Kind,
}

/// The item shape of an array complex type
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInfo {
    /// Tag of the repeated item element
    pub item_tag: String,
    /// Referenced item type name
    pub item_type: String,
    /// Classified kind of the item type
    pub item_kind: Kind,
}

#[derive(Default)]
struct PathTables {
    objects: HashMap<String, Vec<(String, PropertyInfo)>>,
    arrays: HashMap<String, ArrayInfo>,
    unions: HashMap<String, Vec<Kind>>,
}

/// Dictionaries extracted from an emitted schema
pub struct XsdIndex {
    simple_types: HashMap<String, Element>,
    complex_types: HashMap<String, Element>,
    elements: Vec<(String, String)>,
    objects_by_path: HashMap<String, Vec<(String, PropertyInfo)>>,
    arrays_by_path: HashMap<String, ArrayInfo>,
    unions_by_path: HashMap<String, Vec<Kind>>,
}

impl XsdIndex {
    /// Parse schema text and build all dictionaries
    pub fn parse(xsd: &str) -> Result<Self> {
        Self::from_document(&Element::parse(xsd)?)
    }

    /// Build all dictionaries from a parsed schema document
    pub fn from_document(schema: &Element) -> Result<Self> {
        if schema.local_name() != "schema" {
            return Err(Error::Xml(format!(
                "expected schema root, found <{}>",
                schema.tag
            )));
        }

        let mut simple_types = HashMap::new();
        let mut complex_types = HashMap::new();
        let mut elements = Vec::new();

        for child in &schema.children {
            match (child.local_name(), child.get_attribute("name")) {
                ("simpleType", Some(name)) => {
                    simple_types.insert(name.to_string(), child.clone());
                }
                ("complexType", Some(name)) => {
                    complex_types.insert(name.to_string(), child.clone());
                }
                ("element", Some(name)) => {
                    let type_name = child.get_attribute("type").ok_or_else(|| {
                        Error::Xml(format!("top-level element '{}' has no type", name))
                    })?;
                    elements.push((name.to_string(), type_name.to_string()));
                }
                _ => {}
            }
        }

        let mut index = Self {
            simple_types,
            complex_types,
            elements,
            objects_by_path: HashMap::new(),
            arrays_by_path: HashMap::new(),
            unions_by_path: HashMap::new(),
        };

        let mut tables = PathTables::default();
        for (tag, type_name) in index.elements.clone() {
            let mut stack = Vec::new();
            index.descend(tag, &type_name, &mut stack, &mut tables);
        }

        index.objects_by_path = tables.objects;
        index.arrays_by_path = tables.arrays;
        index.unions_by_path = tables.unions;
        Ok(index)
    }

    /// Classify a referenced type name
    pub fn classify(&self, type_name: &str) -> Kind {
        if let Some(kind) = primitive_kind(type_name) {
            return kind;
        }
        if self.union_members(type_name).is_some() {
            return Kind::Union;
        }
        if self.array_info(type_name).is_some() {
            return Kind::Array;
        }
        if self.class_properties(type_name).is_some() {
            return Kind::Class;
        }
        Kind::None
    }

    /// Top-level element declarations in schema order
    pub fn elements(&self) -> &[(String, String)] {
        &self.elements
    }

    /// Type referenced by a top-level element
    pub fn element_type(&self, tag: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, ty)| ty.as_str())
    }

    /// Class properties at a dotted path
    pub fn object_at(&self, path: &str) -> Option<&[(String, PropertyInfo)]> {
        self.objects_by_path.get(path).map(|v| v.as_slice())
    }

    /// Array shape at a dotted path
    pub fn array_at(&self, path: &str) -> Option<&ArrayInfo> {
        self.arrays_by_path.get(path)
    }

    /// Union member kinds at a dotted path
    pub fn union_at(&self, path: &str) -> Option<&[Kind]> {
        self.unions_by_path.get(path).map(|v| v.as_slice())
    }

    fn descend(
        &self,
        path: String,
        type_name: &str,
        stack: &mut Vec<String>,
        tables: &mut PathTables,
    ) {
        match self.classify(type_name) {
            Kind::Union => {
                if let Some(members) = self.union_members(type_name) {
                    tables.unions.insert(path, members);
                }
            }
            Kind::Array => {
                let Some(info) = self.array_info(type_name) else {
                    return;
                };
                let item_path = format!("{}.{}", path, info.item_tag);
                let item_type = info.item_type.clone();
                tables.arrays.insert(path, info);

                // recursion through named types is what a cyclic graph
                // looks like here; one unrolling is enough
                if !stack.iter().any(|s| s == type_name) {
                    stack.push(type_name.to_string());
                    self.descend(item_path, &item_type, stack, tables);
                    stack.pop();
                }
            }
            Kind::Class => {
                let Some(properties) = self.class_properties(type_name) else {
                    return;
                };
                if !stack.iter().any(|s| s == type_name) {
                    stack.push(type_name.to_string());
                    for (prop_name, info) in &properties {
                        let prop_path = format!("{}.{}", path, prop_name);
                        self.descend(prop_path, &info.type_name, stack, tables);
                    }
                    stack.pop();
                }
                tables.objects.insert(path, properties);
            }
            _ => {} // primitives are leaves
        }
    }

    /// Ordered member kinds when the name is a primitive-membered union
    fn union_members(&self, type_name: &str) -> Option<Vec<Kind>> {
        let union = self.simple_types.get(type_name)?.find_child("union")?;

        let mut members = Vec::with_capacity(union.children.len());
        for wrapper in &union.children {
            let base = wrapper.find_child("restriction")?.get_attribute("base")?;
            members.push(primitive_kind(base)?);
        }
        Some(members)
    }

    /// Item shape when the name is an array complex type
    fn array_info(&self, type_name: &str) -> Option<ArrayInfo> {
        let sequence = self.complex_types.get(type_name)?.find_child("sequence")?;
        let item = sequence.find_child("element")?;

        if item.get_attribute("maxOccurs") != Some("unbounded")
            || item.get_attribute("minOccurs") != Some("0")
        {
            return None;
        }

        let item_tag = item.get_attribute("name")?.to_string();
        let item_type = item.get_attribute("type")?.to_string();
        let item_kind = self.classify(&item_type);
        Some(ArrayInfo {
            item_tag,
            item_type,
            item_kind,
        })
    }

    /// Ordered property map when the name is a class complex type
    fn class_properties(&self, type_name: &str) -> Option<Vec<(String, PropertyInfo)>> {
        let all = self.complex_types.get(type_name)?.find_child("all")?;

        let mut properties = Vec::with_capacity(all.children.len());
        for child in &all.children {
            if child.local_name() != "element" {
                continue;
            }
            let name = child.get_attribute("name")?.to_string();
            let prop_type = child.get_attribute("type")?.to_string();
            let optional = child.get_attribute("minOccurs") == Some("0");
            let kind = self.classify(&prop_type);
            properties.push((
                name,
                PropertyInfo {
                    type_name: prop_type,
                    optional,
                    kind,
                },
            ));
        }
        Some(properties)
    }
}

/// Kind for a known primitive type mapping
fn primitive_kind(type_name: &str) -> Option<Kind> {
    match type_name {
        "xsd:string" => Some(Kind::Str),
        "xsd:integer" => Some(Kind::Integer),
        "xsd:decimal" => Some(Kind::Double),
        "xsd:boolean" => Some(Kind::Bool),
        "xsd:date" => Some(Kind::Date),
        "xsd:time" => Some(Kind::Time),
        "xsd:dateTime" => Some(Kind::DateTime),
        "nullType" => Some(Kind::Null),
        "dateType" => Some(Kind::Date),
        "timeType" => Some(Kind::Time),
        "uriType" => Some(Kind::Uri),
        "integerStringType" => Some(Kind::IntegerString),
        "booleanStringType" => Some(Kind::BoolString),
        _ => None,
    }
}
