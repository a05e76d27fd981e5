//! Schema-driven JSON/XML conversion
//!
//! Both directions walk the path-indexed dictionaries from [`XsdIndex`] in
//! lock-step with the document tree: the current dotted path selects the
//! expected structure, the structure selects the conversion. Primitive
//! coercion is a pair of total tables returning `None` on mismatch, which
//! the walkers turn into a malformed-input error at the current path.

use serde_json::{Map, Number, Value};

use crate::document::Element;
use crate::error::{malformed, Result};
use crate::formats::StringFormatRecognizer;
use crate::xsd::{Kind, PropertyInfo, XsdIndex};
use crate::XSI_NAMESPACE;

/// JSON to XML conversion
pub struct JsonToXml<'a> {
    index: &'a XsdIndex,
    recognizer: &'a dyn StringFormatRecognizer,
}

impl<'a> JsonToXml<'a> {
    /// Create a converter over an indexed schema
    pub fn new(index: &'a XsdIndex, recognizer: &'a dyn StringFormatRecognizer) -> Self {
        Self { index, recognizer }
    }

    /// Convert a JSON document into an XML element tree
    ///
    /// `schema_location` is written onto the root element as
    /// `xsd:noNamespaceSchemaLocation`.
    pub fn convert(&self, root_tag: &str, value: &Value, schema_location: &str) -> Result<Element> {
        let kind = if value.is_array() {
            Kind::Array
        } else if value.is_object() {
            Kind::Class
        } else {
            self.index
                .element_type(root_tag)
                .map(|t| self.index.classify(t))
                .unwrap_or(Kind::None)
        };

        let mut root = self.node(root_tag, kind, value, root_tag)?;
        root.attributes.insert(0, ("xmlns:xsd".to_string(), XSI_NAMESPACE.to_string()));
        root.attributes.insert(
            1,
            (
                "xsd:noNamespaceSchemaLocation".to_string(),
                schema_location.to_string(),
            ),
        );
        Ok(root)
    }

    fn node(&self, tag: &str, kind: Kind, value: &Value, path: &str) -> Result<Element> {
        match kind {
            Kind::Union => {
                let members = self
                    .index
                    .union_at(path)
                    .ok_or_else(|| malformed("no union declared", path))?;

                let text = members
                    .iter()
                    .find_map(|member| xml_primitive(*member, value, self.recognizer))
                    .ok_or_else(|| malformed("union with no matching member", path))?;

                Ok(text_element(tag, text))
            }
            Kind::Array => {
                let info = self
                    .index
                    .array_at(path)
                    .ok_or_else(|| malformed("no array declared", path))?;
                let items = value
                    .as_array()
                    .ok_or_else(|| malformed("value is not an array", path))?;

                let mut element = Element::new(tag);
                let item_path = format!("{}.{}", path, info.item_tag);
                for item in items {
                    element.add_child(self.node(
                        &info.item_tag,
                        info.item_kind,
                        item,
                        &item_path,
                    )?);
                }
                Ok(element)
            }
            Kind::Class => {
                let properties = self
                    .index
                    .object_at(path)
                    .ok_or_else(|| malformed("no class declared", path))?;
                let object = value
                    .as_object()
                    .ok_or_else(|| malformed("value is not an object", path))?;

                let mut element = Element::new(tag);
                for (key, entry) in object {
                    let info = find_property(properties, key)
                        .ok_or_else(|| malformed(format!("undeclared property '{}'", key), path))?;
                    let child_path = format!("{}.{}", path, key);
                    element.add_child(self.node(key, info.kind, entry, &child_path)?);
                }
                Ok(element)
            }
            primitive => {
                let text = xml_primitive(primitive, value, self.recognizer)
                    .ok_or_else(|| malformed("value does not match declared kind", path))?;
                Ok(text_element(tag, text))
            }
        }
    }
}

/// XML to JSON conversion
pub struct XmlToJson<'a> {
    index: &'a XsdIndex,
    recognizer: &'a dyn StringFormatRecognizer,
}

impl<'a> XmlToJson<'a> {
    /// Create a converter over an indexed schema
    pub fn new(index: &'a XsdIndex, recognizer: &'a dyn StringFormatRecognizer) -> Self {
        Self { index, recognizer }
    }

    /// Convert an XML element tree back into a JSON document
    pub fn convert(&self, root: &Element) -> Result<Value> {
        let path = root.tag.clone();
        let mut kind = self.object_kind(root, &path);
        if kind == Kind::None {
            kind = self
                .index
                .element_type(&root.tag)
                .map(|t| self.index.classify(t))
                .unwrap_or(Kind::None);
        }
        self.node(root, kind, &path)
    }

    fn node(&self, element: &Element, kind: Kind, path: &str) -> Result<Value> {
        match kind {
            Kind::Union => {
                let members = self
                    .index
                    .union_at(path)
                    .ok_or_else(|| malformed("no union declared", path))?;

                members
                    .iter()
                    .find_map(|member| json_primitive(*member, element, self.recognizer))
                    .ok_or_else(|| malformed("union with no matching member", path))
            }
            Kind::Array => {
                let info = self
                    .index
                    .array_at(path)
                    .ok_or_else(|| malformed("no array declared", path))?;

                if element.children.iter().any(|c| c.tag != info.item_tag) {
                    return Err(malformed(
                        format!("array may only contain '{}' items", info.item_tag),
                        path,
                    ));
                }

                let item_path = format!("{}.{}", path, info.item_tag);
                let mut items = Vec::with_capacity(element.children.len());
                for child in &element.children {
                    items.push(self.node(child, info.item_kind, &item_path)?);
                }
                Ok(Value::Array(items))
            }
            Kind::Class => {
                let properties = self
                    .index
                    .object_at(path)
                    .ok_or_else(|| malformed("no class declared", path))?;

                for (name, info) in properties {
                    if !info.optional && element.find_child(name).is_none() {
                        return Err(malformed(
                            format!("missing required property '{}'", name),
                            path,
                        ));
                    }
                }
                for child in &element.children {
                    if find_property(properties, &child.tag).is_none() {
                        return Err(malformed(
                            format!("undeclared property '{}'", child.tag),
                            path,
                        ));
                    }
                }

                let mut object = Map::new();
                for (name, info) in properties {
                    let Some(child) = element.find_child(name) else {
                        continue;
                    };
                    let child_path = format!("{}.{}", path, name);

                    // a structural property must look like what the schema
                    // declares; detection staying silent (e.g. an empty
                    // array element) is not a mismatch
                    if matches!(info.kind, Kind::Union | Kind::Array | Kind::Class) {
                        let detected = self.object_kind(child, &child_path);
                        if detected != Kind::None && detected != info.kind {
                            return Err(malformed(
                                format!("property '{}' does not match its declared kind", name),
                                &child_path,
                            ));
                        }
                    }

                    object.insert(name.clone(), self.node(child, info.kind, &child_path)?);
                }
                Ok(Value::Object(object))
            }
            primitive => json_primitive(primitive, element, self.recognizer)
                .ok_or_else(|| malformed("content does not match declared kind", path)),
        }
    }

    /// Structural kind detection for an XML subtree at a path
    fn object_kind(&self, element: &Element, path: &str) -> Kind {
        if self.index.union_at(path).is_some() {
            return Kind::Union;
        }
        if let Some(info) = self.index.array_at(path) {
            if element.find_child(&info.item_tag).is_some() {
                return Kind::Array;
            }
        }
        if let Some(properties) = self.index.object_at(path) {
            let required_present = properties
                .iter()
                .all(|(name, info)| info.optional || element.find_child(name).is_some());
            let children_declared = element
                .children
                .iter()
                .all(|child| find_property(properties, &child.tag).is_some());
            if required_present && children_declared {
                return Kind::Class;
            }
        }
        Kind::None
    }
}

fn find_property<'p>(
    properties: &'p [(String, PropertyInfo)],
    name: &str,
) -> Option<&'p PropertyInfo> {
    properties
        .iter()
        .find(|(prop_name, _)| prop_name == name)
        .map(|(_, info)| info)
}

fn text_element(tag: &str, text: String) -> Element {
    let mut element = Element::new(tag);
    if !text.is_empty() {
        element.text = Some(text);
    }
    element
}

/// XML-out coercion: JSON value to element text for a primitive kind
///
/// Total over the kind set; `None` means the value does not fit the kind.
fn xml_primitive(
    kind: Kind,
    value: &Value,
    recognizer: &dyn StringFormatRecognizer,
) -> Option<String> {
    match kind {
        Kind::Integer | Kind::Double => match value {
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        },
        Kind::IntegerString => match value {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => s.parse::<i64>().ok().map(|n| n.to_string()),
            _ => None,
        },
        Kind::Bool | Kind::BoolString => match value {
            Value::Bool(b) => Some(b.to_string()),
            Value::String(s) if s == "true" || s == "false" => Some(s.clone()),
            _ => None,
        },
        Kind::Date => recognized_string(value, |s| recognizer.is_date(s)),
        Kind::Time => recognized_string(value, |s| recognizer.is_time(s)),
        Kind::DateTime => recognized_string(value, |s| recognizer.is_date_time(s)),
        Kind::Uri => recognized_string(value, |s| recognizer.is_uri(s)),
        Kind::Null => match value {
            Value::Null => Some(String::new()),
            _ => None,
        },
        Kind::Str => match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        },
        Kind::Any | Kind::None => Some(String::new()),
        Kind::Union | Kind::Array | Kind::Class => None,
    }
}

fn recognized_string(value: &Value, accepts: impl Fn(&str) -> bool) -> Option<String> {
    match value {
        Value::String(s) if accepts(s) => Some(s.clone()),
        _ => None,
    }
}

/// JSON-out coercion: element content to JSON value for a primitive kind
fn json_primitive(
    kind: Kind,
    element: &Element,
    recognizer: &dyn StringFormatRecognizer,
) -> Option<Value> {
    let text = element.text.as_deref().unwrap_or("");
    match kind {
        Kind::Integer => text.parse::<i64>().ok().map(Value::from),
        Kind::Double => text.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number),
        Kind::IntegerString => text
            .parse::<i64>()
            .ok()
            .map(|n| Value::String(n.to_string())),
        Kind::Bool => match text {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        Kind::BoolString => match text {
            "true" | "false" => Some(Value::String(text.to_string())),
            _ => None,
        },
        Kind::Date => recognizer.is_date(text).then(|| Value::String(text.to_string())),
        Kind::Time => recognizer.is_time(text).then(|| Value::String(text.to_string())),
        Kind::DateTime => recognizer
            .is_date_time(text)
            .then(|| Value::String(text.to_string())),
        Kind::Uri => recognizer.is_uri(text).then(|| Value::String(text.to_string())),
        Kind::Null => text.is_empty().then_some(Value::Null),
        Kind::Str => Some(Value::String(text.to_string())),
        Kind::Any => match element.text.as_deref() {
            Some(text) => Some(Value::String(text.to_string())),
            None => Some(Value::Null),
        },
        Kind::None => text.is_empty().then_some(Value::Null),
        Kind::Union | Kind::Array | Kind::Class => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::RegexRecognizer;
    use serde_json::json;

    const SCHEMA: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <xsd:simpleType name="complexType3">
    <xsd:union>
      <xsd:simpleType>
        <xsd:restriction base="xsd:integer"/>
      </xsd:simpleType>
      <xsd:simpleType>
        <xsd:restriction base="xsd:string"/>
      </xsd:simpleType>
    </xsd:union>
  </xsd:simpleType>
  <xsd:complexType name="complexType1">
    <xsd:all>
      <xsd:element name="xs" type="complexType2"/>
      <xsd:element name="id" type="complexType3"/>
      <xsd:element name="d" type="dateType"/>
      <xsd:element name="note" type="xsd:string" minOccurs="0"/>
      <xsd:element name="gone" type="nullType"/>
    </xsd:all>
  </xsd:complexType>
  <xsd:complexType name="complexType2">
    <xsd:sequence>
      <xsd:element name="xsItem" type="xsd:integer" maxOccurs="unbounded" minOccurs="0"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:element name="Root" type="complexType1"/>
</xsd:schema>"#;

    fn index() -> XsdIndex {
        XsdIndex::parse(SCHEMA).unwrap()
    }

    fn document() -> Value {
        json!({
            "xs": [1, 2, 3],
            "id": 7,
            "d": "01.02.2023",
            "note": "x",
            "gone": null
        })
    }

    #[test]
    fn test_json_to_xml_shape() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let converter = JsonToXml::new(&index, &recognizer);

        let root = converter.convert("Root", &document(), "out.xsd").unwrap();

        assert_eq!(root.tag, "Root");
        assert_eq!(root.get_attribute("xmlns:xsd"), Some(XSI_NAMESPACE));
        assert_eq!(
            root.get_attribute("xsd:noNamespaceSchemaLocation"),
            Some("out.xsd")
        );

        let xs = root.find_child("xs").unwrap();
        let texts: Vec<_> = xs.children.iter().map(|c| c.text.as_deref().unwrap()).collect();
        assert_eq!(texts, ["1", "2", "3"]);
        assert!(xs.children.iter().all(|c| c.tag == "xsItem"));

        assert_eq!(root.find_child("id").unwrap().text.as_deref(), Some("7"));
        assert_eq!(root.find_child("d").unwrap().text.as_deref(), Some("01.02.2023"));

        // null renders as an empty element
        let gone = root.find_child("gone").unwrap();
        assert!(gone.text.is_none() && gone.children.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let to_xml = JsonToXml::new(&index, &recognizer);
        let to_json = XmlToJson::new(&index, &recognizer);

        let input = document();
        let xml = to_xml.convert("Root", &input, "out.xsd").unwrap();
        let output = to_json.convert(&xml).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn test_union_member_selection() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let to_xml = JsonToXml::new(&index, &recognizer);
        let to_json = XmlToJson::new(&index, &recognizer);

        let mut with_string_id = document();
        with_string_id["id"] = json!("A");

        let xml = to_xml.convert("Root", &with_string_id, "out.xsd").unwrap();
        assert_eq!(xml.find_child("id").unwrap().text.as_deref(), Some("A"));

        let output = to_json.convert(&xml).unwrap();
        assert_eq!(output["id"], json!("A"));
    }

    #[test]
    fn test_empty_array_roundtrip() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let to_xml = JsonToXml::new(&index, &recognizer);
        let to_json = XmlToJson::new(&index, &recognizer);

        let mut input = document();
        input["xs"] = json!([]);

        let xml = to_xml.convert("Root", &input, "out.xsd").unwrap();
        let xs = xml.find_child("xs").unwrap();
        assert!(xs.children.is_empty());

        let output = to_json.convert(&xml).unwrap();
        assert_eq!(output["xs"], json!([]));
    }

    #[test]
    fn test_missing_required_property() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let to_json = XmlToJson::new(&index, &recognizer);

        let xml = Element::parse(
            "<Root><xs/><d>01.02.2023</d><note>x</note><gone/></Root>",
        )
        .unwrap();

        let err = to_json.convert(&xml).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing required property 'id'"), "{}", msg);
        assert!(msg.contains("Root"), "{}", msg);
    }

    #[test]
    fn test_undeclared_property_rejected() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let to_xml = JsonToXml::new(&index, &recognizer);

        let mut input = document();
        input["extra"] = json!(1);

        let err = to_xml.convert("Root", &input, "out.xsd").unwrap_err();
        assert!(err.to_string().contains("undeclared property 'extra'"));
    }

    #[test]
    fn test_wrong_kind_reports_path() {
        let index = index();
        let recognizer = RegexRecognizer::new();
        let to_xml = JsonToXml::new(&index, &recognizer);

        let mut input = document();
        input["xs"] = json!({"not": "a list"});

        let err = to_xml.convert("Root", &input, "out.xsd").unwrap_err();
        assert!(err.to_string().contains("Root.xs"), "{}", err);
    }

    #[test]
    fn test_xml_primitive_table() {
        let rec = RegexRecognizer::new();

        assert_eq!(xml_primitive(Kind::Integer, &json!(5), &rec).as_deref(), Some("5"));
        assert_eq!(xml_primitive(Kind::Double, &json!(2.5), &rec).as_deref(), Some("2.5"));
        assert_eq!(xml_primitive(Kind::Integer, &json!("5"), &rec), None);

        // integer-string normalizes numeric input to a decimal string
        assert_eq!(
            xml_primitive(Kind::IntegerString, &json!(42), &rec).as_deref(),
            Some("42")
        );
        assert_eq!(
            xml_primitive(Kind::IntegerString, &json!("042"), &rec).as_deref(),
            Some("42")
        );

        assert_eq!(xml_primitive(Kind::Bool, &json!(true), &rec).as_deref(), Some("true"));
        assert_eq!(
            xml_primitive(Kind::BoolString, &json!("false"), &rec).as_deref(),
            Some("false")
        );
        assert_eq!(xml_primitive(Kind::Bool, &json!("yes"), &rec), None);

        assert_eq!(xml_primitive(Kind::Null, &Value::Null, &rec).as_deref(), Some(""));
        assert_eq!(xml_primitive(Kind::Null, &json!(0), &rec), None);

        assert_eq!(
            xml_primitive(Kind::Uri, &json!("https://example.com/x"), &rec).as_deref(),
            Some("https://example.com/x")
        );
        assert_eq!(xml_primitive(Kind::Uri, &json!("nope"), &rec), None);

        assert_eq!(xml_primitive(Kind::Any, &json!({"a": 1}), &rec).as_deref(), Some(""));
    }

    #[test]
    fn test_json_primitive_table() {
        let rec = RegexRecognizer::new();
        let with_text = |t: &str| Element::new("x").with_text(t);
        let empty = Element::new("x");

        assert_eq!(json_primitive(Kind::Integer, &with_text("5"), &rec), Some(json!(5)));
        assert_eq!(json_primitive(Kind::Double, &with_text("2.5"), &rec), Some(json!(2.5)));
        assert_eq!(json_primitive(Kind::Integer, &with_text("x"), &rec), None);

        assert_eq!(
            json_primitive(Kind::IntegerString, &with_text("42"), &rec),
            Some(json!("42"))
        );

        assert_eq!(json_primitive(Kind::Bool, &with_text("true"), &rec), Some(json!(true)));
        assert_eq!(
            json_primitive(Kind::BoolString, &with_text("true"), &rec),
            Some(json!("true"))
        );

        assert_eq!(json_primitive(Kind::Null, &empty, &rec), Some(Value::Null));
        assert_eq!(json_primitive(Kind::Null, &with_text("x"), &rec), None);

        // an empty element is the empty string for the string kind
        assert_eq!(json_primitive(Kind::Str, &empty, &rec), Some(json!("")));

        assert_eq!(json_primitive(Kind::None, &empty, &rec), Some(Value::Null));
        assert_eq!(json_primitive(Kind::None, &with_text("x"), &rec), None);
    }
}
