//! Type graph inference
//!
//! Builds a type graph from one JSON sample so a render can run end to end.
//! Scalars type directly; strings are sniffed into transformed formats;
//! array items are unified pairwise. Unification merges classes
//! property-wise (a property missing on one side becomes optional), widens
//! integer with double, joins distinct primitives into a primitive union,
//! and collapses mixed structural kinds to `any`.

use serde_json::Value;

use crate::formats::StringFormatRecognizer;
use crate::typegraph::{ClassProperty, StringFormat, TypeGraph, TypeKind, TypeRef};

/// Infer a type graph with a single named top level
pub fn infer_type_graph(
    top_name: &str,
    value: &Value,
    recognizer: &dyn StringFormatRecognizer,
) -> TypeGraph {
    let mut graph = TypeGraph::new();
    let top = infer_value(&mut graph, value, recognizer);
    graph.add_top_level(top_name, top);
    graph
}

fn infer_value(graph: &mut TypeGraph, value: &Value, recognizer: &dyn StringFormatRecognizer) -> TypeRef {
    match value {
        Value::Null => graph.add(TypeKind::Null),
        Value::Bool(_) => graph.add(TypeKind::Bool),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                graph.add(TypeKind::Integer)
            } else {
                graph.add(TypeKind::Double)
            }
        }
        Value::String(s) => match sniff_string(s, recognizer) {
            Some(format) => graph.add(TypeKind::Transformed(format)),
            None => graph.add(TypeKind::String),
        },
        Value::Array(items) => {
            let mut item_ref: Option<TypeRef> = None;
            for item in items {
                let next = infer_value(graph, item, recognizer);
                item_ref = Some(match item_ref {
                    Some(prev) => unify(graph, prev, next),
                    None => next,
                });
            }
            let items = item_ref.unwrap_or_else(|| graph.add(TypeKind::Any));
            graph.add(TypeKind::Array { items })
        }
        Value::Object(map) => {
            let mut properties = Vec::with_capacity(map.len());
            for (name, entry) in map {
                let ty = infer_value(graph, entry, recognizer);
                properties.push(ClassProperty {
                    name: name.clone(),
                    ty,
                    optional: false,
                });
            }
            graph.add(TypeKind::Class { properties })
        }
    }
}

/// Recognized transformed-string format of a sample string
fn sniff_string(s: &str, recognizer: &dyn StringFormatRecognizer) -> Option<StringFormat> {
    if recognizer.is_date(s) {
        Some(StringFormat::Date)
    } else if recognizer.is_time(s) {
        Some(StringFormat::Time)
    } else if recognizer.is_date_time(s) {
        Some(StringFormat::DateTime)
    } else if recognizer.is_uri(s) {
        Some(StringFormat::Uri)
    } else if s.parse::<i64>().is_ok() {
        Some(StringFormat::IntegerString)
    } else if s == "true" || s == "false" {
        Some(StringFormat::BoolString)
    } else {
        None
    }
}

/// Unify two inferred types into one
fn unify(graph: &mut TypeGraph, a: TypeRef, b: TypeRef) -> TypeRef {
    if a == b || graph.kind(a) == graph.kind(b) {
        return a;
    }

    let (ka, kb) = (graph.kind(a).clone(), graph.kind(b).clone());
    match (ka, kb) {
        (TypeKind::Integer, TypeKind::Double) | (TypeKind::Double, TypeKind::Integer) => {
            graph.add(TypeKind::Double)
        }

        // lexically both are strings, so the join is the plain string type
        (TypeKind::Transformed(_), TypeKind::Transformed(_))
        | (TypeKind::Transformed(_), TypeKind::String)
        | (TypeKind::String, TypeKind::Transformed(_)) => graph.add(TypeKind::String),

        (TypeKind::Class { properties: pa }, TypeKind::Class { properties: pb }) => {
            let properties = unify_properties(graph, pa, pb);
            graph.add(TypeKind::Class { properties })
        }

        (TypeKind::Array { items: ia }, TypeKind::Array { items: ib }) => {
            let items = unify(graph, ia, ib);
            graph.add(TypeKind::Array { items })
        }

        (TypeKind::Union { members }, other) if other.is_primitive() => {
            let members = extend_union(graph, members, b);
            graph.add(TypeKind::Union { members })
        }
        (other, TypeKind::Union { members }) if other.is_primitive() => {
            let members = extend_union(graph, members, a);
            graph.add(TypeKind::Union { members })
        }
        (TypeKind::Union { members: ma }, TypeKind::Union { members: mb }) => {
            let mut members = ma;
            for member in mb {
                members = extend_union(graph, members, member);
            }
            graph.add(TypeKind::Union { members })
        }

        (ka, kb) if ka.is_primitive() && kb.is_primitive() => graph.add(TypeKind::Union {
            members: vec![a, b],
        }),

        // structurally incompatible samples carry no usable shape
        _ => graph.add(TypeKind::Any),
    }
}

fn unify_properties(
    graph: &mut TypeGraph,
    a: Vec<ClassProperty>,
    b: Vec<ClassProperty>,
) -> Vec<ClassProperty> {
    let mut merged: Vec<ClassProperty> = Vec::with_capacity(a.len());

    for prop in &a {
        match b.iter().find(|p| p.name == prop.name) {
            Some(other) => {
                let ty = unify(graph, prop.ty, other.ty);
                merged.push(ClassProperty {
                    name: prop.name.clone(),
                    ty,
                    optional: prop.optional || other.optional,
                });
            }
            None => merged.push(ClassProperty {
                optional: true,
                ..prop.clone()
            }),
        }
    }

    for prop in b {
        if !a.iter().any(|p| p.name == prop.name) {
            merged.push(ClassProperty {
                optional: true,
                ..prop
            });
        }
    }

    merged
}

/// Add a member to a union unless an equal kind is already present
fn extend_union(graph: &mut TypeGraph, mut members: Vec<TypeRef>, new: TypeRef) -> Vec<TypeRef> {
    let new_kind = graph.kind(new).clone();
    if !members.iter().any(|m| *graph.kind(*m) == new_kind) {
        members.push(new);
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::RegexRecognizer;
    use serde_json::json;

    fn infer(value: &Value) -> (TypeGraph, TypeRef) {
        let recognizer = RegexRecognizer::new();
        let graph = infer_type_graph("Root", value, &recognizer);
        let (_, top) = graph.single_top_level().unwrap();
        (graph, top)
    }

    #[test]
    fn test_scalars() {
        let (graph, top) = infer(&json!({"a": 1, "b": 2.5, "c": true, "d": null, "e": "x"}));

        let TypeKind::Class { properties } = graph.kind(top) else {
            panic!("expected class");
        };
        let kinds: Vec<_> = properties.iter().map(|p| graph.kind(p.ty)).collect();
        assert_eq!(
            kinds,
            [
                &TypeKind::Integer,
                &TypeKind::Double,
                &TypeKind::Bool,
                &TypeKind::Null,
                &TypeKind::String
            ]
        );
    }

    #[test]
    fn test_string_sniffing() {
        let (graph, top) = infer(&json!({
            "d": "01.02.2023",
            "t": "14:30",
            "dt": "01.02.2023 14:30",
            "u": "https://example.com/a",
            "i": "42",
            "b": "true"
        }));

        let TypeKind::Class { properties } = graph.kind(top) else {
            panic!("expected class");
        };
        let formats: Vec<_> = properties
            .iter()
            .map(|p| match graph.kind(p.ty) {
                TypeKind::Transformed(f) => *f,
                other => panic!("expected transformed string, got {:?}", other),
            })
            .collect();
        assert_eq!(
            formats,
            [
                StringFormat::Date,
                StringFormat::Time,
                StringFormat::DateTime,
                StringFormat::Uri,
                StringFormat::IntegerString,
                StringFormat::BoolString
            ]
        );
    }

    #[test]
    fn test_array_items_unify_to_double() {
        let (graph, top) = infer(&json!([1, 2.5, 3]));

        let TypeKind::Array { items } = graph.kind(top) else {
            panic!("expected array");
        };
        assert_eq!(graph.kind(*items), &TypeKind::Double);
    }

    #[test]
    fn test_mixed_primitives_form_union() {
        let (graph, top) = infer(&json!([1, "A", 2]));

        let TypeKind::Array { items } = graph.kind(top) else {
            panic!("expected array");
        };
        let TypeKind::Union { members } = graph.kind(*items) else {
            panic!("expected union, got {:?}", graph.kind(*items));
        };
        let kinds: Vec<_> = members.iter().map(|m| graph.kind(*m)).collect();
        assert_eq!(kinds, [&TypeKind::Integer, &TypeKind::String]);
    }

    #[test]
    fn test_object_merge_marks_optional() {
        let (graph, top) = infer(&json!([
            {"a": 1, "b": "x"},
            {"a": 2}
        ]));

        let TypeKind::Array { items } = graph.kind(top) else {
            panic!("expected array");
        };
        let TypeKind::Class { properties } = graph.kind(*items) else {
            panic!("expected class");
        };

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].name, "a");
        assert!(!properties[0].optional);
        assert_eq!(properties[1].name, "b");
        assert!(properties[1].optional);
    }

    #[test]
    fn test_mixed_structures_collapse_to_any() {
        let (graph, top) = infer(&json!([{"a": 1}, [2]]));

        let TypeKind::Array { items } = graph.kind(top) else {
            panic!("expected array");
        };
        assert_eq!(graph.kind(*items), &TypeKind::Any);
    }

    #[test]
    fn test_property_order_preserved() {
        let (graph, top) = infer(&json!({"z": 1, "a": 2, "m": 3}));

        let TypeKind::Class { properties } = graph.kind(top) else {
            panic!("expected class");
        };
        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
