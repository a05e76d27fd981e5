//! XSD synthesis
//!
//! The schema side of the crate: builder helpers for `xsd:`-prefixed
//! elements, the fixed library of derived simple types, the type-graph
//! lowerer, the top-level element resolver, and the indexer that turns an
//! emitted schema back into path-keyed dictionaries for the converter.

mod basics;
mod builder;
mod index;
mod lower;
mod resolve;

pub use basics::emit_basic_types;
pub use builder::XsdBuilder;
pub use index::{ArrayInfo, Kind, PropertyInfo, XsdIndex};
pub use lower::{Lowerer, RecordedElement};
pub use resolve::resolve_elements;

use crate::document::Element;
use crate::error::Result;
use crate::typegraph::TypeGraph;

/// Render a type graph into a complete `<xsd:schema>` document
///
/// Returns the schema element together with the resolved name of the
/// top-level element, which is the tag conversion starts from.
pub fn render_schema(graph: &TypeGraph) -> Result<(Element, String)> {
    let (top_name, top_ref) = graph.single_top_level()?;

    let mut lowerer = Lowerer::new(graph);
    lowerer.lower_top_level(top_name, top_ref)?;

    let mut schema = XsdBuilder::schema();
    emit_basic_types(&mut schema);

    let (complex_types, recorded) = lowerer.finish()?;
    for complex_type in complex_types {
        schema.add_child(complex_type);
    }

    let (elements, root_tag) = resolve_elements(&recorded, top_name)?;
    for element in elements {
        schema.add_child(element);
    }

    Ok((schema, root_tag))
}
