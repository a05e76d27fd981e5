//! Render pipeline
//!
//! One render owns the full pass: check the single top level, lower the
//! graph, resolve top-level elements, pretty-print the schema, re-index it,
//! and convert the input document. All lowerer, indexer, and converter
//! state is constructed per render and dies with it.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::convert::JsonToXml;
use crate::error::Result;
use crate::formats::{DateOrder, RegexRecognizer, StringFormatRecognizer};
use crate::infer::infer_type_graph;
use crate::typegraph::TypeGraph;
use crate::xsd::{self, XsdIndex};

/// Configuration for a render
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Name of the top-level element when inferring from a sample
    pub top_level: String,
    /// Date order accepted by the format recognizer
    pub date_order: DateOrder,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            top_level: "Root".to_string(),
            date_order: DateOrder::default(),
        }
    }
}

impl RenderConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top-level element name
    pub fn with_top_level(mut self, name: impl Into<String>) -> Self {
        self.top_level = name.into();
        self
    }

    /// Set the accepted date order
    pub fn with_date_order(mut self, date_order: DateOrder) -> Self {
        self.date_order = date_order;
        self
    }
}

/// The two rendered documents
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Pretty-printed schema text
    pub xsd: String,
    /// Pretty-printed instance text
    pub xml: String,
    /// Resolved tag of the top-level element
    pub root_tag: String,
}

/// Render a type graph and a conforming JSON document to schema and
/// instance text
///
/// `xsd_file_name` is what the instance root points at through
/// `xsd:noNamespaceSchemaLocation`.
pub fn render(
    graph: &TypeGraph,
    value: &Value,
    xsd_file_name: &str,
    recognizer: &dyn StringFormatRecognizer,
) -> Result<Rendered> {
    let (schema, root_tag) = xsd::render_schema(graph)?;
    let xsd_text = schema.to_pretty_string()?;

    let index = XsdIndex::parse(&xsd_text)?;
    let converter = JsonToXml::new(&index, recognizer);
    let xml_root = converter.convert(&root_tag, value, xsd_file_name)?;
    let xml_text = xml_root.to_pretty_string()?;

    Ok(Rendered {
        xsd: xsd_text,
        xml: xml_text,
        root_tag,
    })
}

/// Infer a graph from a JSON file and write `<base>.xsd` and `<base>.xml`
///
/// Returns the two output paths.
pub fn render_files(
    input: &Path,
    out_base: &Path,
    config: &RenderConfig,
) -> Result<(PathBuf, PathBuf)> {
    let text = fs::read_to_string(input)?;
    let value: Value = serde_json::from_str(&text)?;

    let recognizer = RegexRecognizer::with_date_order(config.date_order);
    let graph = infer_type_graph(&config.top_level, &value, &recognizer);

    let xsd_path = out_base.with_extension("xsd");
    let xml_path = out_base.with_extension("xml");
    let xsd_file_name = xsd_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema.xsd".to_string());

    let rendered = render(&graph, &value, &xsd_file_name, &recognizer)?;

    fs::write(&xsd_path, &rendered.xsd)?;
    fs::write(&xml_path, &rendered.xml)?;
    Ok((xsd_path, xml_path))
}
