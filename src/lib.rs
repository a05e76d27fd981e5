//! # jsonxsd
//!
//! Synthesizes an XML Schema (XSD) from a type graph inferred over JSON
//! sample data, and converts between JSON and XML instances driven by that
//! schema.
//!
//! ## Features
//!
//! - Type graph consumption: primitives, arrays, classes, primitive unions,
//!   transformed strings (dates, times, URIs, stringly numbers/booleans)
//! - Named complex-type deduplication with collision-resolving top-level
//!   element naming
//! - Schema re-indexing into path-keyed dictionaries
//! - Bidirectional, schema-driven JSON/XML conversion with round-trip
//!   semantics
//! - One-sample type inference so a render can run end to end
//!
//! ## Example
//!
//! ```rust,ignore
//! use jsonxsd::formats::RegexRecognizer;
//! use jsonxsd::infer::infer_type_graph;
//! use jsonxsd::render::render;
//!
//! let value = serde_json::json!({"a": 1, "b": "x"});
//! let recognizer = RegexRecognizer::new();
//! let graph = infer_type_graph("Root", &value, &recognizer);
//! let rendered = render(&graph, &value, "out.xsd", &recognizer)?;
//! println!("{}", rendered.xsd);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub mod document;
pub mod formats;
pub mod typegraph;

pub mod infer;
pub mod xsd;

pub mod convert;
pub mod render;

// Re-exports for convenience
pub use error::{Error, Result};

/// Version of the jsonxsd library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
