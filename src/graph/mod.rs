//! Execution-graph documents and their diagram projection.
//!
//! Each workflow/subflow span carries the statically-declared execution
//! graph it ran, captured as a JSON document. [`document`] parses and
//! validates that document (it is untrusted input — historical recordings
//! drift), and [`mermaid`] renders it to deterministic diagram notation
//! together with a bidirectional registry mapping domain node ids to the
//! identifiers that appear in the rendered text.

pub mod document;
pub mod mermaid;

pub use document::{GraphDocument, GraphEdge, GraphError, GraphNode, SUPPORTED_VERSION};
pub use mermaid::{RenderOptions, RenderRegistry, RenderedGraph, render};
