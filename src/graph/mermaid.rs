//! Mermaid flowchart rendering with a domain-id registry.
//!
//! Rendering is deterministic: nodes are declared before edges, both in
//! document order, and repeated calls over an unchanged document produce
//! byte-identical text. Every rendered node identifier is derived from its
//! domain id (sanitized, with deterministic de-collision) — never random —
//! and the [`RenderRegistry`] built during the same render call maps both
//! directions, so a click on a rendered element recovers the domain node id
//! without parsing renderer strings.

use rustc_hash::FxHashMap;

use crate::graph::document::{GraphDocument, GraphError, GraphNode};

/// Rendering switches.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Emit edge condition labels.
    pub show_edge_labels: bool,
}

/// Bidirectional map between domain node ids and rendered identifiers.
///
/// Built once per render call; both directions are exact lookups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderRegistry {
    by_domain: FxHashMap<String, String>,
    by_rendered: FxHashMap<String, String>,
}

impl RenderRegistry {
    fn insert(&mut self, domain: &str, rendered: String) {
        self.by_domain.insert(domain.to_string(), rendered.clone());
        self.by_rendered.insert(rendered, domain.to_string());
    }

    /// The identifier a domain node was rendered as.
    pub fn rendered_id(&self, domain: &str) -> Option<&str> {
        self.by_domain.get(domain).map(String::as_str)
    }

    /// The domain node behind a rendered identifier.
    pub fn domain_id(&self, rendered: &str) -> Option<&str> {
        self.by_rendered.get(rendered).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_domain.is_empty()
    }
}

/// A fully rendered diagram plus its id registry.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedGraph {
    /// Mermaid flowchart text for the external renderer.
    pub text: String,
    pub registry: RenderRegistry,
}

/// Render a graph document to Mermaid flowchart notation.
///
/// The document is re-validated first; rendering never partially succeeds.
///
/// # Examples
///
/// ```rust
/// use tracelens::graph::{GraphDocument, RenderOptions, render};
///
/// let doc = GraphDocument::parse(
///     r#"{"v":1,
///         "nodes":[{"id":"a","type":"node","label":"Load"},
///                  {"id":"b","type":"node","label":"Store"}],
///         "edges":[{"id":"e1","source":"a","target":"b","condition":"ok"}]}"#,
/// ).unwrap();
///
/// let rendered = render(&doc, &RenderOptions { show_edge_labels: true }).unwrap();
/// assert!(rendered.text.starts_with("flowchart TD"));
/// assert!(rendered.text.contains(r#"-->|"ok"|"#));
/// assert_eq!(rendered.registry.domain_id(rendered.registry.rendered_id("a").unwrap()), Some("a"));
/// ```
pub fn render(doc: &GraphDocument, options: &RenderOptions) -> Result<RenderedGraph, GraphError> {
    doc.validate()?;

    let mut registry = RenderRegistry::default();
    for node in &doc.nodes {
        let rendered = unique_render_id(&node.id, &registry);
        registry.insert(&node.id, rendered);
    }

    let by_id: FxHashMap<&str, &GraphNode> = doc
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();

    let mut text = String::from("flowchart TD\n");
    for node in doc.top_level_nodes() {
        emit_node(&mut text, node, &by_id, &registry, 1);
    }
    for edge in &doc.edges {
        let source = registry
            .rendered_id(&edge.source)
            .unwrap_or(edge.source.as_str());
        let target = registry
            .rendered_id(&edge.target)
            .unwrap_or(edge.target.as_str());
        match edge.condition.as_deref().filter(|_| options.show_edge_labels) {
            Some(condition) if !condition.is_empty() => {
                text.push_str(&format!(
                    "  {source} -->|\"{}\"| {target}\n",
                    escape_label(condition)
                ));
            }
            _ => text.push_str(&format!("  {source} --> {target}\n")),
        }
    }

    Ok(RenderedGraph { text, registry })
}

fn emit_node(
    text: &mut String,
    node: &GraphNode,
    by_id: &FxHashMap<&str, &GraphNode>,
    registry: &RenderRegistry,
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    let rendered = registry.rendered_id(&node.id).unwrap_or(node.id.as_str());
    let label = escape_label(&node.label);
    if node.is_subgraph {
        text.push_str(&format!("{indent}subgraph {rendered}[\"{label}\"]\n"));
        for child_id in &node.children {
            // Validation guarantees children resolve.
            if let Some(&child) = by_id.get(child_id.as_str()) {
                emit_node(text, child, by_id, registry, depth + 1);
            }
        }
        text.push_str(&format!("{indent}end\n"));
    } else {
        text.push_str(&format!("{indent}{rendered}[\"{label}\"]\n"));
    }
}

/// Derive a Mermaid-safe identifier from a domain id, suffixing on
/// collision so the registry stays unambiguous.
fn unique_render_id(domain_id: &str, registry: &RenderRegistry) -> String {
    let base = sanitize_id(domain_id);
    if registry.domain_id(&base).is_none() {
        return base;
    }
    let mut n: usize = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if registry.domain_id(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

fn sanitize_id(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        out.insert_str(0, "n_");
    }
    out
}

/// Escape label text for a double-quoted Mermaid string.
fn escape_label(label: &str) -> String {
    label
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
