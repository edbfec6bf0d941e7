//! Parsing and validation of execution-graph documents.
//!
//! # JSON wire format
//!
//! ```json
//! {
//!   "v": 1,
//!   "nodes": [
//!     {"id": "ingest", "type": "node", "label": "Ingest"},
//!     {"id": "grp", "type": "group", "label": "Fan-out",
//!      "isSubgraph": true, "children": ["a", "b"]},
//!     {"id": "a", "type": "node", "label": "A"},
//!     {"id": "b", "type": "node", "label": "B"}
//!   ],
//!   "edges": [
//!     {"id": "e1", "source": "ingest", "target": "grp", "condition": null}
//!   ]
//! }
//! ```
//!
//! Documents come from historical recordings and are treated as untrusted:
//! unknown fields, unknown edge endpoints, duplicate ids, dangling or
//! reparented children, and subgraph cycles all fail parsing with a
//! descriptive error. A parsed [`GraphDocument`] is structurally sound.

use miette::Diagnostic;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only graph-document version this crate understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// Errors raised while parsing or validating a graph document.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("graph document is not valid JSON for the expected shape: {source}")]
    #[diagnostic(code(tracelens::graph::malformed))]
    Malformed {
        #[from]
        source: serde_json::Error,
    },

    #[error("unsupported graph document version {v} (supported: 1)")]
    #[diagnostic(code(tracelens::graph::unsupported_version))]
    UnsupportedVersion { v: u32 },

    #[error("graph node with empty id")]
    #[diagnostic(code(tracelens::graph::empty_node_id))]
    EmptyNodeId,

    #[error("duplicate graph node id '{id}'")]
    #[diagnostic(code(tracelens::graph::duplicate_node))]
    DuplicateNode { id: String },

    #[error("edge '{edge}' references unknown node '{node}'")]
    #[diagnostic(code(tracelens::graph::unknown_endpoint))]
    UnknownEndpoint { edge: String, node: String },

    #[error("subgraph '{parent}' declares unknown child '{child}'")]
    #[diagnostic(code(tracelens::graph::unknown_child))]
    UnknownChild { parent: String, child: String },

    #[error("node '{child}' is claimed as a child by both '{first}' and '{second}'")]
    #[diagnostic(code(tracelens::graph::child_reparented))]
    ChildReparented {
        child: String,
        first: String,
        second: String,
    },

    #[error("node '{id}' declares children but is not flagged as a subgraph")]
    #[diagnostic(code(tracelens::graph::children_on_leaf))]
    ChildrenOnLeaf { id: String },

    #[error("subgraph nesting cycle involving node '{id}'")]
    #[diagnostic(code(tracelens::graph::cyclic_subgraph))]
    CyclicSubgraph { id: String },
}

/// One declared node of the execution graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub label: String,
    #[serde(default)]
    pub is_subgraph: bool,
    #[serde(default)]
    pub children: Vec<String>,
}

/// One declared edge of the execution graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Routing condition label; `null` on unconditional edges.
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default, rename = "type")]
    pub edge_type: Option<String>,
}

/// A parsed, validated execution-graph document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    pub v: u32,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    /// Parse a raw document as captured on a workflow span.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tracelens::graph::GraphDocument;
    ///
    /// let doc = GraphDocument::parse(
    ///     r#"{"v":1,
    ///         "nodes":[{"id":"a","type":"node","label":"A"},
    ///                  {"id":"b","type":"node","label":"B"}],
    ///         "edges":[{"id":"e1","source":"a","target":"b","condition":null}]}"#,
    /// ).unwrap();
    /// assert_eq!(doc.nodes.len(), 2);
    ///
    /// assert!(GraphDocument::parse(r#"{"v":1,"nodes":[],"edges":[
    ///     {"id":"e","source":"x","target":"y","condition":null}]}"#).is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        let doc: GraphDocument = serde_json::from_str(raw)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Validate structural soundness; see the module docs for the rules.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.v != SUPPORTED_VERSION {
            return Err(GraphError::UnsupportedVersion { v: self.v });
        }

        let mut ids: FxHashSet<&str> = FxHashSet::default();
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(GraphError::EmptyNodeId);
            }
            if !ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(GraphError::UnknownEndpoint {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }

        let mut child_owner: FxHashMap<&str, &str> = FxHashMap::default();
        for node in &self.nodes {
            if !node.children.is_empty() && !node.is_subgraph {
                return Err(GraphError::ChildrenOnLeaf {
                    id: node.id.clone(),
                });
            }
            for child in &node.children {
                if !ids.contains(child.as_str()) {
                    return Err(GraphError::UnknownChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                if let Some(first) = child_owner.insert(child.as_str(), node.id.as_str()) {
                    return Err(GraphError::ChildReparented {
                        child: child.clone(),
                        first: first.to_string(),
                        second: node.id.clone(),
                    });
                }
            }
        }

        // Single ownership means a nesting cycle shows up as a parent chain
        // that revisits a node; walk each chain upward with a guard.
        for node in &self.nodes {
            let mut seen: FxHashSet<&str> = FxHashSet::default();
            let mut current = node.id.as_str();
            seen.insert(current);
            while let Some(&owner) = child_owner.get(current) {
                if !seen.insert(owner) {
                    return Err(GraphError::CyclicSubgraph {
                        id: node.id.clone(),
                    });
                }
                current = owner;
            }
        }

        Ok(())
    }

    /// Look up a node by its domain id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes not owned by any subgraph, in document order.
    pub(crate) fn top_level_nodes(&self) -> Vec<&GraphNode> {
        let owned: FxHashSet<&str> = self
            .nodes
            .iter()
            .flat_map(|node| node.children.iter().map(String::as_str))
            .collect();
        self.nodes
            .iter()
            .filter(|node| !owned.contains(node.id.as_str()))
            .collect()
    }
}
