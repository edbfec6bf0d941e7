//! Resolution of the workflow chain enclosing a span.
//!
//! Selecting a span in the execution tree must light up the right execution
//! graph(s): the chain of workflow/subflow spans from the trace root down
//! to the selected span. The chain is resolved by walking parent pointers
//! through the full span set for the trace (including lineage spans served
//! by the repository outside the immediate subtree).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::classify::classify;
use crate::span::Span;

/// Resolve the root-to-leaf chain of workflow/subflow spans enclosing
/// `active`, the active span itself included when it has such a role.
///
/// The walk follows `parent_span_id` lookups until no parent resolves; a
/// visited set guards against cyclic parent links in malformed recordings.
/// When the active span has no workflow/subflow ancestor and is not one
/// itself, the result falls back to a single-element chain containing the
/// caller-supplied top-level root span.
///
/// # Examples
///
/// ```rust
/// use tracelens::lineage::workflow_chain;
/// use tracelens::span::{Span, wire};
/// use serde_json::json;
///
/// let spans = vec![
///     Span::builder("a", "t")
///         .with_attribute(wire::SPAN_TYPE, json!("workflow"))
///         .build(),
///     Span::builder("b", "t")
///         .with_parent("a")
///         .with_attribute(wire::SPAN_TYPE, json!("subflow"))
///         .build(),
///     Span::builder("c", "t").with_parent("b").build(),
/// ];
///
/// let chain = workflow_chain(&spans[2], &spans, &spans[0]);
/// let ids: Vec<&str> = chain.iter().map(|s| s.span_id.as_str()).collect();
/// assert_eq!(ids, ["a", "b"]);
/// ```
pub fn workflow_chain<'a>(
    active: &'a Span,
    spans: &'a [Span],
    fallback_root: &'a Span,
) -> Vec<&'a Span> {
    let mut by_id: FxHashMap<&str, &Span> = FxHashMap::default();
    for span in spans {
        by_id.entry(span.span_id.as_str()).or_insert(span);
    }

    let mut chain: Vec<&Span> = Vec::new();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut current = active;
    visited.insert(current.span_id.as_str());

    loop {
        if classify(current).is_workflow_like() {
            chain.push(current);
        }
        let Some(parent) = current
            .parent_span_id
            .as_deref()
            .and_then(|id| by_id.get(id).copied())
        else {
            break;
        };
        if !visited.insert(parent.span_id.as_str()) {
            tracing::debug!(
                span_id = %parent.span_id,
                "cyclic parent link while resolving workflow chain"
            );
            break;
        }
        current = parent;
    }

    // Walked leaf-to-root; the chain reads root-to-leaf.
    chain.reverse();

    if chain.is_empty() {
        return vec![fallback_root];
    }
    chain
}
