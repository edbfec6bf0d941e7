//! Execution subtree reconstruction from a flat span collection.
//!
//! The repository hands back every span for a trace (or service) in no
//! particular order; [`collect_subtree`] carves out the set of spans that
//! belong to one execution, rooted at a chosen span.
//!
//! Parent links come from recorded data and are untrusted: duplicated ids
//! and even cycles are possible in malformed traces. The traversal is
//! iterative with an explicit visited set, so it terminates in O(n)
//! regardless.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::span::Span;

/// Collect the spans reachable from `root_id` via the child relation
/// (`parent_span_id == ancestor.span_id`), root included.
///
/// Spans are returned in breadth-first discovery order, children in input
/// order, which makes the result deterministic for a given input slice.
///
/// If the root id is not present in the input the result is empty; this is
/// non-fatal (a repository may serve a partial trace) and only logged at
/// debug level.
///
/// # Examples
///
/// ```rust
/// use tracelens::span::Span;
/// use tracelens::tree::collect_subtree;
///
/// let spans = vec![
///     Span::builder("a", "t").build(),
///     Span::builder("b", "t").with_parent("a").build(),
///     Span::builder("c", "t").with_parent("b").build(),
/// ];
///
/// let subtree = collect_subtree(&spans, "a");
/// let ids: Vec<&str> = subtree.iter().map(|s| s.span_id.as_str()).collect();
/// assert_eq!(ids, ["a", "b", "c"]);
///
/// assert!(collect_subtree(&spans, "nope").is_empty());
/// ```
pub fn collect_subtree<'a>(spans: &'a [Span], root_id: &str) -> Vec<&'a Span> {
    let mut by_id: FxHashMap<&str, &Span> = FxHashMap::default();
    let mut children: FxHashMap<&str, Vec<&Span>> = FxHashMap::default();
    for span in spans {
        by_id.entry(span.span_id.as_str()).or_insert(span);
        if let Some(parent) = span.parent_span_id.as_deref() {
            children.entry(parent).or_default().push(span);
        }
    }

    let Some(root) = by_id.get(root_id).copied() else {
        tracing::debug!(root_id, "subtree root not present in span collection");
        return Vec::new();
    };

    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<&Span> = VecDeque::new();
    let mut out: Vec<&Span> = Vec::new();

    visited.insert(root.span_id.as_str());
    queue.push_back(root);

    while let Some(span) = queue.pop_front() {
        out.push(span);
        if let Some(kids) = children.get(span.span_id.as_str()) {
            for &child in kids {
                // Each id enqueues at most once; duplicated or cyclic
                // parent links cannot loop the traversal.
                if visited.insert(child.span_id.as_str()) {
                    queue.push_back(child);
                }
            }
        }
    }

    out
}
