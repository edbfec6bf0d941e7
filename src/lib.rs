//! # Tracelens: Workflow-Trace Reconstruction Core
//!
//! Tracelens turns a flat, unordered collection of distributed-tracing
//! spans recorded by a node/workflow engine into the data structures an
//! observability UI needs: a hierarchical execution tree, store state
//! reconstructed at any point in the execution by replaying JSON-Patch
//! events, the chain of enclosing workflows for a selected span, and
//! deterministic diagram notation for the declared execution graph.
//!
//! Span ingestion, the HTTP layer, and the rendering technology all live
//! outside this crate (see [`repository`] for the span-supply seam). Every
//! component here is a pure, synchronous function over immutable inputs;
//! outputs are fresh clones, so re-entrant use across concurrent observers
//! of the same trace is safe by construction.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracelens::classify::{classify, SpanRole};
//! use tracelens::span::{Span, SpanEvent, wire};
//! use tracelens::store::{accumulate, store_timeline};
//! use tracelens::tree::collect_subtree;
//! use chrono::DateTime;
//! use serde_json::json;
//!
//! // A workflow span with one state mutation on its child node.
//! let set_count = SpanEvent::new(wire::SET_STATE_EVENT, DateTime::from_timestamp_nanos(5))
//!     .with_attribute(wire::EVENT_ID, json!("evt-1"))
//!     .with_attribute(wire::STATE_PATCH, json!(r#"[{"op":"replace","path":"/count","value":1}]"#))
//!     .with_attribute(wire::STORE_NAME, json!("counter"))
//!     .with_attribute(wire::STORE_ACTION, json!("increment"));
//!
//! let spans = vec![
//!     Span::builder("wf", "trace-1")
//!         .with_attribute(wire::SPAN_TYPE, json!("workflow"))
//!         .with_state(json!({"count": 0}), json!({"count": 1}))
//!         .build(),
//!     Span::builder("node-1", "trace-1")
//!         .with_parent("wf")
//!         .with_attribute(wire::SPAN_TYPE, json!("node"))
//!         .with_event(set_count)
//!         .build(),
//! ];
//!
//! // Execution tree under the workflow span.
//! let subtree = collect_subtree(&spans, "wf");
//! assert_eq!(subtree.len(), 2);
//! assert_eq!(classify(subtree[0]), SpanRole::Workflow);
//!
//! // State immediately before/after the first event of the store.
//! let timeline = store_timeline(&subtree, "counter");
//! let pair = accumulate(&spans[0].state_start, &timeline, 0).unwrap();
//! assert_eq!(pair.before, json!({"count": 0}));
//! assert_eq!(pair.after, json!({"count": 1}));
//! ```
//!
//! ## Module Guide
//!
//! - [`span`] - Span/event data model and the bit-exact wire keys
//! - [`classify`] - Span roles and display-only call classifiers
//! - [`tree`] - Execution subtree reconstruction
//! - [`lineage`] - Enclosing workflow chain resolution
//! - [`store`] - State-event extraction, timelines, replay, and diffs
//! - [`graph`] - Execution-graph parsing and Mermaid projection
//! - [`cache`] - Memoized reconstruction
//! - [`repository`] - External span-supply contract

pub mod cache;
pub mod classify;
pub mod graph;
pub mod lineage;
pub mod repository;
pub mod span;
pub mod store;
pub mod tree;
