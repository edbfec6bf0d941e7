//! Span and span-event data model for recorded workflow executions.
//!
//! Spans arrive from an external repository (see [`crate::repository`]) and
//! are immutable once ingested: every component in this crate only reads
//! them and derives fresh, ephemeral structures per query.
//!
//! The engine records a handful of well-known attribute and event keys that
//! must be preserved bit-exact for compatibility with existing recordings;
//! they live in [`wire`] and are only ever read through the typed accessors
//! on [`Span`], never via free-form map lookups at call sites.
//!
//! # Examples
//!
//! ```rust
//! use tracelens::span::{Span, SpanKind, wire};
//! use serde_json::json;
//!
//! let span = Span::builder("s1", "trace-1")
//!     .with_name("fetch_user")
//!     .with_service("checkout")
//!     .with_attribute(wire::SPAN_TYPE, json!("node"))
//!     .with_attribute(wire::DB_SYSTEM, json!("postgresql"))
//!     .build();
//!
//! assert_eq!(span.span_type(), Some("node"));
//! assert_eq!(span.db_system(), Some("postgresql"));
//! assert_eq!(span.kind, SpanKind::Internal);
//! ```

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Wire-level attribute and event keys recorded by the workflow engine.
///
/// These literals are part of the recording format: changing any of them
/// breaks compatibility with historical traces.
pub mod wire {
    /// Span attribute carrying the span-role discriminator
    /// (`workflow` / `subflow` / `node` / `run_concurrent`).
    pub const SPAN_TYPE: &str = "junjo.span_type";
    /// Span attribute present on database-call spans.
    pub const DB_SYSTEM: &str = "db.system";
    /// Span attribute present on model-inference spans.
    pub const GEN_AI_SYSTEM: &str = "gen_ai.system";
    /// Span attribute mapping a node span to its execution-graph node.
    pub const NODE_ID: &str = "junjo.node.id";

    /// Event name literal for state mutations.
    pub const SET_STATE_EVENT: &str = "set_state";
    /// Event attribute: globally unique state-event id.
    pub const EVENT_ID: &str = "id";
    /// Event attribute: RFC 6902 JSON Patch document as a string.
    pub const STATE_PATCH: &str = "junjo.state_json_patch";
    /// Event attribute: human-readable store name.
    pub const STORE_NAME: &str = "junjo.store.name";
    /// Event attribute: name of the store action that produced the patch.
    pub const STORE_ACTION: &str = "junjo.store.action";
    /// Event attribute: store id, stable across one workflow execution.
    pub const STORE_ID: &str = "junjo.store.id";
}

/// OTel-style span kind, decoded leniently from the wire.
///
/// Unknown or absent values fall back to [`SpanKind::Internal`]; the kind
/// is informational only and never drives reconstruction logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum SpanKind {
    #[default]
    Internal,
    Server,
    Client,
    Producer,
    Consumer,
}

impl SpanKind {
    /// Decode a wire string into a kind, tolerating the `SPAN_KIND_` prefix
    /// and arbitrary casing used by different exporters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tracelens::span::SpanKind;
    /// assert_eq!(SpanKind::decode("SPAN_KIND_SERVER"), SpanKind::Server);
    /// assert_eq!(SpanKind::decode("client"), SpanKind::Client);
    /// assert_eq!(SpanKind::decode("mystery"), SpanKind::Internal);
    /// ```
    pub fn decode(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix("span_kind_")
            .unwrap_or(normalized.as_str());
        match normalized {
            "server" => SpanKind::Server,
            "client" => SpanKind::Client,
            "producer" => SpanKind::Producer,
            "consumer" => SpanKind::Consumer,
            _ => SpanKind::Internal,
        }
    }
}

impl From<String> for SpanKind {
    fn from(raw: String) -> Self {
        SpanKind::decode(&raw)
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpanKind::Internal => "internal",
            SpanKind::Server => "server",
            SpanKind::Client => "client",
            SpanKind::Producer => "producer",
            SpanKind::Consumer => "consumer",
        };
        write!(f, "{label}")
    }
}

/// A named event recorded on a span, with its own attribute map and
/// nanosecond-precision timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpanEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attributes: FxHashMap<String, Value>,
}

impl SpanEvent {
    /// Create an event with an empty attribute map.
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            timestamp,
            attributes: FxHashMap::default(),
        }
    }

    /// Attach an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// One timed unit of execution within a recorded trace.
///
/// A span is the unit the external repository hands us: identity, parentage,
/// timing, an arbitrary attribute map, and an ordered event list. Spans with
/// role `workflow`/`subflow` additionally carry the store's start/end state
/// snapshots and the raw execution-graph document captured at record time;
/// on every other span those fields are `Null`/`None`.
///
/// # Examples
///
/// ```rust
/// use tracelens::span::Span;
/// use serde_json::json;
///
/// let root = Span::builder("root", "trace-9")
///     .with_name("checkout_flow")
///     .with_state(json!({"cart": []}), json!({"cart": ["sku-1"]}))
///     .with_store_id("store-1")
///     .build();
///
/// let child = Span::builder("child", "trace-9")
///     .with_parent("root")
///     .build();
///
/// assert!(root.parent_span_id.is_none());
/// assert_eq!(child.parent_span_id.as_deref(), Some("root"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Unique within its trace.
    pub span_id: String,
    pub trace_id: String,
    /// `None` marks a trace root.
    #[serde(default)]
    pub parent_span_id: Option<String>,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: SpanKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub attributes: FxHashMap<String, Value>,
    #[serde(default)]
    pub events: Vec<SpanEvent>,
    /// Store state captured at workflow start; `Null` on non-workflow spans.
    #[serde(default)]
    pub state_start: Value,
    /// Authoritative store state at workflow end; `Null` on non-workflow spans.
    #[serde(default)]
    pub state_end: Value,
    /// Raw execution-graph document (JSON text) captured on workflow spans.
    #[serde(default)]
    pub graph_document: Option<String>,
    /// Store id, stable across the lifetime of one workflow execution.
    #[serde(default)]
    pub store_id: Option<String>,
}

impl Span {
    /// Start building a span for tests, fixtures, and documentation.
    ///
    /// Production spans come from the repository already populated; the
    /// builder exists so derived structures can be exercised without one.
    pub fn builder(span_id: impl Into<String>, trace_id: impl Into<String>) -> SpanBuilder {
        SpanBuilder::new(span_id, trace_id)
    }

    fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// The span-role discriminator attribute, if recorded.
    pub fn span_type(&self) -> Option<&str> {
        self.attr_str(wire::SPAN_TYPE)
    }

    /// The `db.system` attribute, present on database-call spans.
    pub fn db_system(&self) -> Option<&str> {
        self.attr_str(wire::DB_SYSTEM)
    }

    /// The model-inference-system attribute, present on LLM-call spans.
    pub fn gen_ai_system(&self) -> Option<&str> {
        self.attr_str(wire::GEN_AI_SYSTEM)
    }

    /// The execution-graph node id this span executed, if recorded.
    pub fn node_id(&self) -> Option<&str> {
        self.attr_str(wire::NODE_ID)
    }
}

/// Fluent builder for [`Span`] values.
///
/// # Examples
///
/// ```rust
/// use tracelens::span::{Span, SpanKind};
/// use chrono::DateTime;
///
/// let span = Span::builder("s1", "t1")
///     .with_parent("s0")
///     .with_name("resolve_cart")
///     .with_kind(SpanKind::Client)
///     .with_times(
///         DateTime::from_timestamp_nanos(1_000),
///         DateTime::from_timestamp_nanos(5_000),
///     )
///     .build();
///
/// assert_eq!(span.name, "resolve_cart");
/// ```
#[derive(Debug)]
pub struct SpanBuilder {
    span: Span,
}

impl SpanBuilder {
    fn new(span_id: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            span: Span {
                span_id: span_id.into(),
                trace_id: trace_id.into(),
                parent_span_id: None,
                service_name: String::new(),
                name: String::new(),
                kind: SpanKind::Internal,
                start_time: DateTime::UNIX_EPOCH,
                end_time: DateTime::UNIX_EPOCH,
                attributes: FxHashMap::default(),
                events: Vec::new(),
                state_start: Value::Null,
                state_end: Value::Null,
                graph_document: None,
                store_id: None,
            },
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.span.parent_span_id = Some(parent_span_id.into());
        self
    }

    #[must_use]
    pub fn with_service(mut self, service_name: impl Into<String>) -> Self {
        self.span.service_name = service_name.into();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.span.name = name.into();
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: SpanKind) -> Self {
        self.span.kind = kind;
        self
    }

    #[must_use]
    pub fn with_times(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.span.start_time = start;
        self.span.end_time = end;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.span.attributes.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: SpanEvent) -> Self {
        self.span.events.push(event);
        self
    }

    /// Set the start and end store-state snapshots (workflow spans only).
    #[must_use]
    pub fn with_state(mut self, start: Value, end: Value) -> Self {
        self.span.state_start = start;
        self.span.state_end = end;
        self
    }

    #[must_use]
    pub fn with_graph_document(mut self, raw: impl Into<String>) -> Self {
        self.span.graph_document = Some(raw.into());
        self
    }

    #[must_use]
    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.span.store_id = Some(store_id.into());
        self
    }

    pub fn build(self) -> Span {
        self.span
    }
}
