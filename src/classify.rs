//! Span role classification.
//!
//! Every span gets exactly one [`SpanRole`] derived from the engine's
//! discriminator attribute, with [`SpanRole::Other`] as the fallback for
//! unset, empty, or unknown values. Classification is a pure function: no
//! side effects, no errors.
//!
//! Two secondary classifiers ([`is_database_call`], [`is_model_call`]) are
//! non-exclusive presence checks used only for display iconography; they
//! never influence tree or state logic.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::span::Span;

/// The role a span plays inside a recorded workflow execution.
///
/// Roles come from the engine's span-type discriminator. The variant set is
/// closed and matched exhaustively throughout the crate, so introducing a
/// new role is a compile-time-checked change.
///
/// # Examples
///
/// ```rust
/// use tracelens::classify::SpanRole;
///
/// assert_eq!(SpanRole::from_discriminator("workflow"), SpanRole::Workflow);
/// assert_eq!(SpanRole::from_discriminator("run_concurrent"), SpanRole::ConcurrentGroup);
/// assert_eq!(SpanRole::from_discriminator(""), SpanRole::Other);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanRole {
    /// Top-level workflow execution; carries state snapshots and a graph.
    Workflow,
    /// Nested sub-workflow execution; same payloads as a workflow.
    Subflow,
    /// A single executed graph node.
    Node,
    /// A concurrent fan-out group of nodes.
    ConcurrentGroup,
    /// Anything the engine did not mark: infrastructure spans, external
    /// calls, spans from other instrumentation.
    #[default]
    Other,
}

impl SpanRole {
    /// Map a raw discriminator value to a role.
    ///
    /// Unknown values land on [`SpanRole::Other`]; this keeps historical
    /// traces from newer or older engine versions readable.
    pub fn from_discriminator(raw: &str) -> Self {
        match raw {
            "workflow" => SpanRole::Workflow,
            "subflow" => SpanRole::Subflow,
            "node" => SpanRole::Node,
            "run_concurrent" => SpanRole::ConcurrentGroup,
            _ => SpanRole::Other,
        }
    }

    /// Returns `true` for [`Workflow`](Self::Workflow).
    #[must_use]
    pub fn is_workflow(&self) -> bool {
        matches!(self, Self::Workflow)
    }

    /// Returns `true` for [`Subflow`](Self::Subflow).
    #[must_use]
    pub fn is_subflow(&self) -> bool {
        matches!(self, Self::Subflow)
    }

    /// Returns `true` for spans that carry state snapshots and a graph
    /// document, i.e. [`Workflow`](Self::Workflow) or [`Subflow`](Self::Subflow).
    #[must_use]
    pub fn is_workflow_like(&self) -> bool {
        matches!(self, Self::Workflow | Self::Subflow)
    }
}

impl fmt::Display for SpanRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Workflow => "workflow",
            Self::Subflow => "subflow",
            Self::Node => "node",
            Self::ConcurrentGroup => "run_concurrent",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// Classify a span by its discriminator attribute.
///
/// # Examples
///
/// ```rust
/// use tracelens::classify::{classify, SpanRole};
/// use tracelens::span::{Span, wire};
/// use serde_json::json;
///
/// let span = Span::builder("s", "t")
///     .with_attribute(wire::SPAN_TYPE, json!("subflow"))
///     .build();
/// assert_eq!(classify(&span), SpanRole::Subflow);
///
/// let plain = Span::builder("p", "t").build();
/// assert_eq!(classify(&plain), SpanRole::Other);
/// ```
pub fn classify(span: &Span) -> SpanRole {
    span.span_type()
        .map(SpanRole::from_discriminator)
        .unwrap_or_default()
}

/// Whether the span represents a database call (`db.system` present).
/// Display-only.
pub fn is_database_call(span: &Span) -> bool {
    span.db_system().is_some()
}

/// Whether the span represents a model-inference call (`gen_ai.system`
/// present). Display-only.
pub fn is_model_call(span: &Span) -> bool {
    span.gen_ai_system().is_some()
}
