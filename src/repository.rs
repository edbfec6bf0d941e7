//! Contract for the external span supply.
//!
//! Span ingestion and persistence live outside this crate; the
//! reconstruction core only consumes spans through this seam. Implementors
//! adapt whatever backend actually stores the recordings.

use miette::Diagnostic;
use thiserror::Error;

use crate::span::Span;

/// Errors an implementation may surface to the core's callers.
#[derive(Debug, Error, Diagnostic)]
pub enum RepositoryError {
    #[error("span backend unavailable: {reason}")]
    #[diagnostic(code(tracelens::repository::unavailable))]
    Unavailable { reason: String },

    #[error("malformed span payload: {source}")]
    #[diagnostic(code(tracelens::repository::malformed))]
    Malformed {
        #[from]
        source: serde_json::Error,
    },
}

/// Spans served for one service.
///
/// `lineage` holds ancestor spans outside the immediate execution subtree;
/// [`crate::lineage::workflow_chain`] needs them to resolve enclosing
/// workflows that started before the selected execution.
#[derive(Clone, Debug, Default)]
pub struct ServiceSpans {
    pub lineage: Vec<Span>,
    pub spans: Vec<Span>,
}

impl ServiceSpans {
    /// Lineage and execution spans as one slice-backed collection, the
    /// shape the resolvers expect.
    pub fn all(&self) -> Vec<Span> {
        let mut all = self.lineage.clone();
        all.extend(self.spans.iter().cloned());
        all
    }
}

/// The span supply this core depends on.
pub trait SpanRepository {
    /// Every span recorded for one trace.
    fn fetch_spans(&self, trace_id: &str) -> Result<Vec<Span>, RepositoryError>;

    /// Spans for one service, split into execution spans and lineage.
    fn fetch_spans_for_service(&self, service_name: &str)
    -> Result<ServiceSpans, RepositoryError>;
}
