#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::json;
use tracelens::span::{Span, SpanEvent, wire};
use tracelens::store::StateEvent;
use tracelens::store::assemble_timeline;

pub fn ts(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

/// A bare span with no role discriminator.
pub fn plain_span(id: &str, parent: Option<&str>) -> Span {
    let builder = Span::builder(id, "trace-1");
    match parent {
        Some(parent) => builder.with_parent(parent).build(),
        None => builder.build(),
    }
}

/// A span carrying the engine's role discriminator attribute.
pub fn role_span(id: &str, parent: Option<&str>, role: &str) -> Span {
    let builder = Span::builder(id, "trace-1").with_attribute(wire::SPAN_TYPE, json!(role));
    match parent {
        Some(parent) => builder.with_parent(parent).build(),
        None => builder.build(),
    }
}

/// A well-formed `set_state` span event.
pub fn set_state_event(id: &str, nanos: i64, store: &str, action: &str, patch: &str) -> SpanEvent {
    SpanEvent::new(wire::SET_STATE_EVENT, ts(nanos))
        .with_attribute(wire::EVENT_ID, json!(id))
        .with_attribute(wire::STATE_PATCH, json!(patch))
        .with_attribute(wire::STORE_NAME, json!(store))
        .with_attribute(wire::STORE_ACTION, json!(action))
}

/// Extracted, ordered state events for the given patch documents, one event
/// per patch, timestamps ascending in argument order.
pub fn events_for_patches(store: &str, patches: &[&str]) -> Vec<StateEvent> {
    let mut builder = Span::builder("emitter", "trace-1");
    for (i, patch) in patches.iter().enumerate() {
        builder = builder.with_event(set_state_event(
            &format!("evt-{i}"),
            (i as i64 + 1) * 10,
            store,
            "set",
            patch,
        ));
    }
    let span = builder.build();
    assemble_timeline(&[&span])
}
