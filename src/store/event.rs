//! Extraction and validation of state-mutation events.
//!
//! The engine embeds store mutations in a span's event list under the
//! `set_state` name. Each entry must carry a unique id, a JSON Patch
//! document (as a string), the store name, and the store action; entries
//! that fail validation are dropped with a warning so one corrupt event
//! never blocks extraction of the rest.

use chrono::{DateTime, Utc};
use json_patch::Patch;
use serde_json::Value;

use crate::span::{Span, SpanEvent, wire};

/// A validated state mutation, derived from one `set_state` span event.
#[derive(Clone, Debug, PartialEq)]
pub struct StateEvent {
    /// Globally unique event id, as recorded.
    pub id: String,
    /// Owning store id; older recordings may omit it.
    pub store_id: Option<String>,
    pub store_name: String,
    /// Store action that produced this mutation.
    pub action: String,
    /// Nanosecond-precision event timestamp.
    pub timestamp: DateTime<Utc>,
    /// The parsed RFC 6902 patch.
    pub patch: Patch,
    /// Position in the flat ingestion order, assigned during timeline
    /// assembly; tie-breaks events with identical timestamps.
    pub seq: u64,
}

impl StateEvent {
    /// Identity of the owning store: the store id when recorded, the store
    /// name otherwise.
    pub fn store_key(&self) -> &str {
        self.store_id.as_deref().unwrap_or(&self.store_name)
    }
}

/// Extract every valid state event from one span.
///
/// Filters the span's events for the `set_state` name, validates each
/// against the required shape, and drops malformed entries with a
/// `tracing::warn!` naming the span and reason.
///
/// # Examples
///
/// ```rust
/// use tracelens::span::{Span, SpanEvent, wire};
/// use tracelens::store::extract_state_events;
/// use chrono::DateTime;
/// use serde_json::json;
///
/// let event = SpanEvent::new(wire::SET_STATE_EVENT, DateTime::from_timestamp_nanos(10))
///     .with_attribute(wire::EVENT_ID, json!("evt-1"))
///     .with_attribute(wire::STATE_PATCH, json!(r#"[{"op":"replace","path":"/n","value":1}]"#))
///     .with_attribute(wire::STORE_NAME, json!("counter"))
///     .with_attribute(wire::STORE_ACTION, json!("increment"));
/// let span = Span::builder("s", "t").with_event(event).build();
///
/// let events = extract_state_events(&span);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].action, "increment");
/// ```
pub fn extract_state_events(span: &Span) -> Vec<StateEvent> {
    span.events
        .iter()
        .filter(|event| event.name == wire::SET_STATE_EVENT)
        .filter_map(|event| parse_state_event(span, event))
        .collect()
}

fn parse_state_event(span: &Span, event: &SpanEvent) -> Option<StateEvent> {
    let id = match required_str(event, wire::EVENT_ID) {
        Some(id) => id,
        None => return drop_event(span, event, "missing or empty id"),
    };
    let store_name = match required_str(event, wire::STORE_NAME) {
        Some(name) => name,
        None => return drop_event(span, event, "missing or empty store name"),
    };
    let action = match required_str(event, wire::STORE_ACTION) {
        Some(action) => action,
        None => return drop_event(span, event, "missing or empty store action"),
    };
    let Some(raw_patch) = required_str(event, wire::STATE_PATCH) else {
        return drop_event(span, event, "missing or empty patch document");
    };
    let patch: Patch = match serde_json::from_str(raw_patch) {
        Ok(patch) => patch,
        Err(err) => {
            tracing::warn!(
                span_id = %span.span_id,
                event = wire::SET_STATE_EVENT,
                error = %err,
                "dropping state event with unparseable patch"
            );
            return None;
        }
    };

    Some(StateEvent {
        id: id.to_string(),
        store_id: required_str(event, wire::STORE_ID).map(str::to_string),
        store_name: store_name.to_string(),
        action: action.to_string(),
        timestamp: event.timestamp,
        patch,
        seq: 0,
    })
}

fn required_str<'a>(event: &'a SpanEvent, key: &str) -> Option<&'a str> {
    event
        .attributes
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn drop_event(span: &Span, _event: &SpanEvent, reason: &str) -> Option<StateEvent> {
    tracing::warn!(
        span_id = %span.span_id,
        event = wire::SET_STATE_EVENT,
        reason,
        "dropping malformed state event"
    );
    None
}
