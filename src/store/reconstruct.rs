//! Snapshot reconstruction by ordered patch replay.
//!
//! Answers "what did the store look like immediately before/after the k-th
//! event in its timeline?" by replaying RFC 6902 patches over a deep clone
//! of the start snapshot. Replay is pure and idempotent: every call clones
//! the base, so outputs never alias each other or the recorded data, and
//! concurrent observers of the same trace are inherently safe.
//!
//! An out-of-range index is a defensive no-op (the unchanged base comes
//! back), but a patch whose path cannot be resolved is a hard error: the
//! recorded state is internally inconsistent, and skipping the operation
//! would produce a plausible-looking but wrong snapshot.

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::store::event::StateEvent;

/// Errors raised while replaying a store's patch timeline.
#[derive(Debug, Error, Diagnostic)]
pub enum ReplayError {
    /// A patch operation could not be applied to the current document.
    #[error("patch for store '{store}' failed at event {index} (id {event_id}): {source}")]
    #[diagnostic(code(tracelens::state::patch_failed))]
    PatchFailed {
        store: String,
        event_id: String,
        index: usize,
        #[source]
        source: json_patch::PatchError,
    },

    /// Replaying the full timeline did not reproduce the recorded end
    /// snapshot.
    #[error("replayed end state for store '{store}' does not match the recorded end snapshot")]
    #[diagnostic(code(tracelens::state::end_state_mismatch))]
    EndStateMismatch { store: String },
}

/// The state of a store immediately before and after one event.
///
/// `before` and `after` are independent clones; mutating one (in the
/// presentation layer) can never leak into the other.
#[derive(Clone, Debug, PartialEq)]
pub struct StatePair {
    pub before: Value,
    pub after: Value,
}

/// Reconstruct the state around the event at `index` in an ascending
/// timeline.
///
/// Out-of-range requests (`index >= events.len()`, or an empty timeline)
/// return the unchanged base as both sides — never an error.
///
/// # Examples
///
/// ```rust
/// use tracelens::span::{Span, SpanEvent, wire};
/// use tracelens::store::{accumulate, extract_state_events};
/// use chrono::DateTime;
/// use serde_json::json;
///
/// let set = |id: &str, nanos: i64, patch: &str| {
///     SpanEvent::new(wire::SET_STATE_EVENT, DateTime::from_timestamp_nanos(nanos))
///         .with_attribute(wire::EVENT_ID, json!(id))
///         .with_attribute(wire::STATE_PATCH, json!(patch))
///         .with_attribute(wire::STORE_NAME, json!("counter"))
///         .with_attribute(wire::STORE_ACTION, json!("set"))
/// };
/// let span = Span::builder("s", "t")
///     .with_event(set("e0", 1, r#"[{"op":"replace","path":"/count","value":1}]"#))
///     .with_event(set("e1", 2, r#"[{"op":"replace","path":"/count","value":2}]"#))
///     .build();
/// let events = extract_state_events(&span);
///
/// let base = json!({"count": 0});
/// let pair = accumulate(&base, &events, 1).unwrap();
/// assert_eq!(pair.before, json!({"count": 1}));
/// assert_eq!(pair.after, json!({"count": 2}));
///
/// // Out of range: defensive no-op.
/// let pair = accumulate(&base, &events, 99).unwrap();
/// assert_eq!(pair.before, base);
/// assert_eq!(pair.after, base);
/// ```
pub fn accumulate(
    base: &Value,
    events: &[StateEvent],
    index: usize,
) -> Result<StatePair, ReplayError> {
    if events.is_empty() || index >= events.len() {
        return Ok(StatePair {
            before: base.clone(),
            after: base.clone(),
        });
    }
    let before = replay(base, &events[..index])?;
    let after = replay(base, &events[..=index])?;
    Ok(StatePair { before, after })
}

/// Apply the full timeline to the base snapshot.
pub fn replay_all(base: &Value, events: &[StateEvent]) -> Result<Value, ReplayError> {
    replay(base, events)
}

/// Check the round-trip invariant: replaying the full timeline over the
/// start snapshot must reproduce the recorded end snapshot exactly.
pub fn verify_round_trip(
    base: &Value,
    events: &[StateEvent],
    end: &Value,
    store: &str,
) -> Result<(), ReplayError> {
    let replayed = replay(base, events)?;
    if &replayed == end {
        Ok(())
    } else {
        Err(ReplayError::EndStateMismatch {
            store: store.to_string(),
        })
    }
}

fn replay(base: &Value, events: &[StateEvent]) -> Result<Value, ReplayError> {
    let mut doc = base.clone();
    for (index, event) in events.iter().enumerate() {
        json_patch::patch(&mut doc, &event.patch).map_err(|source| ReplayError::PatchFailed {
            store: event.store_name.clone(),
            event_id: event.id.clone(),
            index,
            source,
        })?;
    }
    Ok(doc)
}
