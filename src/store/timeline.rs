//! Per-store event timelines across an execution subtree.
//!
//! Events for one store are ordered by their recorded timestamp; no order
//! is guaranteed across stores. Two events can share an identical
//! nanosecond timestamp, so assembly stamps each event with its flat
//! ingestion position (`seq`) and sorts by `(timestamp, seq)` — the order
//! is total and deterministic for a given span collection.

use crate::span::Span;
use crate::store::event::{StateEvent, extract_state_events};

/// Extract and order every state event in the given spans (typically the
/// output of [`crate::tree::collect_subtree`]).
///
/// Events are collected span by span in the given order, stamped with their
/// ingestion sequence, then sorted ascending by `(timestamp, seq)`.
pub fn assemble_timeline(spans: &[&Span]) -> Vec<StateEvent> {
    let mut events: Vec<StateEvent> = spans
        .iter()
        .flat_map(|span| extract_state_events(span))
        .collect();
    for (seq, event) in events.iter_mut().enumerate() {
        event.seq = seq as u64;
    }
    events.sort_by(|a, b| (a.timestamp, a.seq).cmp(&(b.timestamp, b.seq)));
    events
}

/// The timeline of a single store, identified by its store key
/// (see [`StateEvent::store_key`]).
pub fn store_timeline(spans: &[&Span], store: &str) -> Vec<StateEvent> {
    let mut events = assemble_timeline(spans);
    events.retain(|event| event.store_key() == store);
    events
}

/// Distinct store keys in an assembled timeline, in first-appearance order.
pub fn store_keys(timeline: &[StateEvent]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for event in timeline {
        let key = event.store_key();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}
