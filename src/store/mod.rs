//! Store state reconstruction from recorded mutation events.
//!
//! A *store* is a named, versioned piece of workflow state. The engine
//! captures its state once at workflow start, then records every change as
//! a `set_state` span event carrying an RFC 6902 JSON Patch against the
//! previous cumulative state; the end snapshot is the authoritative result
//! of applying every patch in order.
//!
//! The pipeline through this module:
//!
//! 1. [`event`] extracts and validates [`StateEvent`]s from a span.
//! 2. [`timeline`] aggregates them across an execution subtree into a
//!    deterministically ordered per-store timeline.
//! 3. [`reconstruct`] replays patches over the start snapshot to answer
//!    "what did the state look like immediately before/after event *k*?".
//! 4. [`diff`] compares any two snapshots.

pub mod diff;
pub mod event;
pub mod reconstruct;
pub mod timeline;

pub use diff::{DetailedDiff, KeyChange, detailed_diff, diff};
pub use event::{StateEvent, extract_state_events};
pub use reconstruct::{ReplayError, StatePair, accumulate, replay_all, verify_round_trip};
pub use timeline::{assemble_timeline, store_keys, store_timeline};
