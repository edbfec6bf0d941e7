//! Memoized snapshot reconstruction.
//!
//! Every reconstruction function in this crate is pure and referentially
//! transparent, so repeated renders of the same query (same trace, same
//! selected span, same timeline index) can reuse the previous result
//! instead of replaying patches again. The cache is a performance
//! optimization only — never a correctness requirement.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::store::event::StateEvent;
use crate::store::reconstruct::{self, ReplayError, StatePair};

/// Identity of one reconstruction query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReconstructionKey {
    pub trace_id: String,
    /// The workflow/subflow span whose timeline is being inspected.
    pub span_id: String,
    /// Store key, see [`StateEvent::store_key`].
    pub store: String,
    pub index: usize,
}

/// A memo over [`reconstruct::accumulate`] keyed by query identity.
///
/// Cached values are immutable snapshot pairs; hits return clones, so
/// concurrent observers of the same trace can share one cache. Errors are
/// never cached.
///
/// # Examples
///
/// ```rust
/// use tracelens::cache::{ReconstructionCache, ReconstructionKey};
/// use serde_json::json;
///
/// let cache = ReconstructionCache::new();
/// let key = ReconstructionKey {
///     trace_id: "t".into(),
///     span_id: "wf".into(),
///     store: "counter".into(),
///     index: 0,
/// };
///
/// let pair = cache.accumulate(key.clone(), &json!({"count": 0}), &[]).unwrap();
/// assert_eq!(pair.before, json!({"count": 0}));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ReconstructionCache {
    inner: Mutex<FxHashMap<ReconstructionKey, StatePair>>,
}

impl ReconstructionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct the state pair for `key`, reusing a previous result for
    /// the same key when available.
    ///
    /// The caller is responsible for key discipline: the key must identify
    /// the `(base, events)` inputs, or stale results come back.
    pub fn accumulate(
        &self,
        key: ReconstructionKey,
        base: &Value,
        events: &[StateEvent],
    ) -> Result<StatePair, ReplayError> {
        if let Some(hit) = self.inner.lock().get(&key) {
            return Ok(hit.clone());
        }
        let pair = reconstruct::accumulate(base, events, key.index)?;
        self.inner.lock().insert(key, pair.clone());
        Ok(pair)
    }

    /// Drop every cached result (e.g. when new spans arrive for a trace).
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
