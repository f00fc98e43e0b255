//! Injectable cache of derived filters.
//!
//! Filter derivation is deterministic in its key, so entries are computed
//! once and shared as `Arc`s. A `FilterCache` can be shared between
//! concurrent decompositions; tests use a fresh one per run.
//!
//! Each key owns a slot with its own lock. The map lock is only held to
//! look up or insert a slot, so a slow derivation blocks callers of the
//! same key and nobody else.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::error::FilterError;
use crate::henderson::henderson;
use crate::symmetric::SymmetricFilter;
use crate::trend::{TrendFilter, TrendFilterSpec};

/// Derived value of one key; `None` until a derivation succeeds.
type Slot<V> = Arc<Mutex<Option<Arc<V>>>>;

/// Thread-safe get-or-compute cache for Henderson and trend filters.
#[derive(Debug, Default)]
pub struct FilterCache {
    henderson: RwLock<HashMap<usize, Slot<SymmetricFilter>>>,
    trend: RwLock<HashMap<TrendFilterSpec, Slot<TrendFilter>>>,
}

impl FilterCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Henderson filter of `length` terms.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidLength`] when `length` is even or below 3.
    pub fn henderson(&self, length: usize) -> Result<Arc<SymmetricFilter>, FilterError> {
        get_or_compute(&self.henderson, length, || {
            debug!(length, "deriving Henderson filter");
            henderson(length)
        })
    }

    /// Trend filter described by `spec`, including its end filters.
    ///
    /// # Errors
    ///
    /// Propagates [`FilterError`] from [`TrendFilterSpec::build`].
    pub fn trend_filter(&self, spec: &TrendFilterSpec) -> Result<Arc<TrendFilter>, FilterError> {
        get_or_compute(&self.trend, *spec, || {
            debug!(
                length = spec.length(),
                kernel = spec.kernel().name(),
                ic = spec.ic(),
                "deriving trend filter"
            );
            spec.build()
        })
    }

    /// Number of cached Henderson filters.
    pub fn henderson_len(&self) -> usize {
        read_len(&self.henderson)
    }

    /// Number of cached trend filters.
    pub fn trend_len(&self) -> usize {
        read_len(&self.trend)
    }
}

fn get_or_compute<K, V>(
    map: &RwLock<HashMap<K, Slot<V>>>,
    key: K,
    compute: impl FnOnce() -> Result<V, FilterError>,
) -> Result<Arc<V>, FilterError>
where
    K: Eq + Hash,
{
    let existing = map
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(&key)
        .map(Arc::clone);
    let slot = match existing {
        Some(slot) => slot,
        None => Arc::clone(
            map.write()
                .unwrap_or_else(|e| e.into_inner())
                .entry(key)
                .or_default(),
        ),
    };

    let mut value = slot.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(v) = value.as_ref() {
        return Ok(Arc::clone(v));
    }
    let derived = Arc::new(compute()?);
    *value = Some(Arc::clone(&derived));
    Ok(derived)
}

fn read_len<K, V>(map: &RwLock<HashMap<K, Slot<V>>>) -> usize {
    map.read()
        .unwrap_or_else(|e| e.into_inner())
        .values()
        .filter(|slot| slot.lock().unwrap_or_else(|e| e.into_inner()).is_some())
        .count()
}
