//! Shared preset fetch with staleness detection
//!
//! Every editor panel that needs the preset list goes through one
//! [`PresetCache`]. Concurrent callers share a single in-flight fetch: the
//! first caller loads while holding the slot, the rest wait on it and read
//! the filled value.
//!
//! Each fetch is stamped with the generation current when it started.
//! [`PresetCache::invalidate`] bumps the generation, so a fetch that was
//! already in flight resolves to a stale snapshot. Stale snapshots are still
//! returned to their caller, but they are never cached and
//! [`PresetCache::is_current`] reports them as superseded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

use crate::Error;
use crate::preset::PresetGroup;
use crate::traits::PresetStore;

/// Preset groups as of one fetch
#[derive(Debug, Clone)]
pub struct PresetSnapshot {
    pub generation: u64,
    pub groups: Arc<Vec<PresetGroup>>,
}

/// Cache in front of a [`PresetStore`]
pub struct PresetCache {
    store: Arc<dyn PresetStore>,
    generation: AtomicU64,
    slot: Mutex<Option<PresetSnapshot>>,
}

impl PresetCache {
    pub fn new(store: Arc<dyn PresetStore>) -> Self {
        Self {
            store,
            generation: AtomicU64::new(0),
            slot: Mutex::new(None),
        }
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether `snapshot` reflects the latest invalidation
    pub fn is_current(&self, snapshot: &PresetSnapshot) -> bool {
        snapshot.generation == self.generation()
    }

    /// Drop the cached list; fetches already in flight become stale
    pub fn invalidate(&self) -> u64 {
        let next = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Preset cache invalidated, generation {}", next);
        next
    }

    /// Get the preset groups, fetching them if needed
    pub async fn get(&self) -> Result<PresetSnapshot, Error> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref().filter(|s| self.is_current(s)) {
            return Ok(cached.clone());
        }

        let generation = self.generation();
        let groups = self.store.list_groups().await?;
        let snapshot = PresetSnapshot {
            generation,
            groups: Arc::new(groups),
        };

        if self.is_current(&snapshot) {
            *slot = Some(snapshot.clone());
        } else {
            debug!(
                "Preset fetch from generation {} resolved after invalidation (now {}), not caching",
                generation,
                self.generation()
            );
            *slot = None;
        }

        Ok(snapshot)
    }
}
