// # Memory Style Host
//
// In-memory implementation of StyleHost.
//
// The sheet text lives behind a shared handle, so a test or an embedding
// application can keep a clone of the host and read what the overlay
// wrote. The host can be toggled unreachable to model a preview surface
// that has not loaded yet.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::{StyleContainer, StyleHost};

/// In-memory style host
///
/// Clones share the same sheet and reachability flag.
#[derive(Debug, Clone)]
pub struct MemoryStyleHost {
    sheet: Arc<Mutex<Option<String>>>,
    reachable: Arc<AtomicBool>,
    acquisitions: Arc<AtomicUsize>,
}

impl MemoryStyleHost {
    /// Create a reachable host with no sheet yet
    pub fn new() -> Self {
        Self {
            sheet: Arc::new(Mutex::new(None)),
            reachable: Arc::new(AtomicBool::new(true)),
            acquisitions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a host whose surface has not loaded
    pub fn unreachable() -> Self {
        let host = Self::new();
        host.set_reachable(false);
        host
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Sheet text, or `None` if no container was ever created
    pub fn contents(&self) -> Option<String> {
        self.sheet
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times a container was handed out
    pub fn acquire_count(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    /// Simulate the surface reloading: the old sheet is gone
    pub fn reload(&self) {
        *self.sheet.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for MemoryStyleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleHost for MemoryStyleHost {
    fn acquire(&mut self) -> Option<Box<dyn StyleContainer>> {
        if !self.reachable.load(Ordering::SeqCst) {
            return None;
        }

        self.sheet
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert_with(String::new);
        self.acquisitions.fetch_add(1, Ordering::SeqCst);

        Some(Box::new(MemoryStyleContainer {
            sheet: Arc::clone(&self.sheet),
        }))
    }
}

struct MemoryStyleContainer {
    sheet: Arc<Mutex<Option<String>>>,
}

impl StyleContainer for MemoryStyleContainer {
    fn contents(&self) -> String {
        self.sheet
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    fn replace(&mut self, css: &str) {
        *self.sheet.lock().unwrap_or_else(PoisonError::into_inner) = Some(css.to_string());
    }
}
