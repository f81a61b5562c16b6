//! Removal tracking across reorders
//!
//! Host editors implement "move row" as a remove followed by an insert.
//! The tracker remembers when each preset row was removed so that an insert
//! of the same id shortly afterwards can be told apart from a real delete.
//!
//! ```text
//! Present ──remove──▶ Removed ──undo insert──────────────▶ Restored
//!                        │
//!                        └──insert within window──▶ Reordered
//!                        └──insert after window───▶ Fresh (record kept until swept)
//! ```
//!
//! An undo can only restore a row that is still gone: a fresh insert
//! forgets the removal, and removals older than the undo retention are
//! swept with the expired records.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::trace;

/// Why a row came back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOrigin {
    /// A user action such as a drop at the end of a drag
    User,
    /// Replayed from the host's undo history
    Undo,
}

/// How an insertion was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Undo of an explicit removal
    Restored,
    /// Second half of a move
    Reordered,
    /// Neither; the row is treated as new
    Fresh,
}

/// A removal waiting to be matched by an insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRecord {
    pub item_id: String,
    pub removed_at: DateTime<Utc>,
}

/// Tracks removed rows for one editing surface
#[derive(Debug, Clone)]
pub struct RemovalTracker {
    window: chrono::Duration,
    undo_retention: chrono::Duration,
    records: HashMap<String, DateTime<Utc>>,
    removed: HashMap<String, DateTime<Utc>>,
}

impl RemovalTracker {
    /// Create a tracker whose undo retention defaults to five minutes
    pub fn new(window: chrono::Duration) -> Self {
        Self {
            window,
            undo_retention: chrono::Duration::minutes(5),
            records: HashMap::new(),
            removed: HashMap::new(),
        }
    }

    /// How long an explicit removal stays undoable
    pub fn with_undo_retention(mut self, retention: chrono::Duration) -> Self {
        self.undo_retention = retention;
        self
    }

    pub fn window(&self) -> chrono::Duration {
        self.window
    }

    /// Note that `item_id` was removed at `now`
    pub fn record_removal(&mut self, item_id: &str, now: DateTime<Utc>) {
        self.records.insert(item_id.to_string(), now);
        self.removed.insert(item_id.to_string(), now);
    }

    /// Classify an insertion of `item_id` at `now`
    ///
    /// Restored and reordered rows are forgotten. A fresh insert clears the
    /// pending undo but leaves any expired record in place for the next
    /// sweep.
    pub fn classify_insert(
        &mut self,
        item_id: &str,
        origin: InsertOrigin,
        now: DateTime<Utc>,
    ) -> InsertOutcome {
        if origin == InsertOrigin::Undo && self.removed.remove(item_id).is_some() {
            self.records.remove(item_id);
            return InsertOutcome::Restored;
        }

        let within_window = self
            .records
            .get(item_id)
            .is_some_and(|removed_at| self.is_fresh(*removed_at, now));

        if within_window {
            self.records.remove(item_id);
            self.removed.remove(item_id);
            return InsertOutcome::Reordered;
        }

        self.removed.remove(item_id);
        InsertOutcome::Fresh
    }

    /// Drop records older than the window and removals older than the
    /// undo retention
    ///
    /// Returns how many reorder records were dropped.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        let window = self.window;
        self.records
            .retain(|_, removed_at| now.signed_duration_since(*removed_at) < window);
        let dropped = before - self.records.len();

        let retention = self.undo_retention;
        let undoable = self.removed.len();
        self.removed
            .retain(|_, removed_at| now.signed_duration_since(*removed_at) < retention);
        let forgotten = undoable - self.removed.len();

        if dropped > 0 || forgotten > 0 {
            trace!(
                "Swept {} expired removal record(s), {} expired undo(s)",
                dropped, forgotten
            );
        }
        dropped
    }

    /// Pending record for `item_id`, if any
    pub fn record(&self, item_id: &str) -> Option<RemovalRecord> {
        self.records.get(item_id).map(|removed_at| RemovalRecord {
            item_id: item_id.to_string(),
            removed_at: *removed_at,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.records.len()
    }

    /// Whether `item_id` is awaiting an undo
    pub fn is_removed(&self, item_id: &str) -> bool {
        self.removed.contains_key(item_id)
    }

    fn is_fresh(&self, removed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(removed_at);
        age >= chrono::Duration::zero() && age < self.window
    }
}
