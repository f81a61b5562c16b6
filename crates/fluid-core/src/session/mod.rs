//! Edit session
//!
//! One [`EditSession`] is built per editing surface. It owns the live
//! overlay and the removal tracker for that surface and correlates the
//! host's structural list mutations with overlay operations.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ Host editor  │─── SessionInput ───┐
//! └──────────────┘                    │
//!                                     ▼
//!                            ┌──────────────┐
//!                            │ EditSession  │
//!                            └──────────────┘
//!                                     │
//!         ┌───────────────────────────┼───────────────────────────┐
//!         ▼                           ▼                           ▼
//! ┌───────────────┐          ┌────────────────┐          ┌──────────────┐
//! │ LiveOverlay   │          │ RemovalTracker │          │   Events     │
//! │ (set/unset/   │          │ (reorder       │          │  (notify)    │
//! │  restore)     │          │  window)       │          │              │
//! └───────────────┘          └────────────────┘          └──────────────┘
//! ```
//!
//! ## Event Flow
//!
//! 1. Row removed: record the removal, unset the preset's variable
//! 2. Row inserted by undo: restore the variable
//! 3. Row inserted within the reorder window: restore the variable
//! 4. Periodic sweep drops removal records older than the window
//!
//! Every handler runs to completion on the caller's task. Nothing here
//! calls back into the host, so an overlay write can never re-enter the
//! session.

pub mod tracker;

use crate::config::FluidConfig;
use crate::error::Result;
use crate::formula::{DecompiledFormula, ScreenRange, compile, decompile};
use crate::overlay::LiveOverlay;
use crate::preset::{Preset, is_valid_id, variable_name};
use crate::store::{PresetCache, PresetSnapshot};
use crate::traits::StyleHost;
use crate::value::parse_value;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

pub use tracker::{InsertOrigin, InsertOutcome, RemovalRecord, RemovalTracker};

/// Why a preview variable was restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreReason {
    Undo,
    Reorder,
}

/// Events emitted by the EditSession
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A preview formula was written
    PreviewApplied {
        preset_id: String,
        formula: String,
    },

    /// Edit text did not parse; the overlay was left alone
    PreviewRejected {
        preset_id: String,
        reason: String,
    },

    /// A removed row's variable was unset
    PreviewUnset {
        preset_id: String,
    },

    /// A returning row's variable was restored
    PreviewRestored {
        preset_id: String,
        reason: RestoreReason,
    },

    /// An insert matched no pending removal
    InsertedFresh {
        preset_id: String,
    },

    /// The style host could not provide a container
    OverlayUnavailable {
        preset_id: String,
    },

    /// Expired removal records were dropped
    RemovalsSwept {
        count: usize,
    },

    /// A fetched preset list became the session catalog
    SnapshotApplied {
        generation: u64,
        presets: usize,
    },

    /// A fetched preset list arrived after an invalidation and was ignored
    SnapshotDiscarded {
        generation: u64,
        current: u64,
    },

    /// Session loop started
    Started,

    /// Session loop stopped
    Stopped {
        reason: String,
    },
}

/// Unsaved min/max edit for one preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEdit {
    pub preset_id: String,
    pub min: String,
    pub max: String,
    pub breakpoint_override: Option<ScreenRange>,
}

impl PresetEdit {
    pub fn new(preset_id: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            preset_id: preset_id.into(),
            min: min.into(),
            max: max.into(),
            breakpoint_override: None,
        }
    }

    pub fn with_override(mut self, range: ScreenRange) -> Self {
        self.breakpoint_override = Some(range);
        self
    }
}

/// Input delivered by the host editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Edited(PresetEdit),
    Removed { preset_id: String },
    Inserted { preset_id: String, origin: InsertOrigin },
    SurfaceReloaded,
}

/// Per-surface editing context
///
/// ## Threading
///
/// The session is single-writer: all methods take `&mut self` and are
/// driven from one task. No locking is involved.
pub struct EditSession {
    overlay: LiveOverlay,
    tracker: RemovalTracker,
    global_range: ScreenRange,
    variable_prefix: String,
    sweep_interval: std::time::Duration,
    catalog: HashMap<String, Preset>,
    catalog_generation: Option<u64>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl EditSession {
    /// Create a session for one editing surface
    ///
    /// # Returns
    ///
    /// A tuple of (session, event_receiver) where event_receiver yields
    /// session events
    pub fn new(
        host: Box<dyn StyleHost>,
        config: &FluidConfig,
    ) -> Result<(Self, mpsc::Receiver<SessionEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.session.event_channel_capacity);

        let session = Self {
            overlay: LiveOverlay::new(host),
            tracker: RemovalTracker::new(config.session.reorder_window())
                .with_undo_retention(config.session.undo_retention()),
            global_range: config.breakpoints.screen_range()?,
            variable_prefix: config.variable_prefix.clone(),
            sweep_interval: config.session.sweep_interval(),
            catalog: HashMap::new(),
            catalog_generation: None,
            event_tx: tx,
        };

        Ok((session, rx))
    }

    /// CSS variable for a preset id
    pub fn variable_name(&self, preset_id: &str) -> String {
        variable_name(&self.variable_prefix, preset_id)
    }

    pub fn overlay(&mut self) -> &mut LiveOverlay {
        &mut self.overlay
    }

    pub fn tracker(&self) -> &RemovalTracker {
        &self.tracker
    }

    /// Preset from the last applied snapshot
    pub fn catalog_preset(&self, preset_id: &str) -> Option<&Preset> {
        self.catalog.get(preset_id)
    }

    /// Preview an unsaved edit
    ///
    /// Returns `true` when the overlay was updated.
    pub fn preview_edit(&mut self, edit: &PresetEdit) -> bool {
        let (Some(min), Some(max)) = (parse_value(&edit.min), parse_value(&edit.max)) else {
            self.emit_event(SessionEvent::PreviewRejected {
                preset_id: edit.preset_id.clone(),
                reason: format!("invalid value (min '{}', max '{}')", edit.min, edit.max),
            });
            return false;
        };

        let range = edit.breakpoint_override.unwrap_or(self.global_range);
        let formula = compile(&min, &max, range);
        self.write_preview(&edit.preset_id, formula)
    }

    /// Preview a whole preset, e.g. after switching its override on
    pub fn preview_preset(&mut self, preset: &Preset) -> bool {
        let formula = preset.formula(self.global_range);
        self.write_preview(preset.id(), formula)
    }

    /// Endpoints to show when a preset is re-opened for editing
    ///
    /// The live overlay formula wins over the catalog's persisted one.
    pub fn editable_endpoints(&mut self, preset_id: &str) -> Option<DecompiledFormula> {
        let name = self.variable_name(preset_id);
        if let Some(live) = self.overlay.current_value(&name) {
            return decompile(&live);
        }

        let persisted = self.catalog.get(preset_id)?.formula(self.global_range);
        decompile(&persisted)
    }

    /// Handle removal of a preset row at `now`
    pub fn on_removed_at(&mut self, preset_id: &str, now: DateTime<Utc>) {
        if !self.accepts_id(preset_id) {
            return;
        }
        self.tracker.record_removal(preset_id, now);

        let name = self.variable_name(preset_id);
        if self.overlay.unset_variable(&name) {
            self.emit_event(SessionEvent::PreviewUnset {
                preset_id: preset_id.to_string(),
            });
        } else {
            self.overlay_unavailable(preset_id);
        }
    }

    /// Handle insertion of a preset row at `now`
    pub fn on_inserted_at(
        &mut self,
        preset_id: &str,
        origin: InsertOrigin,
        now: DateTime<Utc>,
    ) -> InsertOutcome {
        if !self.accepts_id(preset_id) {
            return InsertOutcome::Fresh;
        }
        let outcome = self.tracker.classify_insert(preset_id, origin, now);

        let reason = match outcome {
            InsertOutcome::Restored => RestoreReason::Undo,
            InsertOutcome::Reordered => RestoreReason::Reorder,
            InsertOutcome::Fresh => {
                debug!("Insert of {} matched no pending removal", preset_id);
                self.emit_event(SessionEvent::InsertedFresh {
                    preset_id: preset_id.to_string(),
                });
                return outcome;
            }
        };

        let name = self.variable_name(preset_id);
        if self.overlay.restore_variable(&name) {
            debug!("Restored preview of {} ({:?})", preset_id, reason);
            self.emit_event(SessionEvent::PreviewRestored {
                preset_id: preset_id.to_string(),
                reason,
            });
        } else {
            self.overlay_unavailable(preset_id);
        }

        outcome
    }

    /// Drop removal records older than the reorder window
    pub fn sweep_at(&mut self, now: DateTime<Utc>) -> usize {
        let count = self.tracker.sweep(now);
        if count > 0 {
            self.emit_event(SessionEvent::RemovalsSwept { count });
        }
        count
    }

    /// Adopt a fetched preset list unless it has been superseded
    ///
    /// A snapshot is discarded when the cache was invalidated after its fetch
    /// started, or when a newer snapshot was already applied.
    pub fn apply_snapshot(&mut self, snapshot: &PresetSnapshot, cache: &PresetCache) -> bool {
        let current = cache.generation();
        let superseded = self
            .catalog_generation
            .is_some_and(|applied| applied > snapshot.generation);

        if !cache.is_current(snapshot) || superseded {
            warn!(
                "Discarding stale preset snapshot (generation {}, current {})",
                snapshot.generation, current
            );
            self.emit_event(SessionEvent::SnapshotDiscarded {
                generation: snapshot.generation,
                current,
            });
            return false;
        }

        let mut catalog = HashMap::new();
        for record in snapshot.groups.iter().flat_map(|g| g.presets.iter()) {
            match Preset::from_record(record) {
                Ok(preset) => {
                    catalog.insert(record.id.clone(), preset);
                }
                Err(e) => warn!("Ignoring preset {} in snapshot: {}", record.id, e),
            }
        }

        let presets = catalog.len();
        self.catalog = catalog;
        self.catalog_generation = Some(snapshot.generation);
        self.emit_event(SessionEvent::SnapshotApplied {
            generation: snapshot.generation,
            presets,
        });
        true
    }

    /// Handle one host input using the current time
    pub fn handle(&mut self, input: SessionInput) {
        match input {
            SessionInput::Edited(edit) => {
                self.preview_edit(&edit);
            }
            SessionInput::Removed { preset_id } => self.on_removed_at(&preset_id, Utc::now()),
            SessionInput::Inserted { preset_id, origin } => {
                self.on_inserted_at(&preset_id, origin, Utc::now());
            }
            SessionInput::SurfaceReloaded => {
                info!("Preview surface reloaded, overlay will be rebuilt");
                self.overlay.reset();
            }
        }
    }

    /// Drive the session from a stream of host inputs
    ///
    /// Runs until the stream ends or `shutdown` fires, sweeping expired
    /// removal records on the configured interval.
    pub async fn run_with_shutdown<S>(&mut self, mut inputs: S, mut shutdown: oneshot::Receiver<()>)
    where
        S: Stream<Item = SessionInput> + Unpin,
    {
        self.emit_event(SessionEvent::Started);

        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                input = inputs.next() => match input {
                    Some(input) => self.handle(input),
                    None => {
                        info!("Session input stream closed");
                        self.emit_event(SessionEvent::Stopped {
                            reason: "Input stream closed".to_string(),
                        });
                        break;
                    }
                },

                _ = sweep.tick() => {
                    self.sweep_at(Utc::now());
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(SessionEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }
    }

    fn write_preview(&mut self, preset_id: &str, formula: String) -> bool {
        if !self.accepts_id(preset_id) {
            return false;
        }
        let name = self.variable_name(preset_id);
        if !self.overlay.set_variable(&name, &formula) {
            self.overlay_unavailable(preset_id);
            return false;
        }

        self.emit_event(SessionEvent::PreviewApplied {
            preset_id: preset_id.to_string(),
            formula,
        });
        true
    }

    fn accepts_id(&self, preset_id: &str) -> bool {
        if is_valid_id(preset_id) {
            return true;
        }
        warn!("Ignoring preset with malformed id {:?}", preset_id);
        self.emit_event(SessionEvent::PreviewRejected {
            preset_id: preset_id.to_string(),
            reason: "malformed preset id".to_string(),
        });
        false
    }

    fn overlay_unavailable(&self, preset_id: &str) {
        self.emit_event(SessionEvent::OverlayUnavailable {
            preset_id: preset_id.to_string(),
        });
    }

    fn emit_event(&self, event: SessionEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Session event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}
