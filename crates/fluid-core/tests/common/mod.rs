//! Test doubles and common utilities for contract tests

#![allow(dead_code)]

use fluid_core::error::Result;
use fluid_core::preset::{PresetGroup, PresetRecord, SizeRecord};
use fluid_core::session::SessionEvent;
use fluid_core::traits::PresetStore;
use fluid_core::value::{ParsedValue, Unit};
use fluid_core::{DeviceConfig, FluidConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify, mpsc};

pub fn px(magnitude: &str) -> ParsedValue {
    ParsedValue::new(magnitude, Unit::Px)
}

pub fn record(id: &str, min: &str, max: &str) -> PresetRecord {
    PresetRecord {
        id: id.to_string(),
        title: id.to_string(),
        min: SizeRecord::new(min, "px"),
        max: SizeRecord::new(max, "px"),
        override_enabled: None,
        override_min_screen: None,
        override_max_screen: None,
    }
}

pub fn group(id: &str, presets: &[PresetRecord]) -> PresetGroup {
    PresetGroup {
        id: id.to_string(),
        title: id.to_string(),
        presets: presets.to_vec(),
    }
}

/// Default configuration with a fast reorder window and sweep for loop tests
pub fn fast_config(window_ms: u64, sweep_ms: u64) -> FluidConfig {
    let mut config = FluidConfig::default();
    config.session.reorder_window_ms = window_ms;
    config.session.sweep_interval_ms = sweep_ms;
    config
}

pub fn three_devices() -> DeviceConfig {
    DeviceConfig::new(["desktop", "tablet", "mobile"])
}

/// Drain every event currently in the channel
pub fn drain(rx: &mut mpsc::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// A preset store that counts fetches and can hold them until released
pub struct GatedPresetStore {
    groups: Mutex<Vec<PresetGroup>>,
    list_calls: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
}

impl GatedPresetStore {
    /// A store whose fetches complete immediately
    pub fn open(groups: Vec<PresetGroup>) -> Self {
        Self {
            groups: Mutex::new(groups),
            list_calls: Arc::new(AtomicUsize::new(0)),
            gate: None,
            started: Arc::new(Notify::new()),
        }
    }

    /// A store whose fetches wait for `release()`
    pub fn gated(groups: Vec<PresetGroup>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut store = Self::open(groups);
        store.gate = Some(Arc::clone(&gate));
        (store, gate)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Notified each time a fetch begins
    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }

    pub async fn replace(&self, groups: Vec<PresetGroup>) {
        *self.groups.lock().await = groups;
    }
}

#[async_trait::async_trait]
impl PresetStore for GatedPresetStore {
    async fn list_groups(&self) -> Result<Vec<PresetGroup>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.groups.lock().await.clone();
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<PresetGroup>> {
        let groups = self.groups.lock().await;
        Ok(groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn save_group(&self, group: &PresetGroup) -> Result<()> {
        let mut groups = self.groups.lock().await;
        groups.retain(|g| g.id != group.id);
        groups.push(group.clone());
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> Result<()> {
        self.groups.lock().await.retain(|g| g.id != group_id);
        Ok(())
    }
}
