// # Preset Store Trait
//
// Defines the interface to the host's persisted preset records.
//
// ## Purpose
//
// Presets live in group records owned by the host. The engine only needs
// to list, fetch and write groups by their opaque ids; how the host
// persists them is its own business.
//
// ## Implementations
//
// - In-memory: `MemoryPresetStore`
// - JSON document: `FilePresetStore`
//
// ## Usage
//
// ```rust,ignore
// use fluid_core::PresetStore;
//
// let groups = store.list_groups().await?;
// let preset = store.find_preset("h1").await?;
// ```

use async_trait::async_trait;

use crate::preset::{PresetGroup, PresetRecord};

/// Trait for preset store implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Implementation Guidelines
///
/// - **Async I/O only**: never block the calling task
/// - **Order preserving**: `list_groups` returns groups, and presets within
///   a group, in the order the host stored them
/// - **No business logic**: formula compilation and previews belong to the
///   engine, not the store
#[async_trait]
pub trait PresetStore: Send + Sync {
    /// List all groups in stored order
    async fn list_groups(&self) -> Result<Vec<PresetGroup>, crate::Error>;

    /// Get a group by id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(group))`: The group
    /// - `Ok(None)`: No group with that id
    /// - `Err(Error)`: Storage error
    async fn get_group(&self, group_id: &str) -> Result<Option<PresetGroup>, crate::Error>;

    /// Create or replace a group
    ///
    /// A new group is appended; an existing one keeps its position.
    async fn save_group(&self, group: &PresetGroup) -> Result<(), crate::Error>;

    /// Delete a group
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Deleted (or didn't exist)
    /// - `Err(Error)`: Storage error
    async fn delete_group(&self, group_id: &str) -> Result<(), crate::Error>;

    /// Find a preset by id across all groups
    async fn find_preset(&self, preset_id: &str) -> Result<Option<PresetRecord>, crate::Error> {
        let groups = self.list_groups().await?;
        Ok(groups
            .into_iter()
            .flat_map(|group| group.presets)
            .find(|preset| preset.id == preset_id))
    }
}
