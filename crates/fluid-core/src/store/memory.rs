// # Memory Preset Store
//
// In-memory implementation of PresetStore.
//
// Useful for tests and for hosts that hand the engine a fully loaded
// preset list up front. Nothing survives a restart.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::preset::PresetGroup;
use crate::traits::preset_store::PresetStore;

/// In-memory preset store
///
/// Groups are kept in insertion order behind a RwLock. Clones share the
/// same underlying list.
///
/// # Example
///
/// ```rust,no_run
/// use fluid_core::store::MemoryPresetStore;
/// use fluid_core::traits::PresetStore;
/// use fluid_core::preset::PresetGroup;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryPresetStore::new();
///     store.save_group(&PresetGroup::new("type", "Type scale")).await?;
///
///     let group = store.get_group("type").await?;
///     assert!(group.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPresetStore {
    inner: Arc<RwLock<Vec<PresetGroup>>>,
}

impl MemoryPresetStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with groups
    pub fn with_groups(groups: Vec<PresetGroup>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(groups)),
        }
    }

    /// Get the number of groups in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl PresetStore for MemoryPresetStore {
    async fn list_groups(&self) -> Result<Vec<PresetGroup>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<PresetGroup>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.iter().find(|g| g.id == group_id).cloned())
    }

    async fn save_group(&self, group: &PresetGroup) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        match guard.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group.clone(),
            None => guard.push(group.clone()),
        }
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.retain(|g| g.id != group_id);
        Ok(())
    }
}
