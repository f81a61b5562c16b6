// # File Preset Store
//
// JSON-document implementation of PresetStore.
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "groups": [
//     {
//       "id": "type",
//       "title": "Type scale",
//       "presets": [
//         { "id": "h1", "title": "Heading 1",
//           "min": { "size": 32, "unit": "px" },
//           "max": { "size": 64, "unit": "px" } }
//       ]
//     }
//   ]
// }
// ```
//
// Writes go through a temporary file and a rename. Stronger durability
// (backups, recovery) is left to the host.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::preset::PresetGroup;
use crate::traits::preset_store::PresetStore;

/// Preset file format version
const PRESET_FILE_VERSION: &str = "1.0";

/// Serializable preset file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct PresetFileFormat {
    version: String,
    #[serde(default)]
    groups: Vec<PresetGroup>,
}

/// Preset store backed by one JSON file
///
/// The document is loaded once on open; every mutation rewrites the file.
///
/// # Example
///
/// ```rust,no_run
/// use fluid_core::store::FilePresetStore;
/// use fluid_core::traits::PresetStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FilePresetStore::open("presets.json").await?;
///     for group in store.list_groups().await? {
///         println!("{} ({} presets)", group.title, group.presets.len());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FilePresetStore {
    path: PathBuf,
    groups: Arc<RwLock<Vec<PresetGroup>>>,
}

impl FilePresetStore {
    /// Open a preset file, starting empty if it does not exist
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let groups = Self::load(&path).await?;
        tracing::debug!("Loaded {} preset group(s) from {}", groups.len(), path.display());

        Ok(Self {
            path,
            groups: Arc::new(RwLock::new(groups)),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<Vec<PresetGroup>, Error> {
        if !path.exists() {
            tracing::debug!("Preset file does not exist: {}", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::store(format!("Failed to read preset file {}: {}", path.display(), e))
        })?;

        let file: PresetFileFormat = serde_json::from_str(&content).map_err(|e| {
            Error::store(format!("Failed to parse preset file {}: {}", path.display(), e))
        })?;

        if file.version != PRESET_FILE_VERSION {
            tracing::warn!(
                "Preset file version mismatch: expected {}, got {}. Attempting to load anyway.",
                PRESET_FILE_VERSION,
                file.version
            );
        }

        Ok(file.groups)
    }

    async fn write(&self, groups: &[PresetGroup]) -> Result<(), Error> {
        let file = PresetFileFormat {
            version: PRESET_FILE_VERSION.to_string(),
            groups: groups.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let temp_path = self.temp_path();
        {
            let mut temp = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            temp.write_all(json.as_bytes()).await?;
            temp.flush().await?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Preset file written: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

#[async_trait]
impl PresetStore for FilePresetStore {
    async fn list_groups(&self) -> Result<Vec<PresetGroup>, Error> {
        Ok(self.groups.read().await.clone())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<PresetGroup>, Error> {
        let guard = self.groups.read().await;
        Ok(guard.iter().find(|g| g.id == group_id).cloned())
    }

    async fn save_group(&self, group: &PresetGroup) -> Result<(), Error> {
        let mut guard = self.groups.write().await;
        match guard.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group.clone(),
            None => guard.push(group.clone()),
        }
        self.write(&guard).await
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), Error> {
        let mut guard = self.groups.write().await;
        let before = guard.len();
        guard.retain(|g| g.id != group_id);
        if guard.len() == before {
            return Ok(());
        }
        self.write(&guard).await
    }
}
