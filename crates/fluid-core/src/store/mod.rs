// # Preset Store Implementations
//
// This module provides implementations of the PresetStore trait and the
// shared-fetch cache that sits in front of them.

pub mod cache;
pub mod file;
pub mod memory;

pub use cache::{PresetCache, PresetSnapshot};
pub use file::FilePresetStore;
pub use memory::MemoryPresetStore;
