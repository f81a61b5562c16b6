//! Core traits for the fluid engine
//!
//! This module defines the abstract interfaces to the host editor.
//!
//! - [`PresetStore`]: Persisted preset groups keyed by opaque ids
//! - [`StyleHost`]: Surface providing the live preview style container

pub mod preset_store;
pub mod style_host;

pub use preset_store::PresetStore;
pub use style_host::{StyleContainer, StyleHost};
