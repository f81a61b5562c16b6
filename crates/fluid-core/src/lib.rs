// # fluid-core
//
// Core library for the fluid value resolution engine.
//
// ## Architecture Overview
//
// This library turns min/max design-token pairs into CSS `clamp()`
// formulas and keeps live editor previews of them consistent:
// - **value**: Parses token text into magnitude and unit
// - **formula**: Compiles min/max into a clamp() formula and back
// - **inherit**: Resolves values inherited across the device hierarchy
// - **overlay**: Live preview stylesheet with set/unset/restore
// - **session**: Per-surface context correlating list edits with the overlay
// - **store**: Preset stores and the shared-fetch preset cache
// - **registry**: Control kinds and shapes fixed at registration
// - **render**: The persisted `:root {}` stylesheet
//
// ## Design Principles
//
// 1. **Degrade, don't fail**: invalid text and unreachable surfaces mean
//    "no visual update", never an aborted session
// 2. **One naming function**: a preset's variable name is prefix + id
//    everywhere
// 3. **Host-agnostic**: the host supplies devices, presets and the style
//    container through traits and configuration
// 4. **Library-First**: the binary is a thin layer over this crate

pub mod config;
pub mod error;
pub mod formula;
pub mod inherit;
pub mod overlay;
pub mod preset;
pub mod registry;
pub mod render;
pub mod session;
pub mod store;
pub mod surface;
pub mod traits;
pub mod value;

// Re-export core types for convenience
pub use config::{BreakpointConfig, DeviceConfig, FluidConfig, SessionConfig};
pub use error::{Error, Result};
pub use formula::{DecompiledFormula, ScreenRange, compile, decompile, evaluate};
pub use inherit::{DeviceHierarchy, InheritedResult, resolve};
pub use overlay::LiveOverlay;
pub use preset::{Preset, PresetGroup, PresetRecord, variable_name};
pub use registry::{ControlKind, ControlRegistry, ControlShape, ControlValue};
pub use render::render_root_block;
pub use session::{EditSession, PresetEdit, SessionEvent, SessionInput};
pub use store::{FilePresetStore, MemoryPresetStore, PresetCache, PresetSnapshot};
pub use surface::MemoryStyleHost;
pub use traits::{PresetStore, StyleContainer, StyleHost};
pub use value::{ParsedValue, Unit, parse_value};
