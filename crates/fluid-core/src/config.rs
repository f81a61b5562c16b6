//! Configuration types for the fluid engine
//!
//! This module defines all configuration structures used throughout the crate.

use crate::formula::{DEFAULT_MAX_SCREEN_PX, DEFAULT_MIN_SCREEN_PX, ScreenRange};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default CSS custom-property prefix
pub const DEFAULT_VARIABLE_PREFIX: &str = "--fluid-";

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Global breakpoint pair
    #[serde(default)]
    pub breakpoints: BreakpointConfig,

    /// Device hierarchy
    #[serde(default)]
    pub devices: DeviceConfig,

    /// Prefix prepended to a preset id to form its CSS variable name
    #[serde(default = "default_variable_prefix")]
    pub variable_prefix: String,

    /// Edit-session settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl FluidConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            breakpoints: BreakpointConfig::default(),
            devices: DeviceConfig::default(),
            variable_prefix: default_variable_prefix(),
            session: SessionConfig::default(),
        }
    }

    /// Set the global breakpoints
    pub fn with_breakpoints(mut self, min_screen_width: u32, max_screen_width: u32) -> Self {
        self.breakpoints = BreakpointConfig {
            min_screen_width,
            max_screen_width,
        };
        self
    }

    /// Set the variable prefix
    pub fn with_variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variable_prefix = prefix.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.breakpoints.screen_range()?;
        self.devices.validate()?;
        self.session.validate()?;

        if !self.variable_prefix.starts_with("--") {
            return Err(crate::Error::config(format!(
                "Variable prefix must start with '--', got '{}'",
                self.variable_prefix
            )));
        }

        Ok(())
    }
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Global breakpoint pair in px
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointConfig {
    #[serde(default = "default_min_screen_width")]
    pub min_screen_width: u32,

    #[serde(default = "default_max_screen_width")]
    pub max_screen_width: u32,
}

impl BreakpointConfig {
    /// The validated global screen range
    pub fn screen_range(&self) -> Result<ScreenRange, crate::Error> {
        ScreenRange::new(self.min_screen_width, self.max_screen_width)
    }
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            min_screen_width: default_min_screen_width(),
            max_screen_width: default_max_screen_width(),
        }
    }
}

/// Device hierarchy supplied by the host editor
///
/// `order` runs from the widest device to the narrowest. The base device
/// is the one whose controls carry no suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_order")]
    pub order: Vec<String>,

    #[serde(default = "default_base_device")]
    pub base_device: String,

    /// Device that inherits straight from the base device
    #[serde(default = "default_widescreen_device")]
    pub widescreen_device: Option<String>,
}

impl DeviceConfig {
    /// Create a hierarchy from an explicit order, keeping the default
    /// base and widescreen device names
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Validate the device hierarchy
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.order.is_empty() {
            return Err(crate::Error::config("Device order cannot be empty"));
        }

        if !self.order.contains(&self.base_device) {
            return Err(crate::Error::config(format!(
                "Device order must contain the base device '{}'",
                self.base_device
            )));
        }

        let mut seen = HashSet::new();
        for device in &self.order {
            if device.is_empty() {
                return Err(crate::Error::config("Device names cannot be empty"));
            }
            if !seen.insert(device.as_str()) {
                return Err(crate::Error::config(format!(
                    "Device '{}' appears more than once",
                    device
                )));
            }
        }

        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            order: default_device_order(),
            base_device: default_base_device(),
            widescreen_device: default_widescreen_device(),
        }
    }
}

/// Edit-session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Window within which a remove followed by an insert of the same id
    /// is treated as a reorder (in milliseconds)
    #[serde(default = "default_reorder_window_ms")]
    pub reorder_window_ms: u64,

    /// How long an explicit removal stays undoable (in milliseconds)
    #[serde(default = "default_undo_retention_ms")]
    pub undo_retention_ms: u64,

    /// Interval between sweeps of expired removal records (in milliseconds)
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Capacity of the session event channel
    ///
    /// When full, new events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl SessionConfig {
    /// Validate the session configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.reorder_window_ms == 0 {
            return Err(crate::Error::config("Reorder window must be > 0"));
        }
        if self.undo_retention_ms < self.reorder_window_ms {
            return Err(crate::Error::config(
                "Undo retention must not be shorter than the reorder window",
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(crate::Error::config("Sweep interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }

    pub fn reorder_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.reorder_window_ms as i64)
    }

    pub fn undo_retention(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.undo_retention_ms as i64)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reorder_window_ms: default_reorder_window_ms(),
            undo_retention_ms: default_undo_retention_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_variable_prefix() -> String {
    DEFAULT_VARIABLE_PREFIX.to_string()
}

fn default_min_screen_width() -> u32 {
    DEFAULT_MIN_SCREEN_PX
}

fn default_max_screen_width() -> u32 {
    DEFAULT_MAX_SCREEN_PX
}

fn default_device_order() -> Vec<String> {
    [
        "widescreen",
        "desktop",
        "laptop",
        "tablet_extra",
        "tablet",
        "mobile_extra",
        "mobile",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_base_device() -> String {
    "desktop".to_string()
}

fn default_widescreen_device() -> Option<String> {
    Some("widescreen".to_string())
}

fn default_reorder_window_ms() -> u64 {
    200
}

fn default_undo_retention_ms() -> u64 {
    300_000
}

fn default_sweep_interval_ms() -> u64 {
    1000
}

fn default_event_channel_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FluidConfig::default();
        config.validate().unwrap();
        assert_eq!(config.breakpoints.min_screen_width, 360);
        assert_eq!(config.breakpoints.max_screen_width, 1920);
        assert_eq!(config.session.reorder_window_ms, 200);
    }

    #[test]
    fn test_degenerate_breakpoints_rejected() {
        let config = FluidConfig::new().with_breakpoints(1200, 1200);
        assert!(matches!(
            config.validate(),
            Err(crate::Error::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_prefix_must_be_custom_property() {
        let config = FluidConfig::new().with_variable_prefix("fluid-");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_order_checks() {
        let missing_base = DeviceConfig::new(["tablet", "mobile"]);
        assert!(missing_base.validate().is_err());

        let duplicated = DeviceConfig::new(["desktop", "tablet", "tablet"]);
        assert!(duplicated.validate().is_err());

        DeviceConfig::new(["desktop", "tablet", "mobile"])
            .validate()
            .unwrap();
    }

    #[test]
    fn test_undo_retention_covers_reorder_window() {
        let mut config = FluidConfig::default();
        assert_eq!(config.session.undo_retention_ms, 300_000);

        config.session.undo_retention_ms = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FluidConfig =
            serde_json::from_str(r#"{"session":{"reorder_window_ms":350}}"#).unwrap();
        assert_eq!(config.session.reorder_window_ms, 350);
        assert_eq!(config.session.sweep_interval_ms, 1000);
        assert_eq!(config.variable_prefix, "--fluid-");
        assert_eq!(config.devices.base_device, "desktop");
    }
}
