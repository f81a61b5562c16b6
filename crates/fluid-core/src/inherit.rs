//! Breakpoint inheritance resolution
//!
//! Responsive controls are stored once per device, with the device encoded
//! as a name suffix (`padding`, `padding_tablet`, `padding_mobile`). When a
//! narrower device has no value of its own, the editor shows the value it
//! inherits from the nearest wider device that has one.
//!
//! ## Rules
//!
//! - The base device (no suffix) never inherits.
//! - The widescreen device inherits from the base device only, regardless
//!   of where it sits in the order.
//! - Every other device walks its wider devices, nearest first, skipping
//!   the widescreen device.
//! - A control with its own non-empty value never resolves: inheritance
//!   only fills gaps.

use crate::config::DeviceConfig;
use crate::error::Result;

/// A control name split into its base name and device suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlName<'a> {
    pub base_name: &'a str,
    /// `None` for the base device
    pub device: Option<&'a str>,
}

/// Ordered device list, widest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHierarchy {
    order: Vec<String>,
    base_device: String,
    widescreen_device: Option<String>,
}

impl DeviceHierarchy {
    /// Build a hierarchy from validated configuration
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            order: config.order.clone(),
            base_device: config.base_device.clone(),
            widescreen_device: config.widescreen_device.clone(),
        })
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn base_device(&self) -> &str {
        &self.base_device
    }

    pub fn is_widescreen(&self, device: &str) -> bool {
        self.widescreen_device.as_deref() == Some(device)
    }

    /// Split a control name by the longest matching device suffix
    pub fn split_control_name<'a>(&self, name: &'a str) -> ControlName<'a> {
        let matched = self
            .order
            .iter()
            .filter(|device| **device != self.base_device)
            .filter(|device| {
                name.len() > device.len() + 1
                    && name.ends_with(device.as_str())
                    && name.as_bytes()[name.len() - device.len() - 1] == b'_'
            })
            .max_by_key(|device| device.len());

        match matched {
            Some(device) => ControlName {
                base_name: &name[..name.len() - device.len() - 1],
                device: Some(&name[name.len() - device.len()..]),
            },
            None => ControlName {
                base_name: name,
                device: None,
            },
        }
    }

    /// Control name holding `base_name`'s value for `device`
    pub fn control_name_for(&self, base_name: &str, device: &str) -> String {
        if device == self.base_device {
            base_name.to_string()
        } else {
            format!("{}_{}", base_name, device)
        }
    }

    /// Devices `device` may inherit from, nearest first
    pub fn ancestors(&self, device: &str) -> Vec<&str> {
        if self.is_widescreen(device) {
            return vec![self.base_device.as_str()];
        }

        let Some(position) = self.order.iter().position(|d| d == device) else {
            return Vec::new();
        };

        self.order[..position]
            .iter()
            .rev()
            .filter(|d| !self.is_widescreen(d))
            .map(String::as_str)
            .collect()
    }
}

/// Where an inherited value came from
#[derive(Debug, Clone, PartialEq)]
pub struct InheritedResult<V> {
    /// Device whose value was resolved
    pub source_device: String,
    /// Nearest wider device of the queried one
    pub direct_parent_device: String,
    pub resolved_value: V,
    /// Devices that inherit the resolved value: the queried device followed
    /// by every ancestor skipped for being empty
    pub inherit_chain_path: Vec<String>,
    /// Set when no ancestor had a non-empty value and the direct parent's
    /// own (empty) value is reported instead
    pub parent_unset: bool,
}

/// Resolve the value `control_name` inherits
///
/// `value_of` looks up a control by full name; `is_empty` decides whether a
/// present value counts as authored for this control's shape.
pub fn resolve<V, G, E>(
    control_name: &str,
    hierarchy: &DeviceHierarchy,
    value_of: G,
    is_empty: E,
) -> Option<InheritedResult<V>>
where
    V: Clone,
    G: Fn(&str) -> Option<V>,
    E: Fn(&V) -> bool,
{
    let parsed = hierarchy.split_control_name(control_name);
    let device = parsed.device?;

    if value_of(control_name).is_some_and(|own| !is_empty(&own)) {
        return None;
    }

    let chain = hierarchy.ancestors(device);
    let parent = *chain.first()?;
    let parent_value = value_of(&hierarchy.control_name_for(parsed.base_name, parent));

    let mut path = vec![device.to_string()];
    for (i, ancestor) in chain.iter().enumerate() {
        let value = if i == 0 {
            parent_value.clone()
        } else {
            value_of(&hierarchy.control_name_for(parsed.base_name, ancestor))
        };

        if let Some(value) = value.filter(|v| !is_empty(v)) {
            return Some(InheritedResult {
                source_device: ancestor.to_string(),
                direct_parent_device: parent.to_string(),
                resolved_value: value,
                inherit_chain_path: path,
                parent_unset: false,
            });
        }
        path.push(ancestor.to_string());
    }

    parent_value.map(|value| InheritedResult {
        source_device: parent.to_string(),
        direct_parent_device: parent.to_string(),
        resolved_value: value,
        inherit_chain_path: path,
        parent_unset: true,
    })
}
