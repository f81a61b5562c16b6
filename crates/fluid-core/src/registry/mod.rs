//! Control registry
//!
//! Responsive controls are registered once with an explicit kind and
//! shape. The shape decides what "empty" means during inheritance
//! resolution, so lookups never have to probe a control's attributes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fluid_core::registry::{ControlKind, ControlRegistry, ControlShape};
//!
//! let registry = ControlRegistry::new();
//! registry.register("padding", ControlKind::Builtin, ControlShape::Dimensions);
//! registry.register("font_size", ControlKind::Custom, ControlShape::Scalar);
//!
//! let inherited = registry.resolve_inherited("padding_mobile", &hierarchy, |name| values.get(name).cloned())?;
//! ```

use crate::error::{Error, Result};
use crate::inherit::{DeviceHierarchy, InheritedResult, resolve};
use crate::value::Unit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Where a control definition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Shipped with the host editor
    Builtin,
    /// Declared by a widget author
    Custom,
    /// Injected through a host filter hook
    FilterProvided,
}

/// Value layout of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlShape {
    /// One size and unit
    Scalar,
    /// Four sides sharing a unit
    Dimensions,
    /// Free text
    Text,
}

impl ControlShape {
    /// Whether `value` counts as unauthored for this shape
    ///
    /// A scalar with size `"0"` is authored; dimensions are empty only when
    /// every side is blank. A value of the wrong shape is treated as empty.
    pub fn is_empty(&self, value: &ControlValue) -> bool {
        match (self, value) {
            (ControlShape::Scalar, ControlValue::Scalar { size, .. }) => is_blank(size),
            (
                ControlShape::Dimensions,
                ControlValue::Dimensions {
                    top,
                    right,
                    bottom,
                    left,
                    ..
                },
            ) => [top, right, bottom, left].into_iter().all(is_blank),
            (ControlShape::Text, ControlValue::Text { value }) => value.trim().is_empty(),
            _ => true,
        }
    }
}

fn is_blank(side: &Option<String>) -> bool {
    side.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// A stored control value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ControlValue {
    Scalar {
        size: Option<String>,
        #[serde(default)]
        unit: Unit,
    },
    Dimensions {
        top: Option<String>,
        right: Option<String>,
        bottom: Option<String>,
        left: Option<String>,
        #[serde(default)]
        unit: Unit,
    },
    Text { value: String },
}

/// A registered control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRegistration {
    pub kind: ControlKind,
    pub shape: ControlShape,
}

/// Registry of responsive controls keyed by base name
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ControlRegistry {
    controls: RwLock<HashMap<String, ControlRegistration>>,
}

impl ControlRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control by its suffixless name
    ///
    /// Re-registering a name replaces the previous entry.
    pub fn register(&self, name: impl Into<String>, kind: ControlKind, shape: ControlShape) {
        let name = name.into();
        debug!("Registering {:?} control {} ({:?})", kind, name, shape);
        let mut controls = self.controls.write().unwrap_or_else(PoisonError::into_inner);
        controls.insert(name, ControlRegistration { kind, shape });
    }

    /// Look up a control by its suffixless name
    pub fn lookup(&self, name: &str) -> Option<ControlRegistration> {
        let controls = self.controls.read().unwrap_or_else(PoisonError::into_inner);
        controls.get(name).copied()
    }

    /// Check if a control is registered
    pub fn has_control(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered names of the given kind, sorted
    pub fn names_of_kind(&self, kind: ControlKind) -> Vec<String> {
        let controls = self.controls.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = controls
            .iter()
            .filter(|(_, reg)| reg.kind == kind)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Resolve the inherited value of a device-suffixed control
    ///
    /// # Returns
    ///
    /// - `Ok(Some(result))`: an ancestor supplies the value
    /// - `Ok(None)`: nothing to inherit (base device, or explicit value)
    /// - `Err(Error::NotFound)`: the control was never registered
    pub fn resolve_inherited<G>(
        &self,
        control_name: &str,
        hierarchy: &DeviceHierarchy,
        value_of: G,
    ) -> Result<Option<InheritedResult<ControlValue>>>
    where
        G: Fn(&str) -> Option<ControlValue>,
    {
        let base_name = hierarchy.split_control_name(control_name).base_name;
        let registration = self
            .lookup(base_name)
            .ok_or_else(|| Error::not_found(format!("control '{}' is not registered", base_name)))?;

        Ok(resolve(control_name, hierarchy, value_of, |value| {
            registration.shape.is_empty(value)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;

    fn scalar(size: &str) -> ControlValue {
        ControlValue::Scalar {
            size: Some(size.to_string()),
            unit: Unit::Px,
        }
    }

    fn sides(top: &str, right: &str, bottom: &str, left: &str) -> ControlValue {
        let side = |s: &str| Some(s.to_string());
        ControlValue::Dimensions {
            top: side(top),
            right: side(right),
            bottom: side(bottom),
            left: side(left),
            unit: Unit::Px,
        }
    }

    #[test]
    fn test_scalar_zero_is_authored() {
        assert!(!ControlShape::Scalar.is_empty(&scalar("0")));
        assert!(ControlShape::Scalar.is_empty(&scalar(" ")));
        assert!(ControlShape::Scalar.is_empty(&ControlValue::Scalar {
            size: None,
            unit: Unit::Rem
        }));
    }

    #[test]
    fn test_dimensions_empty_only_when_all_blank() {
        assert!(ControlShape::Dimensions.is_empty(&sides("", "", "", "")));
        assert!(!ControlShape::Dimensions.is_empty(&sides("", "4", "", "")));
    }

    #[test]
    fn test_kind_is_fixed_at_registration() {
        let registry = ControlRegistry::new();
        registry.register("padding", ControlKind::Builtin, ControlShape::Dimensions);
        registry.register("fluid_gap", ControlKind::FilterProvided, ControlShape::Scalar);

        assert_eq!(
            registry.lookup("padding"),
            Some(ControlRegistration {
                kind: ControlKind::Builtin,
                shape: ControlShape::Dimensions
            })
        );
        assert_eq!(
            registry.names_of_kind(ControlKind::FilterProvided),
            vec!["fluid_gap"]
        );
        assert!(!registry.has_control("margin"));
    }

    #[test]
    fn test_resolve_uses_registered_shape() {
        let registry = ControlRegistry::new();
        registry.register("padding", ControlKind::Builtin, ControlShape::Dimensions);
        let hierarchy =
            DeviceHierarchy::new(&DeviceConfig::new(["desktop", "tablet", "mobile"])).unwrap();

        let values: HashMap<&str, ControlValue> = HashMap::from([
            ("padding", sides("8", "8", "8", "8")),
            ("padding_tablet", sides("", "", "", "")),
        ]);

        let result = registry
            .resolve_inherited("padding_mobile", &hierarchy, |name| values.get(name).cloned())
            .unwrap()
            .unwrap();
        assert_eq!(result.source_device, "desktop");
        assert_eq!(result.inherit_chain_path, vec!["mobile", "tablet"]);
    }

    #[test]
    fn test_unregistered_control_is_an_error() {
        let registry = ControlRegistry::new();
        let hierarchy = DeviceHierarchy::new(&DeviceConfig::new(["desktop", "tablet"])).unwrap();
        let result = registry.resolve_inherited("margin_tablet", &hierarchy, |_| None);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
