//! Contract Test: Inheritance Resolver
//!
//! Constraints verified:
//! - a narrower device with no value inherits from the nearest wider one
//! - explicit values are never overridden
//! - the widescreen device inherits from the base device only
//! - emptiness comes from the control's registered shape

mod common;

use common::*;
use fluid_core::inherit::{DeviceHierarchy, resolve};
use fluid_core::registry::{ControlKind, ControlRegistry, ControlShape, ControlValue};
use fluid_core::value::Unit;
use fluid_core::DeviceConfig;
use std::collections::HashMap;

fn scalar(size: &str) -> ControlValue {
    ControlValue::Scalar {
        size: Some(size.to_string()),
        unit: Unit::Px,
    }
}

#[test]
fn tablet_inherits_desktop_value() {
    let hierarchy = DeviceHierarchy::new(&three_devices()).unwrap();
    let values = HashMap::from([("padding".to_string(), "24px".to_string())]);

    let result = resolve(
        "padding_tablet",
        &hierarchy,
        |name| values.get(name).cloned(),
        |v: &String| v.is_empty(),
    )
    .expect("tablet inherits");

    assert_eq!(result.resolved_value, "24px");
    assert_eq!(result.source_device, "desktop");
    assert_eq!(result.inherit_chain_path, vec!["tablet".to_string()]);
}

#[test]
fn scalar_zero_stops_the_walk() {
    let registry = ControlRegistry::new();
    registry.register("font_size", ControlKind::Custom, ControlShape::Scalar);
    let hierarchy = DeviceHierarchy::new(&three_devices()).unwrap();

    let values = HashMap::from([
        ("font_size".to_string(), scalar("18")),
        ("font_size_tablet".to_string(), scalar("0")),
    ]);

    let result = registry
        .resolve_inherited("font_size_mobile", &hierarchy, |name| values.get(name).cloned())
        .unwrap()
        .unwrap();

    assert_eq!(result.source_device, "tablet");
    assert_eq!(result.resolved_value, scalar("0"));
    assert!(!result.parent_unset);
}

#[test]
fn explicit_mobile_value_wins() {
    let registry = ControlRegistry::new();
    registry.register("font_size", ControlKind::Builtin, ControlShape::Scalar);
    let hierarchy = DeviceHierarchy::new(&three_devices()).unwrap();

    let values = HashMap::from([
        ("font_size".to_string(), scalar("18")),
        ("font_size_mobile".to_string(), scalar("12")),
    ]);

    let result = registry
        .resolve_inherited("font_size_mobile", &hierarchy, |name| values.get(name).cloned())
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn widescreen_skips_adjacency() {
    let hierarchy = DeviceHierarchy::new(&DeviceConfig::default()).unwrap();
    let values = HashMap::from([
        ("gap".to_string(), "32px".to_string()),
        ("gap_laptop".to_string(), "28px".to_string()),
    ]);

    let wide = resolve(
        "gap_widescreen",
        &hierarchy,
        |name| values.get(name).cloned(),
        |v: &String| v.is_empty(),
    )
    .unwrap();
    assert_eq!(wide.source_device, "desktop");
    assert_eq!(wide.direct_parent_device, "desktop");

    let tablet = resolve(
        "gap_tablet",
        &hierarchy,
        |name| values.get(name).cloned(),
        |v: &String| v.is_empty(),
    )
    .unwrap();
    assert_eq!(tablet.source_device, "laptop");
    assert_eq!(tablet.direct_parent_device, "tablet_extra");
    assert_eq!(tablet.inherit_chain_path, vec!["tablet", "tablet_extra"]);
}

#[test]
fn device_names_come_from_the_host() {
    let hierarchy =
        DeviceHierarchy::new(&DeviceConfig::new(["desktop", "phablet", "watch"])).unwrap();
    let values = HashMap::from([("radius_phablet".to_string(), "6px".to_string())]);

    let result = resolve(
        "radius_watch",
        &hierarchy,
        |name| values.get(name).cloned(),
        |v: &String| v.is_empty(),
    )
    .unwrap();
    assert_eq!(result.source_device, "phablet");
}
