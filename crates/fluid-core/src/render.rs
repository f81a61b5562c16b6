//! Persisted stylesheet rendering
//!
//! Emits the `:root {}` block written once at render time. Records that do
//! not validate are skipped with a warning so one bad preset never blanks
//! the whole stylesheet.

use crate::config::FluidConfig;
use crate::error::Result;
use crate::preset::{Preset, PresetGroup};
use tracing::{debug, warn};

/// Render every valid preset of every group as one `:root` block
///
/// Declarations follow group order, then preset order within a group.
pub fn render_root_block(groups: &[PresetGroup], config: &FluidConfig) -> Result<String> {
    let global = config.breakpoints.screen_range()?;
    let mut css = String::from(":root {\n");
    let mut rendered = 0usize;

    for group in groups {
        for record in &group.presets {
            let preset = match Preset::from_record(record) {
                Ok(preset) => preset,
                Err(e) => {
                    warn!("Skipping preset {} in group {}: {}", record.id, group.id, e);
                    continue;
                }
            };

            css.push_str(&format!(
                "  {}: {};\n",
                preset.variable_name(&config.variable_prefix),
                preset.formula(global)
            ));
            rendered += 1;
        }
    }

    css.push('}');
    debug!("Rendered {} preset declaration(s)", rendered);
    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{PresetRecord, SizeRecord};

    fn record(id: &str, min: &str, max: &str) -> PresetRecord {
        PresetRecord {
            id: id.to_string(),
            title: id.to_uppercase(),
            min: SizeRecord::new(min, "px"),
            max: SizeRecord::new(max, "px"),
            override_enabled: None,
            override_min_screen: None,
            override_max_screen: None,
        }
    }

    #[test]
    fn test_render_in_order_and_skip_invalid() {
        let mut spacing = PresetGroup::new("spacing", "Spacing");
        spacing.presets.push(record("s", "8", "8"));
        spacing.presets.push(record("broken", "x", "8"));
        let mut type_scale = PresetGroup::new("type", "Type");
        type_scale.presets.push(record("h1", "32", "64"));

        let css = render_root_block(&[spacing, type_scale], &FluidConfig::default()).unwrap();
        let lines: Vec<&str> = css.lines().collect();
        assert_eq!(lines[0], ":root {");
        assert_eq!(lines[1], "  --fluid-s: 8px;");
        assert!(lines[2].starts_with("  --fluid-h1: clamp(min(32px, 64px)"));
        assert_eq!(lines[3], "}");
        assert!(!css.contains("broken"));
    }

    #[test]
    fn test_render_rejects_degenerate_global_range() {
        let config = FluidConfig::new().with_breakpoints(800, 400);
        assert!(render_root_block(&[], &config).is_err());
    }
}
