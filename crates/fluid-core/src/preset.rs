//! Preset model
//!
//! A preset is a named fluid value: a min/max pair with an optional
//! per-preset breakpoint override. Presets are persisted as
//! [`PresetRecord`]s inside a [`PresetGroup`]; [`Preset::from_record`]
//! validates a record into the typed form the compiler works with.
//!
//! A preset's CSS variable name is a pure function of its id (see
//! [`variable_name`]); the persisted renderer and the live overlay both go
//! through it so their declarations always address the same property.

use crate::error::{Error, Result};
use crate::formula::{ScreenRange, compile};
use crate::value::{ParsedValue, parse_value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CSS custom-property name for a preset id
///
/// The id is not checked here; ids reach this point through
/// [`Preset::from_record`] or [`validate_id`].
pub fn variable_name(prefix: &str, id: &str) -> String {
    format!("{}{}", prefix, id)
}

/// Whether `id` can be appended to a variable prefix as-is
///
/// Letters, digits, `-` and `_` only, so the resulting custom-property
/// name needs no escaping.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Reject an id that cannot form a custom-property name
pub fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_input("preset id cannot be empty"));
    }
    if !is_valid_id(id) {
        return Err(Error::invalid_input(format!(
            "preset id '{}' may only contain letters, digits, '-' and '_'",
            id
        )));
    }
    Ok(())
}

/// A size that may be persisted as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeField {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SizeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeField::Number(n) => write!(f, "{}", n),
            SizeField::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Persisted `{size, unit}` pair
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeRecord {
    #[serde(default)]
    pub size: Option<SizeField>,
    #[serde(default)]
    pub unit: String,
}

impl SizeRecord {
    pub fn new(size: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            size: Some(SizeField::Text(size.into())),
            unit: unit.into(),
        }
    }

    /// Parse into a value; a blank size means zero in the record's unit
    pub fn parse(&self) -> Option<ParsedValue> {
        let size = self
            .size
            .as_ref()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "0".to_string());
        parse_value(&format!("{}{}", size, self.unit.trim()))
    }
}

impl From<&ParsedValue> for SizeRecord {
    fn from(value: &ParsedValue) -> Self {
        Self::new(value.magnitude.clone(), value.unit.as_str())
    }
}

/// A preset as persisted by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub min: SizeRecord,
    #[serde(default)]
    pub max: SizeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_min_screen: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_max_screen: Option<u32>,
}

/// A group record owning an ordered list of presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetGroup {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub presets: Vec<PresetRecord>,
}

impl PresetGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            presets: Vec::new(),
        }
    }

    pub fn with_preset(mut self, preset: &Preset) -> Self {
        self.presets.push(preset.to_record());
        self
    }
}

/// A validated preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    id: String,
    pub title: String,
    pub min: ParsedValue,
    pub max: ParsedValue,
    pub breakpoint_override: Option<ScreenRange>,
}

impl Preset {
    pub fn new(id: impl Into<String>, title: impl Into<String>, min: ParsedValue, max: ParsedValue) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            min,
            max,
            breakpoint_override: None,
        }
    }

    pub fn with_override(mut self, range: ScreenRange) -> Self {
        self.breakpoint_override = Some(range);
        self
    }

    /// Validate a persisted record
    ///
    /// The override is honoured only when it is enabled and both screen
    /// widths are present. An enabled override whose max does not exceed
    /// its min is rejected.
    pub fn from_record(record: &PresetRecord) -> Result<Self> {
        validate_id(&record.id)?;

        let min = record.min.parse().ok_or_else(|| {
            Error::invalid_value(format!("preset '{}' has an invalid min value", record.id))
        })?;
        let max = record.max.parse().ok_or_else(|| {
            Error::invalid_value(format!("preset '{}' has an invalid max value", record.id))
        })?;

        let breakpoint_override = match (
            record.override_enabled.unwrap_or(false),
            record.override_min_screen,
            record.override_max_screen,
        ) {
            (true, Some(lo), Some(hi)) => Some(ScreenRange::new(lo, hi)?),
            _ => None,
        };

        Ok(Self {
            id: record.id.clone(),
            title: record.title.clone(),
            min,
            max,
            breakpoint_override,
        })
    }

    /// Convert back to the persisted form
    pub fn to_record(&self) -> PresetRecord {
        PresetRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            min: SizeRecord::from(&self.min),
            max: SizeRecord::from(&self.max),
            override_enabled: self.breakpoint_override.map(|_| true),
            override_min_screen: self.breakpoint_override.map(|r| r.min_px()),
            override_max_screen: self.breakpoint_override.map(|r| r.max_px()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn variable_name(&self, prefix: &str) -> String {
        variable_name(prefix, &self.id)
    }

    /// The override when present, else the global range
    pub fn screen_range(&self, global: ScreenRange) -> ScreenRange {
        self.breakpoint_override.unwrap_or(global)
    }

    pub fn formula(&self, global: ScreenRange) -> String {
        compile(&self.min, &self.max, self.screen_range(global))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Unit;

    fn record(json: &str) -> PresetRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_variable_name_is_prefix_plus_id() {
        assert_eq!(variable_name("--fluid-", "h1"), "--fluid-h1");
    }

    #[test]
    fn test_ids_that_break_css_are_rejected() {
        for id in ["a}b", "a b", "a;b", "a:b", "a{b", ""] {
            let json = format!(
                r#"{{"id":{},"min":{{"size":1}},"max":{{"size":2}}}}"#,
                serde_json::to_string(id).unwrap()
            );
            let err = Preset::from_record(&record(&json)).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "id {:?}", id);
        }
        assert!(is_valid_id("h1_large-2"));
    }

    #[test]
    fn test_record_with_numeric_and_text_sizes() {
        let preset = Preset::from_record(&record(
            r#"{"id":"h1","title":"Heading","min":{"size":24,"unit":"px"},"max":{"size":"3","unit":"REM"}}"#,
        ))
        .unwrap();
        assert_eq!(preset.min, ParsedValue::new("24", Unit::Px));
        assert_eq!(preset.max, ParsedValue::new("3", Unit::Rem));
        assert_eq!(preset.breakpoint_override, None);
    }

    #[test]
    fn test_blank_size_is_zero_in_unit() {
        let preset = Preset::from_record(&record(
            r#"{"id":"gap","min":{"size":"","unit":"rem"},"max":{"size":2,"unit":"rem"}}"#,
        ))
        .unwrap();
        assert_eq!(preset.min, ParsedValue::new("0", Unit::Rem));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err = Preset::from_record(&record(
            r#"{"id":"bad","min":{"size":"abc","unit":"px"},"max":{"size":2,"unit":"px"}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_override_only_when_enabled() {
        let disabled = Preset::from_record(&record(
            r#"{"id":"a","min":{"size":1},"max":{"size":2},"overrideEnabled":false,"overrideMinScreen":400,"overrideMaxScreen":1600}"#,
        ))
        .unwrap();
        assert_eq!(disabled.breakpoint_override, None);

        let enabled = Preset::from_record(&record(
            r#"{"id":"a","min":{"size":1},"max":{"size":2},"overrideEnabled":true,"overrideMinScreen":400,"overrideMaxScreen":1600}"#,
        ))
        .unwrap();
        assert_eq!(enabled.breakpoint_override, Some(ScreenRange::new(400, 1600).unwrap()));
    }

    #[test]
    fn test_degenerate_override_rejected() {
        let err = Preset::from_record(&record(
            r#"{"id":"a","min":{"size":1},"max":{"size":2},"overrideEnabled":true,"overrideMinScreen":900,"overrideMaxScreen":900}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { min: 900, max: 900 }));
    }

    #[test]
    fn test_record_round_trip_keeps_override() {
        let preset = Preset::new(
            "p1",
            "Body",
            ParsedValue::new("14", Unit::Px),
            ParsedValue::new("18", Unit::Px),
        )
        .with_override(ScreenRange::new(480, 1280).unwrap());
        assert_eq!(Preset::from_record(&preset.to_record()).unwrap(), preset);
    }

    #[test]
    fn test_formula_uses_override_range() {
        let preset = Preset::new(
            "p1",
            "Body",
            ParsedValue::new("10", Unit::Px),
            ParsedValue::new("100", Unit::Px),
        )
        .with_override(ScreenRange::new(400, 1600).unwrap());
        let formula = preset.formula(ScreenRange::default());
        assert!(formula.contains("(100vw - 400px) / (1600px - 400px)"));
    }
}
