//! Token value parsing
//!
//! Turns author-entered text such as `"1.25rem"` or `"-4px"` into a
//! [`ParsedValue`]. Empty input is an explicit default (`0px`), not a
//! failure; anything else that does not fit `-?decimal unit?` is rejected
//! with `None`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?(?:\d+(?:\.\d+)?|\.\d+))([A-Za-z%]*)$").expect("value pattern is valid")
});

/// Units accepted for fluid token values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "rem")]
    Rem,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "vw")]
    Vw,
    #[serde(rename = "vh")]
    Vh,
}

impl Unit {
    /// CSS spelling of the unit
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Em => "em",
            Unit::Percent => "%",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
        }
    }
}

impl FromStr for Unit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "px" => Ok(Unit::Px),
            "rem" => Ok(Unit::Rem),
            "em" => Ok(Unit::Em),
            "%" => Ok(Unit::Percent),
            "vw" => Ok(Unit::Vw),
            "vh" => Ok(Unit::Vh),
            other => Err(crate::Error::invalid_value(format!("unknown unit '{}'", other))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A magnitude and unit pair
///
/// The magnitude is kept as the author wrote it so that compiled formulas
/// reproduce it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedValue {
    pub magnitude: String,
    pub unit: Unit,
}

impl ParsedValue {
    pub fn new(magnitude: impl Into<String>, unit: Unit) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit,
        }
    }

    /// The `0px` value produced for empty input
    pub fn zero() -> Self {
        Self::new("0", Unit::Px)
    }

    /// Numeric magnitude
    pub fn number(&self) -> f64 {
        // The parser only admits decimal text, so this cannot fail for
        // values it produced.
        self.magnitude.parse().unwrap_or(0.0)
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// Parse a token value
///
/// - empty or whitespace-only text yields `0px`
/// - a missing unit defaults to `px`
/// - units are matched case-insensitively
/// - anything else yields `None`
pub fn parse_value(text: &str) -> Option<ParsedValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(ParsedValue::zero());
    }

    let captures = VALUE_PATTERN.captures(trimmed)?;
    let magnitude = captures.get(1)?.as_str();
    let unit = match captures.get(2).map(|m| m.as_str()).unwrap_or("") {
        "" => Unit::Px,
        raw => raw.parse().ok()?,
    };

    Some(ParsedValue::new(magnitude, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero_px() {
        assert_eq!(parse_value(""), Some(ParsedValue::zero()));
        assert_eq!(parse_value("   \t"), Some(ParsedValue::zero()));
    }

    #[test]
    fn test_units_and_sign() {
        assert_eq!(parse_value("20px"), Some(ParsedValue::new("20", Unit::Px)));
        assert_eq!(parse_value("-1.5REM"), Some(ParsedValue::new("-1.5", Unit::Rem)));
        assert_eq!(parse_value("50%"), Some(ParsedValue::new("50", Unit::Percent)));
        assert_eq!(parse_value(" 3vw "), Some(ParsedValue::new("3", Unit::Vw)));
        assert_eq!(parse_value(".5em"), Some(ParsedValue::new(".5", Unit::Em)));
    }

    #[test]
    fn test_missing_unit_defaults_to_px() {
        assert_eq!(parse_value("16"), Some(ParsedValue::new("16", Unit::Px)));
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(parse_value("12pt"), None);
        assert_eq!(parse_value("px"), None);
        assert_eq!(parse_value("1.2.3px"), None);
        assert_eq!(parse_value("--2px"), None);
        assert_eq!(parse_value("+2px"), None);
        assert_eq!(parse_value("2 px"), None);
        assert_eq!(parse_value("calc(1px)"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ParsedValue::new("-0.75", Unit::Vh).to_string(), "-0.75vh");
    }
}
