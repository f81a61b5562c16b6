//! Fluid formula compiler
//!
//! Builds the CSS expression that interpolates a token linearly between two
//! authored endpoints across a viewport range:
//!
//! ```text
//! clamp(min(MIN, MAX), calc(MIN + (MAX - MIN) * ((100vw - LOpx) / (HIpx - LOpx))), max(MIN, MAX))
//! ```
//!
//! The bounds are wrapped in `min()`/`max()` so a preset authored with its
//! minimum above its maximum still clamps in both directions. Magnitudes
//! and units are emitted exactly as authored.
//!
//! [`decompile`] only understands the shapes [`compile`] emits. It is used to
//! re-open a live formula for editing and is not a CSS parser.

use crate::error::{Error, Result};
use crate::value::{ParsedValue, parse_value};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default lower breakpoint in px
pub const DEFAULT_MIN_SCREEN_PX: u32 = 360;

/// Default upper breakpoint in px
pub const DEFAULT_MAX_SCREEN_PX: u32 = 1920;

const VALUE: &str = r"(-?(?:\d+(?:\.\d+)?|\.\d+)(?:px|rem|em|%|vw|vh))";

static CLAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^clamp\(min\({v}, {v}\), calc\({v} \+ \({v} - {v}\) \* \(\(100vw - (\d+)px\) / \((\d+)px - (\d+)px\)\)\), max\({v}, {v}\)\)$",
        v = VALUE
    );
    Regex::new(&pattern).expect("clamp pattern is valid")
});

static BARE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", VALUE)).expect("bare pattern is valid"));

/// Viewport width range, in px, over which a value interpolates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScreenRange", into = "RawScreenRange")]
pub struct ScreenRange {
    min_px: u32,
    max_px: u32,
}

#[derive(Serialize, Deserialize)]
struct RawScreenRange {
    min_px: u32,
    max_px: u32,
}

impl TryFrom<RawScreenRange> for ScreenRange {
    type Error = Error;

    fn try_from(raw: RawScreenRange) -> Result<Self> {
        ScreenRange::new(raw.min_px, raw.max_px)
    }
}

impl From<ScreenRange> for RawScreenRange {
    fn from(range: ScreenRange) -> Self {
        Self {
            min_px: range.min_px,
            max_px: range.max_px,
        }
    }
}

impl ScreenRange {
    /// Create a range; `max_px` must be strictly greater than `min_px`
    pub fn new(min_px: u32, max_px: u32) -> Result<Self> {
        if max_px <= min_px {
            return Err(Error::degenerate_range(min_px, max_px));
        }
        Ok(Self { min_px, max_px })
    }

    pub fn min_px(&self) -> u32 {
        self.min_px
    }

    pub fn max_px(&self) -> u32 {
        self.max_px
    }

    /// Width of the range in px
    pub fn span(&self) -> u32 {
        self.max_px - self.min_px
    }
}

impl Default for ScreenRange {
    fn default() -> Self {
        Self {
            min_px: DEFAULT_MIN_SCREEN_PX,
            max_px: DEFAULT_MAX_SCREEN_PX,
        }
    }
}

/// Endpoints recovered from a compiled formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompiledFormula {
    pub min: ParsedValue,
    pub max: ParsedValue,
    /// `None` for a bare value, which has no interpolation range
    pub range: Option<ScreenRange>,
}

/// Compile a min/max pair into a CSS value
///
/// Endpoints written identically produce the bare value (`"20px"`) instead
/// of a degenerate `clamp()`. Endpoints that are only numerically equal
/// (`20` and `20.0`) keep the `clamp()` so both authored texts survive a
/// [`decompile`].
pub fn compile(min: &ParsedValue, max: &ParsedValue, range: ScreenRange) -> String {
    if min == max {
        return min.to_string();
    }

    format!(
        "clamp(min({a}, {b}), calc({a} + ({b} - {a}) * ((100vw - {lo}px) / ({hi}px - {lo}px))), max({a}, {b}))",
        a = min,
        b = max,
        lo = range.min_px,
        hi = range.max_px,
    )
}

/// Recover the endpoints of a formula produced by [`compile`]
pub fn decompile(formula: &str) -> Option<DecompiledFormula> {
    let formula = formula.trim();

    if BARE_PATTERN.is_match(formula) {
        let value = parse_value(formula)?;
        return Some(DecompiledFormula {
            min: value.clone(),
            max: value,
            range: None,
        });
    }

    let caps = CLAMP_PATTERN.captures(formula)?;
    let text = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");

    let (min, max) = (text(1), text(2));
    let min_repeats = [text(3), text(5), text(9)];
    let max_repeats = [text(4), text(10)];
    if min_repeats.iter().any(|t| *t != min) || max_repeats.iter().any(|t| *t != max) {
        return None;
    }
    if text(6) != text(8) {
        return None;
    }

    let lo: u32 = text(6).parse().ok()?;
    let hi: u32 = text(7).parse().ok()?;
    let range = ScreenRange::new(lo, hi).ok()?;

    Some(DecompiledFormula {
        min: parse_value(min)?,
        max: parse_value(max)?,
        range: Some(range),
    })
}

/// Evaluate a compiled formula at a viewport width
///
/// Lets an editor show the size a token resolves to at a given preview
/// width without a browser. Magnitudes are taken as-is, so the result is
/// meaningful when both endpoints share a unit; it is expressed in that
/// unit. Returns `None` for anything [`decompile`] does not understand.
pub fn evaluate(formula: &str, viewport_px: f64) -> Option<f64> {
    let decompiled = decompile(formula)?;
    let (lo_value, hi_value) = (decompiled.min.number(), decompiled.max.number());

    let Some(range) = decompiled.range else {
        return Some(lo_value);
    };

    let progress = (viewport_px - range.min_px as f64) / range.span() as f64;
    let raw = lo_value + (hi_value - lo_value) * progress;
    Some(raw.clamp(lo_value.min(hi_value), lo_value.max(hi_value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Unit;

    fn px(magnitude: &str) -> ParsedValue {
        ParsedValue::new(magnitude, Unit::Px)
    }

    #[test]
    fn test_equal_endpoints_emit_bare_value() {
        let formula = compile(&px("20"), &px("20"), ScreenRange::default());
        assert_eq!(formula, "20px");
        assert!(!formula.contains("clamp("));
    }

    #[test]
    fn test_numerically_equal_endpoints_keep_authored_text() {
        let formula = compile(&px("20"), &px("20.0"), ScreenRange::default());
        assert!(formula.starts_with("clamp(min(20px, 20.0px)"));

        let decompiled = decompile(&formula).unwrap();
        assert_eq!(decompiled.min, px("20"));
        assert_eq!(decompiled.max, px("20.0"));
        assert_eq!(evaluate(&formula, 1000.0), Some(20.0));
    }

    #[test]
    fn test_compile_shape() {
        let formula = compile(&px("16"), &px("24"), ScreenRange::default());
        assert_eq!(
            formula,
            "clamp(min(16px, 24px), calc(16px + (24px - 16px) * ((100vw - 360px) / (1920px - 360px))), max(16px, 24px))"
        );
    }

    #[test]
    fn test_units_are_preserved() {
        let min = ParsedValue::new("1.125", Unit::Rem);
        let max = ParsedValue::new("2.5", Unit::Rem);
        let formula = compile(&min, &max, ScreenRange::default());
        assert!(formula.starts_with("clamp(min(1.125rem, 2.5rem)"));
    }

    #[test]
    fn test_degenerate_range_rejected() {
        assert!(matches!(
            ScreenRange::new(1920, 360),
            Err(Error::DegenerateRange { min: 1920, max: 360 })
        ));
        assert!(ScreenRange::new(500, 500).is_err());
    }

    #[test]
    fn test_decompile_bare_value() {
        let decompiled = decompile("1.5rem").unwrap();
        assert_eq!(decompiled.min, ParsedValue::new("1.5", Unit::Rem));
        assert_eq!(decompiled.max, decompiled.min);
        assert_eq!(decompiled.range, None);
    }

    #[test]
    fn test_decompile_rejects_foreign_css() {
        assert_eq!(decompile("clamp(1rem, 2vw, 3rem)"), None);
        assert_eq!(decompile("var(--x)"), None);
        assert_eq!(decompile(""), None);
    }

    #[test]
    fn test_decompile_rejects_inconsistent_endpoints() {
        let tampered = "clamp(min(16px, 24px), calc(10px + (24px - 16px) * ((100vw - 360px) / (1920px - 360px))), max(16px, 24px))";
        assert_eq!(decompile(tampered), None);
    }

    #[test]
    fn test_screen_range_serde_validates() {
        let ok: ScreenRange = serde_json::from_str(r#"{"min_px":400,"max_px":1600}"#).unwrap();
        assert_eq!(ok.span(), 1200);
        assert!(serde_json::from_str::<ScreenRange>(r#"{"min_px":10,"max_px":5}"#).is_err());
    }
}
