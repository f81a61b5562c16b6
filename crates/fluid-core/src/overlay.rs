//! Live style overlay
//!
//! Previews unsaved min/max edits by writing `:root` rules into a style
//! container separate from the persisted stylesheet. The container is
//! acquired from the [`StyleHost`] on first use and kept until [`reset`].
//!
//! Rules are an ordered list of raw strings. Serialization joins them;
//! parsing splits on `}`, which is only sound for the rule shapes this
//! module writes:
//!
//! ```text
//! :root { --fluid-h1: clamp(...); }
//! :root { --fluid-h1: unset !important; }
//! ```
//!
//! Later rules win, as in the CSS cascade. `unset_variable` appends on top
//! of the existing rules for a name and `restore_variable` erases every rule
//! for it, including the original set-rule. A caller that wants the value
//! back after a restore must call `set_variable` again.
//!
//! When the host cannot provide a container every operation is a no-op
//! returning `false`. So is any operation on a name or value that would
//! change how the rule list splits.
//!
//! [`reset`]: LiveOverlay::reset

use crate::traits::{StyleContainer, StyleHost};
use tracing::{debug, trace, warn};

/// Preview stylesheet for one editing surface
pub struct LiveOverlay {
    host: Box<dyn StyleHost>,
    container: Option<Box<dyn StyleContainer>>,
}

impl LiveOverlay {
    pub fn new(host: Box<dyn StyleHost>) -> Self {
        Self {
            host,
            container: None,
        }
    }

    /// Replace any rules for `name` with one set-rule
    pub fn set_variable(&mut self, name: &str, formula: &str) -> bool {
        if formula.contains(['{', '}', ';']) {
            warn!("Refusing overlay value for {} containing rule delimiters", name);
            return false;
        }

        let rule = set_rule(name, formula);
        self.edit("set", name, |rules| {
            rules.retain(|r| !mentions(r, name));
            rules.push(rule);
        })
    }

    /// Append an unset-rule for `name`, keeping earlier rules beneath it
    pub fn unset_variable(&mut self, name: &str) -> bool {
        let rule = unset_rule(name);
        self.edit("unset", name, |rules| rules.push(rule))
    }

    /// Remove every rule for `name`
    pub fn restore_variable(&mut self, name: &str) -> bool {
        self.edit("restore", name, |rules| rules.retain(|r| !mentions(r, name)))
    }

    /// Current rules in cascade order; empty when the host is unreachable
    pub fn rules(&mut self) -> Vec<String> {
        self.container()
            .map(|c| parse_rules(&c.contents()))
            .unwrap_or_default()
    }

    /// Value of the winning rule for `name`; `None` when unset or absent
    pub fn current_value(&mut self, name: &str) -> Option<String> {
        let winner = self.rules().into_iter().rev().find(|r| mentions(r, name))?;
        let value = winner
            .split_once(&format!("{{ {}: ", name))?
            .1
            .strip_suffix("; }")?;
        (value != UNSET_VALUE).then(|| value.to_string())
    }

    /// Whether a container has been acquired
    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    /// Forget the container after the hosting surface reloads
    pub fn reset(&mut self) {
        if self.container.take().is_some() {
            debug!("Overlay detached from reloaded surface");
        }
    }

    fn container(&mut self) -> Option<&mut (dyn StyleContainer + 'static)> {
        if self.container.is_none() {
            self.container = self.host.acquire();
            if self.container.is_some() {
                debug!("Overlay container created");
            }
        }
        self.container.as_deref_mut()
    }

    fn edit<F>(&mut self, op: &str, name: &str, apply: F) -> bool
    where
        F: FnOnce(&mut Vec<String>),
    {
        if !is_valid_name(name) {
            warn!("Refusing overlay {} of malformed variable name {:?}", op, name);
            return false;
        }

        let Some(container) = self.container() else {
            debug!("Overlay {} of {} skipped: style host unreachable", op, name);
            return false;
        };

        let mut rules = parse_rules(&container.contents());
        apply(&mut rules);
        container.replace(&rules.join("\n"));
        trace!("Overlay {} of {} ({} rule(s))", op, name, rules.len());
        true
    }
}

const UNSET_VALUE: &str = "unset !important";

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | ';' | ':'))
}

fn set_rule(name: &str, formula: &str) -> String {
    format!(":root {{ {}: {}; }}", name, formula)
}

fn unset_rule(name: &str) -> String {
    format!(":root {{ {}: {}; }}", name, UNSET_VALUE)
}

fn mentions(rule: &str, name: &str) -> bool {
    rule.contains(&format!("{{ {}: ", name))
}

fn parse_rules(css: &str) -> Vec<String> {
    css.split('}')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| format!("{} }}", chunk))
        .collect()
}
