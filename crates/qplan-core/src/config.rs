//! Reader/writer configuration that callers can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Spaces per indentation level in emitted documents.
    pub indent_width: usize,

    /// Accept comments, unquoted keys and trailing commas in JSON input.
    /// When false, JSON input must be strict.
    pub lenient_input: bool,

    /// End emitted documents with a newline.
    pub trailing_newline: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            lenient_input: true,
            trailing_newline: true,
        }
    }
}

/// Widest indentation we emit; anything larger is almost certainly a typo.
pub const MAX_INDENT_WIDTH: usize = 16;

impl PlanConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `QPLAN_INDENT_WIDTH`: spaces per indentation level
    /// - `QPLAN_LENIENT_INPUT`: `true`/`false`
    /// - `QPLAN_TRAILING_NEWLINE`: `true`/`false`
    ///
    /// Unparseable values are ignored, matching how unset variables behave.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("QPLAN_INDENT_WIDTH") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.indent_width = v;
            }
        }

        if let Some(s) = lookup("QPLAN_LENIENT_INPUT") {
            if let Some(v) = parse_flag(&s) {
                cfg.lenient_input = v;
            }
        }

        if let Some(s) = lookup("QPLAN_TRAILING_NEWLINE") {
            if let Some(v) = parse_flag(&s) {
                cfg.trailing_newline = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.indent_width > MAX_INDENT_WIDTH {
            return Err(Error::Config(format!(
                "indent_width {} exceeds the maximum of {MAX_INDENT_WIDTH}",
                self.indent_width
            )));
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
