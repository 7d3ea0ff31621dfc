//! Option resolution seam
//!
//! The host owns option resolution; this subsystem only asks for one string
//! value, once, at wiring time. The trait keeps that lookup injectable.

use std::collections::HashMap;

/// External option-resolution facility
pub trait OptionSource: Send + Sync {
    /// Raw string value for `key`, when the host defines one.
    fn option(&self, key: &str) -> Option<String>;
}

/// Option source backed by process environment variables
///
/// Keys are mapped to upper-cased, underscore-separated variables with a
/// `GANTRY_` prefix: `problems.report.enabled` is read from
/// `GANTRY_PROBLEMS_REPORT_ENABLED`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOptions;

impl EnvOptions {
    /// Create an environment-backed option source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn variable_name(key: &str) -> String {
        let mut name = String::with_capacity(key.len() + 7);
        name.push_str("GANTRY_");
        for ch in key.chars() {
            name.push(match ch {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            });
        }
        name
    }
}

impl OptionSource for EnvOptions {
    fn option(&self, key: &str) -> Option<String> {
        std::env::var(Self::variable_name(key)).ok()
    }
}

/// Fixed in-memory option source for embedding hosts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    values: HashMap<String, String>,
}

impl StaticOptions {
    /// Create an empty source (every lookup misses).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define one option value.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl OptionSource for StaticOptions {
    fn option(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
