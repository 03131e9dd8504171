//! Interpreter configuration, loadable from a TOML file.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tunable interpreter behavior.
///
/// `legacy_shift_growth` controls the bit-shift stack discipline: the
/// original machine grows the stack by one slot after every BSHIFT, even
/// when the direction field was invalid and no value was produced, leaving
/// a stale slot exposed. `true` (the default) reproduces that behavior;
/// `false` applies the correction and leaves the stack pointer alone, since
/// the shift mutates the top slot in place.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Reproduce the unconditional stack growth after BSHIFT
    pub legacy_shift_growth: bool,
    /// Optional ceiling on executed instructions for a run
    pub max_instructions: Option<u64>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            legacy_shift_growth: true,
            max_instructions: None,
        }
    }
}

impl InterpreterConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid config: {e}"))
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config file {}: {e}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
