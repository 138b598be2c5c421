//! Property Source Implementations
//!
//! Layers of the override source, highest priority first:
//! - `MapPropertySource` - command-line `-D key=value` properties
//! - `EnvPropertySource` - environment variables derived from the key
//! - `FilePropertySource` - the user properties file

mod file;

use std::collections::HashMap;
use std::ffi::OsString;

use crate::domain::ports::PropertySource;

pub use file::FilePropertySource;

/// Properties held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapPropertySource {
    values: HashMap<String, String>,
}

impl MapPropertySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Parse `key=value` assignments; the value may itself contain `=`
    ///
    /// A malformed assignment is handed back as the error.
    pub fn from_assignments<'a>(
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, &'a str> {
        let mut values = HashMap::new();
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment).map_err(|_| assignment)?;
            values.insert(key, value);
        }
        Ok(Self { values })
    }
}

impl PropertySource for MapPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Split `key=value`, rejecting an empty key
pub fn parse_assignment(assignment: &str) -> Result<(String, String), String> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", assignment))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty property name in '{}'", assignment));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Environment variable consulted for an override key
///
/// `anypoint.businessGroup` reads `ANYPOINT_BUSINESSGROUP`.
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Snapshot of environment variables, looked up by derived name
#[derive(Debug, Clone, Default)]
pub struct EnvPropertySource {
    vars: HashMap<String, String>,
}

impl EnvPropertySource {
    /// Snapshot of the process environment
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    pub fn from_os_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        Self::from_vars(vars.into_iter().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }
}

impl PropertySource for EnvPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(&env_var_name(key)).cloned()
    }
}

/// Ordered stack of sources; the first one defining a key wins
#[derive(Default)]
pub struct LayeredPropertySource {
    layers: Vec<Box<dyn PropertySource>>,
}

impl LayeredPropertySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer below the existing ones
    pub fn with_layer(mut self, layer: impl PropertySource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl PropertySource for LayeredPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}
