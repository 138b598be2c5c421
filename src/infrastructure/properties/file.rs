//! User properties file
//!
//! A TOML file of override properties. Keys may be written quoted or as
//! nested tables; both spellings below define `anypoint.businessGroup`:
//!
//! ```toml
//! "anypoint.businessGroup" = "Engineering"
//!
//! [anypoint]
//! businessGroup = "Engineering"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::ports::PropertySource;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct FilePropertySource {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl FilePropertySource {
    /// Load `path`; a missing file yields an empty source
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no user properties file");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::File {
            file: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        let mut values = HashMap::new();
        flatten("", &table, &mut values);
        debug!(path = %path.display(), count = values.len(), "loaded user properties");

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PropertySource for FilePropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            toml::Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                out.insert(full_key, joined);
            }
            other => {
                out.insert(full_key, scalar_to_string(other));
            }
        }
    }
}

fn scalar_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
