//! Project configuration
//!
//! A project is described by `mule-deploy.toml` at its root. Values missing
//! there are filled later by the override layers, highest first:
//! 1. `-D key=value` on the command line
//! 2. Environment variables (`anypoint.businessGroup` -> `ANYPOINT_BUSINESSGROUP`)
//! 3. User properties (`<config_dir>/mule-deployer/properties.toml`)
//! 4. Built-in defaults

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::load_with_warnings;
pub use types::{ArchiveConfig, ProjectFile, PROJECT_FILE};
