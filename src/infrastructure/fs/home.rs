//! User configuration directory with test isolation support.
//!
//! `dirs::config_dir()` consults platform APIs that ignore environment
//! variables on some systems, so tests point the deployer at a scratch
//! directory through `MULE_DEPLOYER_CONFIG_DIR` instead.

use std::path::PathBuf;

/// Environment variable overriding the user configuration directory
pub const CONFIG_DIR_VAR: &str = "MULE_DEPLOYER_CONFIG_DIR";

/// Directory holding user-level deployer files (`properties.toml`)
///
/// `MULE_DEPLOYER_CONFIG_DIR` when set, otherwise
/// `<platform config dir>/mule-deployer`.
pub fn deployer_config_dir() -> Option<PathBuf> {
    std::env::var(CONFIG_DIR_VAR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("mule-deployer")))
}

/// Location of the user properties file
pub fn user_properties_path() -> Option<PathBuf> {
    deployer_config_dir().map(|d| d.join("properties.toml"))
}
