//! Project file model
//!
//! `mule-deploy.toml` at the project root:
//!
//! ```toml
//! [project]
//! group_id = "org.example"
//! artifact_id = "hello"
//! version = "1.0.0"
//! packaging = "mule-application"
//!
//! [archive]
//! excludes = ["**/*.bak"]
//!
//! [deployment]
//! kind = "standalone"
//! mule_home = "/opt/mule"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{DeploymentRequest, ProjectModel};
use crate::error::ConfigError;

use super::loader::{self, ConfigWarning};

/// File name of the project file
pub const PROJECT_FILE: &str = "mule-deploy.toml";

/// Include and exclude globs applied to directory sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// Contents of `mule-deploy.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub project: ProjectModel,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub deployment: DeploymentRequest,
}

impl ProjectFile {
    /// Location of the project file under `project_root`
    pub fn path_in(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_FILE)
    }

    /// Load a project file, discarding warnings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        loader::load_with_warnings(path).map(|(file, _)| file)
    }

    /// Load a project file and report unknown keys
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }
}
