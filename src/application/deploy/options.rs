//! Deploy Options
//!
//! Input of the deployment driver: one project and one deployment request.

use std::path::PathBuf;

use crate::domain::entities::{DeploymentRequest, ProjectModel};

/// Options for one lifecycle action
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Project root (holds `mule-artifact.json` and `src/`)
    pub project_root: PathBuf,
    pub project: ProjectModel,
    pub request: DeploymentRequest,
    /// Archive include globs; empty includes everything
    pub includes: Vec<String>,
    /// Archive exclude globs, on top of the default excludes
    pub excludes: Vec<String>,
    /// Assemble the archive before deploying; otherwise the resolved
    /// artifact must already exist
    pub package: bool,
}

impl DeployOptions {
    pub fn new(
        project_root: impl Into<PathBuf>,
        project: ProjectModel,
        request: DeploymentRequest,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            project,
            request,
            includes: Vec::new(),
            excludes: Vec::new(),
            package: true,
        }
    }

    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_package(mut self, package: bool) -> Self {
        self.package = package;
        self
    }
}
