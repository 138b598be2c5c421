//! Local runtime control plane
//!
//! Serves standalone and cluster deployments by working on runtime homes
//! directly. A runtime hot-deploys any `.jar` that lands in `<home>/apps/` and
//! writes `<home>/apps/<app>-anchor.txt` once the application started;
//! deleting the anchor undeploys it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::domain::entities::{
    ApplicationId, ClusterSettings, DeploymentStatus, EnvironmentDescriptor, RuntimeSettings,
    StandaloneSettings, TargetDescriptor,
};
use crate::domain::ports::{
    ControlPlane, ControlPlaneError, ControlPlaneResult, DeploymentParams, FileSystem, FsError,
};
use crate::infrastructure::fs::LocalFs;

use super::launcher::Launcher;

const APPS_DIR: &str = "apps";
const ARCHIVE_EXTENSION: &str = "jar";

/// `ControlPlane` over one or more local runtime homes
pub struct MuleHomeRuntime<F: FileSystem = LocalFs> {
    fs: F,
    homes: Vec<PathBuf>,
    launcher: Option<Launcher>,
    launched: AtomicBool,
}

impl MuleHomeRuntime<LocalFs> {
    pub fn standalone(settings: &StandaloneSettings) -> Self {
        Self::new(LocalFs::new(), vec![settings.mule_home.clone()])
            .with_launcher(launcher_for(&settings.runtime))
    }

    /// One home per member, `<mule_home>/node-<n>`
    pub fn cluster(settings: &ClusterSettings) -> Self {
        Self::new(LocalFs::new(), settings.node_homes()).with_launcher(launcher_for(&settings.runtime))
    }
}

fn launcher_for(runtime: &RuntimeSettings) -> Option<Launcher> {
    runtime.script.as_ref().map(|script| {
        Launcher::new(script)
            .with_arguments(runtime.arguments.clone())
            .with_timeout(runtime.start_timeout())
    })
}

impl<F: FileSystem> MuleHomeRuntime<F> {
    pub fn new(fs: F, homes: Vec<PathBuf>) -> Self {
        Self {
            fs,
            homes,
            launcher: None,
            launched: AtomicBool::new(false),
        }
    }

    pub fn with_launcher(mut self, launcher: Option<Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    fn archive_path(home: &Path, application: &str) -> PathBuf {
        home.join(APPS_DIR)
            .join(format!("{}.{}", application, ARCHIVE_EXTENSION))
    }

    fn anchor_path(home: &Path, application: &str) -> PathBuf {
        home.join(APPS_DIR).join(format!("{}-anchor.txt", application))
    }

    fn launch_once(&self) -> ControlPlaneResult<()> {
        let Some(launcher) = &self.launcher else {
            return Ok(());
        };
        if self.launched.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        for home in &self.homes {
            launcher
                .start(home)
                .map_err(|e| ControlPlaneError::Rejected(e.to_string()))?;
        }
        Ok(())
    }

    fn remove_if_present(&self, path: &Path) -> ControlPlaneResult<bool> {
        match self.fs.remove(path) {
            Ok(()) => Ok(true),
            Err(FsError::NotFound(_)) => Ok(false),
            Err(err) => Err(rejected(err)),
        }
    }
}

fn rejected(err: FsError) -> ControlPlaneError {
    ControlPlaneError::Rejected(err.to_string())
}

impl<F: FileSystem> ControlPlane for MuleHomeRuntime<F> {
    fn list_environments(
        &self,
        _business_group: &str,
    ) -> ControlPlaneResult<Vec<EnvironmentDescriptor>> {
        Ok(Vec::new())
    }

    fn list_targets(&self, _environment_id: &str) -> ControlPlaneResult<Vec<TargetDescriptor>> {
        Ok(Vec::new())
    }

    fn find_application(
        &self,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<Option<ApplicationId>> {
        let name = &params.application_name;
        let present = self.homes.iter().any(|home| {
            self.fs.exists(&Self::anchor_path(home, name))
                || self.fs.exists(&Self::archive_path(home, name))
        });
        Ok(present.then(|| ApplicationId::new(name.clone())))
    }

    fn submit_deployment(
        &self,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId> {
        self.launch_once()?;
        let name = &params.application_name;

        for home in &self.homes {
            // a stale anchor would report the previous deployment as started
            self.remove_if_present(&Self::anchor_path(home, name))?;
            let destination = Self::archive_path(home, name);
            self.fs.copy(artifact, &destination).map_err(rejected)?;
            debug!(home = %home.display(), destination = %destination.display(), "archive dropped");
        }

        info!(application = %name, homes = self.homes.len(), "archive copied to runtime");
        Ok(ApplicationId::new(name.clone()))
    }

    fn undeploy(&self, id: &ApplicationId) -> ControlPlaneResult<()> {
        for home in &self.homes {
            self.remove_if_present(&Self::anchor_path(home, id.as_str()))?;
            self.remove_if_present(&Self::archive_path(home, id.as_str()))?;
        }
        Ok(())
    }

    fn get_status(&self, id: &ApplicationId) -> ControlPlaneResult<DeploymentStatus> {
        let started = self
            .homes
            .iter()
            .all(|home| self.fs.exists(&Self::anchor_path(home, id.as_str())));
        Ok(if started {
            DeploymentStatus::Started
        } else {
            DeploymentStatus::NotStarted
        })
    }
}
