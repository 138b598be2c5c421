//! Driver Factory
//!
//! Wires the deployment driver to its infrastructure: override layers, the
//! local file system, the control-plane provider and the event sinks.
//! This is the dependency injection point for the binary.

use std::path::Path;
use std::sync::Arc;

use crate::application::{DeployOptions, DeploymentDriver};
use crate::config::{ConfigWarning, ProjectFile};
use crate::domain::entities::ResolvedDeployment;
use crate::domain::ports::{ControlPlane, ControlPlaneProvider, DeployEventSink};
use crate::error::{ConfigError, DeployResult};
use crate::infrastructure::fs::user_properties_path;
use crate::infrastructure::{
    ConsoleEventSink, EnvPropertySource, FilePropertySource, JsonEventSink, LayeredPropertySource,
    LocalFs, MapPropertySource, MuleHomeRuntime,
};

/// Driver with every production dependency
pub type ConcreteDriver = DeploymentDriver<LayeredPropertySource, LocalFs>;

/// Chooses a control plane per deployment
///
/// Standalone and cluster deployments talk to their runtime homes directly.
/// The other kinds use the injected remote control plane, if any.
#[derive(Default, Clone)]
pub struct RuntimeProvider {
    remote: Option<Arc<dyn ControlPlane>>,
}

impl RuntimeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control plane used for agent, control-plane-managed and platform-hosted kinds
    pub fn with_remote(mut self, remote: Arc<dyn ControlPlane>) -> Self {
        self.remote = Some(remote);
        self
    }
}

impl ControlPlaneProvider for RuntimeProvider {
    fn control_plane(&self, deployment: &ResolvedDeployment) -> DeployResult<Arc<dyn ControlPlane>> {
        match deployment {
            ResolvedDeployment::Standalone(settings) => {
                Ok(Arc::new(MuleHomeRuntime::standalone(settings)))
            }
            ResolvedDeployment::Cluster(settings) => Ok(Arc::new(MuleHomeRuntime::cluster(settings))),
            ResolvedDeployment::ControlPlaneManaged(_)
            | ResolvedDeployment::Agent(_)
            | ResolvedDeployment::PlatformHosted(_) => self.remote.clone().ok_or_else(|| {
                ConfigError::NoTransport {
                    kind: deployment.kind().as_str(),
                }
                .into()
            }),
        }
    }
}

/// Override layers, highest first: `-D` assignments, environment, user file
pub fn create_property_source(assignments: &[String]) -> Result<LayeredPropertySource, ConfigError> {
    let cli = MapPropertySource::from_assignments(assignments.iter().map(String::as_str))
        .map_err(|assignment| ConfigError::Malformed {
            key: "-D",
            value: assignment.to_string(),
            expected: "key=value with a non-empty key",
        })?;

    let user = match user_properties_path() {
        Some(path) => FilePropertySource::load(&path)?,
        None => FilePropertySource::default(),
    };

    Ok(LayeredPropertySource::new()
        .with_layer(cli)
        .with_layer(EnvPropertySource::from_env())
        .with_layer(user))
}

/// NDJSON on stdout for `--json`, progress lines on stderr otherwise
pub fn create_event_sink(json: bool, verbose: u8) -> Arc<dyn DeployEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stderr(verbose > 0))
    }
}

/// Create a driver with all dependencies wired up
pub fn create_driver(
    properties: LayeredPropertySource,
    provider: RuntimeProvider,
    events: Arc<dyn DeployEventSink>,
) -> ConcreteDriver {
    DeploymentDriver::new(properties, LocalFs::new(), Arc::new(provider)).with_events(events)
}

/// Read `mule-deploy.toml` under `project_root` into driver options
pub fn load_options(project_root: &Path) -> Result<(DeployOptions, Vec<ConfigWarning>), ConfigError> {
    let (file, warnings) = ProjectFile::load_with_warnings(&ProjectFile::path_in(project_root))?;
    let options = DeployOptions::new(project_root, file.project, file.deployment)
        .with_includes(file.archive.includes)
        .with_excludes(file.archive.excludes);
    Ok((options, warnings))
}
