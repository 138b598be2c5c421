//! Control Plane Port
//!
//! The abstract remote operations the lifecycle client depends on. The HTTP
//! transport, authentication and token exchange live behind this trait and are
//! supplied by the caller; this crate ships a local-runtime implementation for
//! standalone and cluster targets.

use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::{
    ApplicationId, DeploymentKind, DeploymentStatus, EnvironmentDescriptor, ResolvedDeployment,
    TargetDescriptor, TargetType,
};
use crate::error::DeployResult;

/// Result type for control-plane calls
pub type ControlPlaneResult<T> = Result<T, ControlPlaneError>;

/// Control-plane call failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlPlaneError {
    /// Connection reset, timeout, 5xx - worth retrying
    Transient(String),
    /// Request refused by the target - retrying will not help
    Rejected(String),
}

impl ControlPlaneError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transient(msg) | Self::Rejected(msg) => msg,
        }
    }
}

impl std::fmt::Display for ControlPlaneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient(msg) => write!(f, "transient transport error: {}", msg),
            Self::Rejected(msg) => write!(f, "request rejected: {}", msg),
        }
    }
}

impl std::error::Error for ControlPlaneError {}

/// Parameters sent alongside an artifact upload
///
/// Only the fields that apply to `kind` are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParams {
    pub kind: DeploymentKind,
    pub application_name: String,
    pub mule_version: Option<String>,
    pub base_uri: Option<String>,
    pub business_group: Option<String>,
    pub environment_id: Option<String>,
    pub target_id: Option<String>,
    pub target_type: Option<TargetType>,
    pub insecure_tls: bool,
    pub cluster_size: Option<u32>,
    pub workers: Option<u32>,
    pub worker_type: Option<String>,
    pub region: Option<String>,
    pub arguments: Vec<String>,
}

impl DeploymentParams {
    pub fn new(kind: DeploymentKind, application_name: impl Into<String>) -> Self {
        Self {
            kind,
            application_name: application_name.into(),
            mule_version: None,
            base_uri: None,
            business_group: None,
            environment_id: None,
            target_id: None,
            target_type: None,
            insecure_tls: false,
            cluster_size: None,
            workers: None,
            worker_type: None,
            region: None,
            arguments: Vec::new(),
        }
    }
}

/// Remote control-plane operations
///
/// Implementations must be shareable across threads: concurrent deployments
/// each poll from their own thread against the same control plane.
pub trait ControlPlane: Send + Sync {
    /// All environments visible to the principal, scoped by business group
    fn list_environments(&self, business_group: &str)
        -> ControlPlaneResult<Vec<EnvironmentDescriptor>>;

    /// All deployable targets within an environment
    fn list_targets(&self, environment_id: &str) -> ControlPlaneResult<Vec<TargetDescriptor>>;

    /// Identifier of an already-deployed application with the params' name
    fn find_application(&self, params: &DeploymentParams)
        -> ControlPlaneResult<Option<ApplicationId>>;

    /// Upload an artifact; acceptance does not imply the application started
    fn submit_deployment(
        &self,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId>;

    /// Replace the artifact of an existing application
    fn update_deployment(
        &self,
        _id: &ApplicationId,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId> {
        self.submit_deployment(artifact, params)
    }

    /// Remove an application from its target
    fn undeploy(&self, id: &ApplicationId) -> ControlPlaneResult<()>;

    /// Current state of an application
    fn get_status(&self, id: &ApplicationId) -> ControlPlaneResult<DeploymentStatus>;
}

impl<T: ControlPlane + ?Sized> ControlPlane for Arc<T> {
    fn list_environments(
        &self,
        business_group: &str,
    ) -> ControlPlaneResult<Vec<EnvironmentDescriptor>> {
        (**self).list_environments(business_group)
    }

    fn list_targets(&self, environment_id: &str) -> ControlPlaneResult<Vec<TargetDescriptor>> {
        (**self).list_targets(environment_id)
    }

    fn find_application(
        &self,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<Option<ApplicationId>> {
        (**self).find_application(params)
    }

    fn submit_deployment(
        &self,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId> {
        (**self).submit_deployment(artifact, params)
    }

    fn update_deployment(
        &self,
        id: &ApplicationId,
        artifact: &Path,
        params: &DeploymentParams,
    ) -> ControlPlaneResult<ApplicationId> {
        (**self).update_deployment(id, artifact, params)
    }

    fn undeploy(&self, id: &ApplicationId) -> ControlPlaneResult<()> {
        (**self).undeploy(id)
    }

    fn get_status(&self, id: &ApplicationId) -> ControlPlaneResult<DeploymentStatus> {
        (**self).get_status(id)
    }
}

/// Picks the control plane that serves a resolved deployment
pub trait ControlPlaneProvider: Send + Sync {
    fn control_plane(&self, deployment: &ResolvedDeployment) -> DeployResult<Arc<dyn ControlPlane>>;
}
