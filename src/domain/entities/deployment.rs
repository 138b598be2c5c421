//! Deployment request entity
//!
//! The sparse, user-authored description of a deployment. Every field is
//! optional here; `ConfigResolver` turns a request into a
//! [`ResolvedDeployment`](super::ResolvedDeployment) by filling the gaps.
//!
//! The request is a tagged union over the deployment kind, deserialized from
//! the `[deployment]` table of `mule-deploy.toml`:
//!
//! ```toml
//! [deployment]
//! kind = "control-plane-managed"
//! environment = "Production"
//! target = "server-name"
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::inventory::TargetType;

/// Deployment topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentKind {
    Standalone,
    Cluster,
    ControlPlaneManaged,
    Agent,
    PlatformHosted,
}

impl DeploymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::Cluster => "cluster",
            Self::ControlPlaneManaged => "control-plane-managed",
            Self::Agent => "agent",
            Self::PlatformHosted => "platform-hosted",
        }
    }

    /// Whether the kind is served by a runtime on reachable disk
    pub fn is_local_runtime(&self) -> bool {
        matches!(self, Self::Standalone | Self::Cluster)
    }
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every deployment kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRequest {
    pub application_name: Option<String>,
    pub skip: Option<bool>,
    pub mule_version: Option<String>,
    /// Packaged artifact to upload
    pub artifact: Option<PathBuf>,
    /// Deployment-poll timeout in milliseconds
    pub deployment_timeout: Option<u64>,
    /// Delay between status polls in milliseconds
    pub poll_interval: Option<u64>,
}

/// Fields for kinds managed through a Mule runtime installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    /// Launcher script used to start the runtime
    pub script: Option<PathBuf>,
    /// Runtime start timeout in milliseconds
    pub timeout: Option<u64>,
    pub arguments: Option<Vec<String>>,
    pub mule_home: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRequest {
    #[serde(flatten)]
    pub runtime: RuntimeRequest,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentRequest {
    #[serde(flatten)]
    pub runtime: RuntimeRequest,
    pub uri: Option<String>,
}

/// Fields for kinds orchestrated by the hosted control plane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    pub uri: Option<String>,
    pub business_group: Option<String>,
    pub environment: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Server id whose credentials the transport should use
    pub server: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPlaneRequest {
    #[serde(flatten)]
    pub platform: PlatformRequest,
    pub insecure: Option<bool>,
    pub fail_if_not_exists: Option<bool>,
    pub target: Option<String>,
    pub target_type: Option<TargetType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformHostedRequest {
    #[serde(flatten)]
    pub platform: PlatformRequest,
    pub workers: Option<u32>,
    pub worker_type: Option<String>,
    pub region: Option<String>,
}

/// Sparse deployment request, one variant per deployment kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DeploymentRequest {
    Standalone(RuntimeRequest),
    Cluster(ClusterRequest),
    #[serde(alias = "arm")]
    ControlPlaneManaged(ControlPlaneRequest),
    Agent(AgentRequest),
    #[serde(alias = "cloudhub")]
    PlatformHosted(PlatformHostedRequest),
}

impl Default for DeploymentRequest {
    fn default() -> Self {
        Self::Standalone(RuntimeRequest::default())
    }
}

impl DeploymentRequest {
    pub fn kind(&self) -> DeploymentKind {
        match self {
            Self::Standalone(_) => DeploymentKind::Standalone,
            Self::Cluster(_) => DeploymentKind::Cluster,
            Self::ControlPlaneManaged(_) => DeploymentKind::ControlPlaneManaged,
            Self::Agent(_) => DeploymentKind::Agent,
            Self::PlatformHosted(_) => DeploymentKind::PlatformHosted,
        }
    }

    pub fn base(&self) -> &BaseRequest {
        match self {
            Self::Standalone(r) => &r.base,
            Self::Cluster(r) => &r.runtime.base,
            Self::ControlPlaneManaged(r) => &r.platform.base,
            Self::Agent(r) => &r.runtime.base,
            Self::PlatformHosted(r) => &r.platform.base,
        }
    }
}
