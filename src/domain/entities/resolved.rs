//! Resolved deployment entity
//!
//! The output of the defaulting cascade. Every field a deployment path reads
//! is concrete here; optional fields stay `Option` only where the downstream
//! path tolerates their absence (script, credentials, target type).

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use super::deployment::DeploymentKind;
use super::inventory::TargetType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseSettings {
    pub application_name: String,
    pub skip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mule_version: Option<String>,
    pub artifact: PathBuf,
    pub deployment_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl BaseSettings {
    pub fn deployment_timeout(&self) -> Duration {
        Duration::from_millis(self.deployment_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timeout_ms: Option<u64>,
    pub arguments: Vec<String>,
}

impl RuntimeSettings {
    pub fn start_timeout(&self) -> Option<Duration> {
        self.start_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandaloneSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(flatten)]
    pub runtime: RuntimeSettings,
    pub mule_home: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(flatten)]
    pub runtime: RuntimeSettings,
    pub mule_home: PathBuf,
    pub size: u32,
}

impl ClusterSettings {
    /// Runtime homes of the cluster members, `<mule_home>/node-<n>`
    pub fn node_homes(&self) -> Vec<PathBuf> {
        (1..=self.size)
            .map(|n| self.mule_home.join(format!("node-{}", n)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(flatten)]
    pub runtime: RuntimeSettings,
    pub uri: String,
}

/// Platform settings shared by the control-plane kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformSettings {
    pub uri: String,
    /// Empty string means the principal's root organization
    pub business_group: String,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlPlaneSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(flatten)]
    pub platform: PlatformSettings,
    pub insecure: bool,
    pub fail_if_not_exists: bool,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformHostedSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(flatten)]
    pub platform: PlatformSettings,
    pub workers: u32,
    pub worker_type: String,
    pub region: String,
}

/// Fully-specified deployment, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResolvedDeployment {
    Standalone(StandaloneSettings),
    Cluster(ClusterSettings),
    ControlPlaneManaged(ControlPlaneSettings),
    Agent(AgentSettings),
    PlatformHosted(PlatformHostedSettings),
}

impl ResolvedDeployment {
    pub fn kind(&self) -> DeploymentKind {
        match self {
            Self::Standalone(_) => DeploymentKind::Standalone,
            Self::Cluster(_) => DeploymentKind::Cluster,
            Self::ControlPlaneManaged(_) => DeploymentKind::ControlPlaneManaged,
            Self::Agent(_) => DeploymentKind::Agent,
            Self::PlatformHosted(_) => DeploymentKind::PlatformHosted,
        }
    }

    pub fn base(&self) -> &BaseSettings {
        match self {
            Self::Standalone(s) => &s.base,
            Self::Cluster(s) => &s.base,
            Self::ControlPlaneManaged(s) => &s.base,
            Self::Agent(s) => &s.base,
            Self::PlatformHosted(s) => &s.base,
        }
    }

    pub fn application_name(&self) -> &str {
        &self.base().application_name
    }

    pub fn platform(&self) -> Option<&PlatformSettings> {
        match self {
            Self::ControlPlaneManaged(s) => Some(&s.platform),
            Self::PlatformHosted(s) => Some(&s.platform),
            Self::Standalone(_) | Self::Cluster(_) | Self::Agent(_) => None,
        }
    }
}
