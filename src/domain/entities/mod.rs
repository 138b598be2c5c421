//! Domain entities

mod deployment;
mod inventory;
mod project;
mod resolved;

pub use deployment::{
    AgentRequest, BaseRequest, ClusterRequest, ControlPlaneRequest, DeploymentKind,
    DeploymentRequest, PlatformHostedRequest, PlatformRequest, RuntimeRequest,
};
pub use inventory::{
    ApplicationId, DeploymentStatus, EnvironmentDescriptor, TargetDescriptor, TargetType,
};
pub use project::{
    ArtifactCoordinates, PackagingType, ProjectModel, SharedLibrary, DESCRIPTOR_FILE,
    DOMAIN_CLASSIFIER,
};
pub use resolved::{
    AgentSettings, BaseSettings, ClusterSettings, ControlPlaneSettings, PlatformHostedSettings,
    PlatformSettings, ResolvedDeployment, RuntimeSettings, StandaloneSettings,
};
