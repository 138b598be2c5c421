//! mule-deployer - deployment orchestration for Mule applications
//!
//! Takes a sparse deployment request from the project file, fills every
//! setting from override layers and documented defaults, validates the
//! project, packages it into a deployable archive and drives the target
//! runtime through deploy, undeploy and redeploy.
//!
//! Five deployment kinds are supported: standalone, cluster,
//! control-plane-managed, agent and platform-hosted.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployOutcome, DeploymentDriver, LifecycleAction};
pub use config::{ProjectFile, PROJECT_FILE};
pub use domain::entities::{DeploymentKind, DeploymentRequest, ProjectModel, ResolvedDeployment};
pub use domain::services::{ConfigResolver, ProjectValidator};
pub use error::{DeployError, DeployResult, ErrorKind};
pub use infrastructure::{ArtifactAssembler, PackagedArchive};
