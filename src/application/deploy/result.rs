//! Deploy Result
//!
//! Outcome of one lifecycle action.

use std::time::Duration;

use serde::Serialize;

use crate::domain::entities::{ApplicationId, DeploymentKind};
use crate::infrastructure::PackagedArchive;

/// Lifecycle action entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Deploy,
    Undeploy,
    Redeploy,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Undeploy => "undeploy",
            Self::Redeploy => "redeploy",
        }
    }
}

/// Result of a lifecycle action that completed without error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployOutcome {
    pub action: LifecycleAction,
    pub application: String,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: DeploymentKind,
    /// `mule.skip` was set; nothing was done
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<PackagedArchive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    /// Status polls until the application started
    pub polls: u32,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl DeployOutcome {
    pub fn new(action: LifecycleAction, application: impl Into<String>, kind: DeploymentKind) -> Self {
        Self {
            action,
            application: application.into(),
            kind,
            skipped: false,
            archive: None,
            application_id: None,
            polls: 0,
            elapsed: Duration::ZERO,
        }
    }
}

fn serialize_kind<S: serde::Serializer>(kind: &DeploymentKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.as_str())
}

fn serialize_millis<S: serde::Serializer>(elapsed: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(elapsed.as_millis() as u64)
}
