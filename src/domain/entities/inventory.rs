//! Remote inventory entities
//!
//! Transient lookup results and status values exchanged with a control plane.
//! None of these are cached; each lookup produces fresh values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An environment visible to the authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    pub name: String,
    pub id: String,
}

impl EnvironmentDescriptor {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// A deployable target (server, server group or cluster) in an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub name: String,
    pub id: String,
}

impl TargetDescriptor {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Opaque identifier the target assigns to a submitted application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application state as reported by the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentStatus {
    NotStarted,
    Started,
    Failed,
    Unknown,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Started => "started",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of target a control-plane deployment lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    Server,
    ServerGroup,
    Cluster,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::ServerGroup => "serverGroup",
            Self::Cluster => "cluster",
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "server" => Ok(Self::Server),
            "serverGroup" | "server-group" => Ok(Self::ServerGroup),
            "cluster" => Ok(Self::Cluster),
            other => Err(format!("unknown target type '{}'", other)),
        }
    }
}
