//! Configuration defaulting cascade
//!
//! Turns a sparse [`DeploymentRequest`] into a [`ResolvedDeployment`]. Every
//! field is resolved on its own, in this order:
//!
//! 1. the explicit value on the request (blank strings count as absent)
//! 2. the override source, under the field's documented key
//! 3. a computed default, if the field has one
//!
//! Each resolver function returns the value for exactly one field; nothing
//! writes into a neighbouring field.

use std::path::{Path, PathBuf};

use crate::domain::entities::{
    AgentRequest, AgentSettings, BaseRequest, BaseSettings, ClusterRequest, ClusterSettings,
    ControlPlaneRequest, ControlPlaneSettings, DeploymentRequest, PlatformHostedRequest,
    PlatformHostedSettings, PlatformRequest, PlatformSettings, ProjectModel, ResolvedDeployment,
    RuntimeRequest, RuntimeSettings, StandaloneSettings, TargetType,
};
use crate::domain::ports::{keys, PropertySource};
use crate::error::ConfigError;

pub const DEFAULT_URI: &str = "https://anypoint.mulesoft.com";
pub const DEFAULT_DEPLOYMENT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_WORKERS: u32 = 1;
pub const DEFAULT_CLUSTER_SIZE: u32 = 2;
pub const DEFAULT_WORKER_TYPE: &str = "Medium";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Split a comma-separated argument list, dropping blank segments
pub fn split_arguments(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fills deployment requests from an override source and computed defaults
pub struct ConfigResolver<P> {
    properties: P,
}

impl<P: PropertySource> ConfigResolver<P> {
    pub fn new(properties: P) -> Self {
        Self { properties }
    }

    /// Resolve a request against the project it deploys
    ///
    /// `base_dir` is the project root; relative artifact paths are taken
    /// from there.
    pub fn resolve(
        &self,
        request: &DeploymentRequest,
        project: &ProjectModel,
        base_dir: &Path,
    ) -> Result<ResolvedDeployment, ConfigError> {
        let cascade = Cascade {
            properties: &self.properties,
            project,
            base_dir,
        };

        Ok(match request {
            DeploymentRequest::Standalone(r) => {
                ResolvedDeployment::Standalone(cascade.standalone(r)?)
            }
            DeploymentRequest::Cluster(r) => ResolvedDeployment::Cluster(cascade.cluster(r)?),
            DeploymentRequest::ControlPlaneManaged(r) => {
                ResolvedDeployment::ControlPlaneManaged(cascade.control_plane(r)?)
            }
            DeploymentRequest::Agent(r) => ResolvedDeployment::Agent(cascade.agent(r)?),
            DeploymentRequest::PlatformHosted(r) => {
                ResolvedDeployment::PlatformHosted(cascade.platform_hosted(r)?)
            }
        })
    }
}

struct Cascade<'a, P> {
    properties: &'a P,
    project: &'a ProjectModel,
    base_dir: &'a Path,
}

impl<P: PropertySource> Cascade<'_, P> {
    // Variants

    fn standalone(&self, request: &RuntimeRequest) -> Result<StandaloneSettings, ConfigError> {
        Ok(StandaloneSettings {
            base: self.base(&request.base)?,
            runtime: self.runtime(request)?,
            mule_home: self.mule_home(request)?,
        })
    }

    fn cluster(&self, request: &ClusterRequest) -> Result<ClusterSettings, ConfigError> {
        Ok(ClusterSettings {
            base: self.base(&request.runtime.base)?,
            runtime: self.runtime(&request.runtime)?,
            mule_home: self.mule_home(&request.runtime)?,
            size: self.positive_u32(
                request.size,
                keys::CLUSTER_SIZE,
                Some(DEFAULT_CLUSTER_SIZE),
                "size",
            )?,
        })
    }

    fn agent(&self, request: &AgentRequest) -> Result<AgentSettings, ConfigError> {
        Ok(AgentSettings {
            base: self.base(&request.runtime.base)?,
            runtime: self.runtime(&request.runtime)?,
            uri: self
                .string(request.uri.as_deref(), keys::URI)
                .unwrap_or_else(|| DEFAULT_URI.to_string()),
        })
    }

    fn control_plane(
        &self,
        request: &ControlPlaneRequest,
    ) -> Result<ControlPlaneSettings, ConfigError> {
        Ok(ControlPlaneSettings {
            base: self.base(&request.platform.base)?,
            platform: self.platform(&request.platform)?,
            insecure: self.flag(request.insecure, keys::ARM_INSECURE, false)?,
            fail_if_not_exists: self.flag(
                request.fail_if_not_exists,
                keys::FAIL_IF_NOT_EXISTS,
                true,
            )?,
            target: self
                .string(request.target.as_deref(), keys::TARGET)
                .ok_or(ConfigError::Missing {
                    field: "target",
                    key: keys::TARGET,
                })?,
            target_type: self.target_type(request.target_type)?,
        })
    }

    fn platform_hosted(
        &self,
        request: &PlatformHostedRequest,
    ) -> Result<PlatformHostedSettings, ConfigError> {
        Ok(PlatformHostedSettings {
            base: self.base(&request.platform.base)?,
            platform: self.platform(&request.platform)?,
            workers: self.positive_u32(
                request.workers,
                keys::WORKERS,
                Some(DEFAULT_WORKERS),
                "workers",
            )?,
            worker_type: self
                .string(request.worker_type.as_deref(), keys::WORKER_TYPE)
                .unwrap_or_else(|| DEFAULT_WORKER_TYPE.to_string()),
            region: self
                .string(request.region.as_deref(), keys::REGION)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }

    // Shared groups

    fn base(&self, request: &BaseRequest) -> Result<BaseSettings, ConfigError> {
        Ok(BaseSettings {
            application_name: self.application_name(request)?,
            skip: self.flag(request.skip, keys::SKIP, false)?,
            mule_version: self.string(request.mule_version.as_deref(), keys::MULE_VERSION),
            artifact: self.artifact(request),
            deployment_timeout_ms: self.positive_u64(
                request.deployment_timeout,
                keys::DEPLOYMENT_TIMEOUT,
                DEFAULT_DEPLOYMENT_TIMEOUT_MS,
            )?,
            poll_interval_ms: self.positive_u64(
                request.poll_interval,
                keys::POLL_INTERVAL,
                DEFAULT_POLL_INTERVAL_MS,
            )?,
        })
    }

    fn runtime(&self, request: &RuntimeRequest) -> Result<RuntimeSettings, ConfigError> {
        let start_timeout_ms = match request.timeout {
            Some(0) => {
                return Err(ConfigError::NotPositive {
                    key: keys::TIMEOUT,
                    value: 0,
                })
            }
            Some(ms) => Some(ms),
            None => match self.property(keys::TIMEOUT) {
                Some(raw) => Some(parse_positive(keys::TIMEOUT, &raw)?),
                None => None,
            },
        };

        Ok(RuntimeSettings {
            script: self.path(request.script.as_deref(), keys::SCRIPT),
            start_timeout_ms,
            arguments: self.arguments(request),
        })
    }

    fn platform(&self, request: &PlatformRequest) -> Result<PlatformSettings, ConfigError> {
        Ok(PlatformSettings {
            uri: self
                .string(request.uri.as_deref(), keys::URI)
                .unwrap_or_else(|| DEFAULT_URI.to_string()),
            business_group: self
                .string(request.business_group.as_deref(), keys::BUSINESS_GROUP)
                .unwrap_or_default(),
            environment: self
                .string(request.environment.as_deref(), keys::ENVIRONMENT)
                .ok_or(ConfigError::Missing {
                    field: "environment",
                    key: keys::ENVIRONMENT,
                })?,
            username: self.string(request.username.as_deref(), keys::USERNAME),
            password: self.string(request.password.as_deref(), keys::PASSWORD),
            server: self.string(request.server.as_deref(), keys::SERVER),
        })
    }

    // Single fields

    fn application_name(&self, request: &BaseRequest) -> Result<String, ConfigError> {
        self.string(request.application_name.as_deref(), keys::APPLICATION_NAME)
            .or_else(|| non_blank(Some(self.project.artifact_id.as_str())))
            .ok_or(ConfigError::Missing {
                field: "application_name",
                key: keys::APPLICATION_NAME,
            })
    }

    fn artifact(&self, request: &BaseRequest) -> PathBuf {
        self.path(request.artifact.as_deref(), keys::APPLICATION)
            .map(|path| self.base_dir.join(path))
            .unwrap_or_else(|| self.project.packaged_artifact_path(self.base_dir))
    }

    fn mule_home(&self, request: &RuntimeRequest) -> Result<PathBuf, ConfigError> {
        self.path(request.mule_home.as_deref(), keys::MULE_HOME)
            .ok_or(ConfigError::Missing {
                field: "mule_home",
                key: keys::MULE_HOME,
            })
    }

    fn arguments(&self, request: &RuntimeRequest) -> Vec<String> {
        match &request.arguments {
            Some(arguments) => arguments.clone(),
            None => self
                .property(keys::ARGUMENTS)
                .map(|raw| split_arguments(&raw))
                .unwrap_or_default(),
        }
    }

    fn target_type(&self, explicit: Option<TargetType>) -> Result<Option<TargetType>, ConfigError> {
        if explicit.is_some() {
            return Ok(explicit);
        }
        self.property(keys::TARGET_TYPE)
            .map(|raw| {
                raw.parse().map_err(|_| ConfigError::Malformed {
                    key: keys::TARGET_TYPE,
                    value: raw,
                    expected: "server, serverGroup or cluster",
                })
            })
            .transpose()
    }

    // Typed cascade steps

    fn property(&self, key: &'static str) -> Option<String> {
        non_blank(self.properties.get(key).as_deref())
    }

    fn string(&self, explicit: Option<&str>, key: &'static str) -> Option<String> {
        non_blank(explicit).or_else(|| self.property(key))
    }

    fn path(&self, explicit: Option<&Path>, key: &'static str) -> Option<PathBuf> {
        explicit
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| self.property(key).map(PathBuf::from))
    }

    fn flag(
        &self,
        explicit: Option<bool>,
        key: &'static str,
        default: bool,
    ) -> Result<bool, ConfigError> {
        if let Some(value) = explicit {
            return Ok(value);
        }
        match self.property(key) {
            Some(raw) => parse_flag(key, &raw),
            None => Ok(default),
        }
    }

    fn positive_u64(
        &self,
        explicit: Option<u64>,
        key: &'static str,
        default: u64,
    ) -> Result<u64, ConfigError> {
        match explicit {
            Some(0) => Err(ConfigError::NotPositive { key, value: 0 }),
            Some(value) => Ok(value),
            None => match self.property(key) {
                Some(raw) => parse_positive(key, &raw),
                None => Ok(default),
            },
        }
    }

    fn positive_u32(
        &self,
        explicit: Option<u32>,
        key: &'static str,
        default: Option<u32>,
        field: &'static str,
    ) -> Result<u32, ConfigError> {
        let value = match explicit {
            Some(value) => Some(u64::from(value)),
            None => match self.property(key) {
                Some(raw) => Some(parse_positive(key, &raw)?),
                None => default.map(u64::from),
            },
        };
        match value {
            Some(0) => Err(ConfigError::NotPositive { key, value: 0 }),
            Some(value) => u32::try_from(value).map_err(|_| ConfigError::Malformed {
                key,
                value: value.to_string(),
                expected: "a 32-bit integer",
            }),
            None => Err(ConfigError::Missing { field, key }),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::Malformed {
            key,
            value: raw.to_string(),
            expected: "true or false",
        }),
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let value: u64 = raw.trim().parse().map_err(|_| ConfigError::Malformed {
        key,
        value: raw.to_string(),
        expected: "a positive integer",
    })?;
    if value == 0 {
        return Err(ConfigError::NotPositive { key, value });
    }
    Ok(value)
}
