//! Error types for mule-deployer
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow` at the edge.
//! Every variant names the field, coordinate or symbolic name that caused it.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::entities::{ArtifactCoordinates, PackagingType, SharedLibrary};

/// Result type alias for deployer operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type returned by the deployment pipeline
#[derive(Error, Debug)]
pub enum DeployError {
    /// A required field is missing or malformed after the defaulting cascade
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The project failed pre-flight validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A source could not be read (or the archive written) during assembly
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// A symbolic lookup against the remote inventory found no match
    #[error("{kind} '{name}' not found")]
    NotFound { kind: LookupKind, name: String },

    /// Transient transport failures persisted after the retry budget
    #[error("{operation} failed after {attempts} attempt(s): {message}")]
    Transport {
        operation: String,
        attempts: u32,
        message: String,
    },

    /// The target reported the application entered a failed state
    #[error("application '{application}' ({id}) failed to start on the target")]
    DeploymentFailed { application: String, id: String },

    /// The application did not reach the expected state within the budget
    #[error("application '{application}' did not reach {expected} within {}ms", .timeout.as_millis())]
    DeploymentTimeout {
        application: String,
        expected: &'static str,
        timeout: Duration,
    },
}

impl DeployError {
    /// Stable classification used for exit codes and JSON output
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Archive(_) => ErrorKind::Archive,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::DeploymentFailed { .. } => ErrorKind::DeploymentFailed,
            Self::DeploymentTimeout { .. } => ErrorKind::DeploymentTimeout,
        }
    }
}

/// Machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    Archive,
    NotFound,
    Transport,
    DeploymentFailed,
    DeploymentTimeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Validation => "validation",
            Self::Archive => "archive",
            Self::NotFound => "not_found",
            Self::Transport => "transport",
            Self::DeploymentFailed => "deployment_failed",
            Self::DeploymentTimeout => "deployment_timeout",
        }
    }

    /// Process exit code for the CLI (0 is reserved for success)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config => 2,
            Self::Validation => 3,
            Self::Archive => 4,
            Self::NotFound => 5,
            Self::Transport => 6,
            Self::DeploymentFailed => 7,
            Self::DeploymentTimeout => 8,
        }
    }
}

/// Which inventory a symbolic lookup searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Environment,
    Target,
    Application,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::Target => write!(f, "target"),
            Self::Application => write!(f, "application"),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required field still empty after explicit value, override and default
    #[error("missing required field '{field}' (set it in mule-deploy.toml or with -D{key}=...)")]
    Missing { field: &'static str, key: &'static str },

    /// Value could not be parsed into the expected type
    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    Malformed {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Numeric field must be a positive integer
    #[error("'{key}' must be a positive integer, got {value}")]
    NotPositive { key: &'static str, value: u64 },

    /// Configuration file could not be read or parsed
    #[error("invalid configuration file {}: {message}", .file.display())]
    File { file: PathBuf, message: String },

    /// No control-plane transport is available for this deployment kind
    #[error("deployment kind '{kind}' needs a control-plane transport and none is configured")]
    NoTransport { kind: &'static str },
}

/// Project validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The source folder for the packaging kind does not exist
    #[error("the folder {} is mandatory for {packaging} projects", .path.display())]
    MissingSourceRoot {
        path: PathBuf,
        packaging: PackagingType,
    },

    /// The artifact descriptor is not present in the project root
    #[error("invalid Mule project: missing {} file, it must be present in the root of the application", .path.display())]
    MissingDescriptor { path: PathBuf },

    /// Declared shared libraries are not among the project dependencies
    #[error("the application does not contain the following shared libraries: {}", format_libraries(.missing))]
    UnresolvedSharedLibrary { missing: Vec<SharedLibrary> },

    /// A dependency looks like a domain reference but is not classified as one
    #[error("dependencies are not valid mule domains: {}", format_coordinates(.dependencies))]
    InvalidDomainClassification {
        dependencies: Vec<ArtifactCoordinates>,
    },

    /// More domain references than a project may carry
    #[error("a {packaging} project should reference at most {limit} domain, found: {}", format_coordinates(.domains))]
    TooManyDomainReferences {
        packaging: PackagingType,
        limit: usize,
        domains: Vec<ArtifactCoordinates>,
    },
}

/// Archive assembly errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A source path could not be read
    #[error("cannot read archive source {}: {source}", .path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An include/exclude pattern is not a valid glob
    #[error("invalid archive pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The archive could not be written or committed at its destination
    #[error("cannot write archive {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_libraries(libraries: &[SharedLibrary]) -> String {
    libraries
        .iter()
        .map(|lib| lib.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_coordinates(coordinates: &[ArtifactCoordinates]) -> String {
    coordinates
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_field() {
        let err = DeployError::from(ConfigError::Missing {
            field: "environment",
            key: "anypoint.environment",
        });
        insta::assert_snapshot!(
            err.to_string(),
            @"missing required field 'environment' (set it in mule-deploy.toml or with -Danypoint.environment=...)"
        );
    }

    #[test]
    fn test_error_display_unresolved_shared_library() {
        let err = ValidationError::UnresolvedSharedLibrary {
            missing: vec![SharedLibrary::new("g", "lib")],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"the application does not contain the following shared libraries: lib:g"
        );
    }

    #[test]
    fn test_error_display_not_found() {
        let err = DeployError::NotFound {
            kind: LookupKind::Environment,
            name: "notProduction".to_string(),
        };
        assert_eq!(err.to_string(), "environment 'notProduction' not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_error_display_timeout() {
        let err = DeployError::DeploymentTimeout {
            application: "hello".to_string(),
            expected: "started",
            timeout: Duration::from_millis(60000),
        };
        assert_eq!(
            err.to_string(),
            "application 'hello' did not reach started within 60000ms"
        );
    }

    #[test]
    fn exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::Config,
            ErrorKind::Validation,
            ErrorKind::Archive,
            ErrorKind::NotFound,
            ErrorKind::Transport,
            ErrorKind::DeploymentFailed,
            ErrorKind::DeploymentTimeout,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(!codes.contains(&0));
    }
}
