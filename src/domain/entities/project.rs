//! Project model entity
//!
//! A read-only view of the project being deployed: its own coordinates, its
//! dependency list and the shared libraries it promotes across the plugin
//! boundary. The model is deserialized from the `[project]` table of
//! `mule-deploy.toml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classifier carried by dependencies that reference a Mule domain
pub const DOMAIN_CLASSIFIER: &str = "mule-domain";

/// Fixed name of the artifact descriptor that must sit at the project root
pub const DESCRIPTOR_FILE: &str = "mule-artifact.json";

/// Kind of artifact a project packages into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PackagingType {
    #[default]
    MuleApplication,
    MuleDomain,
    MulePolicy,
    MuleApplicationExample,
    MuleApplicationTemplate,
}

impl PackagingType {
    pub const ALL: [PackagingType; 5] = [
        Self::MuleApplication,
        Self::MuleDomain,
        Self::MulePolicy,
        Self::MuleApplicationExample,
        Self::MuleApplicationTemplate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MuleApplication => "mule-application",
            Self::MuleDomain => "mule-domain",
            Self::MulePolicy => "mule-policy",
            Self::MuleApplicationExample => "mule-application-example",
            Self::MuleApplicationTemplate => "mule-application-template",
        }
    }

    /// Source folder, relative to the project root, that must exist
    pub fn source_folder(&self) -> PathBuf {
        match self {
            Self::MulePolicy => Path::new("src").join("main").join("policy"),
            _ => Path::new("src").join("main").join("mule"),
        }
    }
}

impl fmt::Display for PackagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackagingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown packaging type '{}'", s))
    }
}

/// Coordinates of a dependency (group, artifact, version, classifier)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl ArtifactCoordinates {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// True when the classifier is exactly the domain classifier
    pub fn is_domain(&self) -> bool {
        self.classifier.as_deref() == Some(DOMAIN_CLASSIFIER)
    }

    /// True when the classifier names a domain in any spelling
    ///
    /// Used to catch miscategorized references such as `Mule-Domain` or a
    /// classifier with stray whitespace.
    pub fn resembles_domain(&self) -> bool {
        self.classifier
            .as_deref()
            .map(|c| c.trim().eq_ignore_ascii_case(DOMAIN_CLASSIFIER))
            .unwrap_or(false)
    }

    /// `artifactId:groupId` pair used to match shared libraries
    pub fn library_key(&self) -> (&str, &str) {
        (&self.artifact_id, &self.group_id)
    }
}

impl fmt::Display for ArtifactCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}

/// A dependency promoted to be visible across the plugin boundary
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SharedLibrary {
    pub group_id: String,
    pub artifact_id: String,
}

impl SharedLibrary {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for SharedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.artifact_id, self.group_id)
    }
}

/// Read-only project model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub packaging: PackagingType,
    #[serde(default)]
    pub dependencies: Vec<ArtifactCoordinates>,
    #[serde(default)]
    pub shared_libraries: Vec<SharedLibrary>,
}

impl ProjectModel {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: PackagingType::default(),
            dependencies: Vec::new(),
            shared_libraries: Vec::new(),
        }
    }

    pub fn with_packaging(mut self, packaging: PackagingType) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_dependency(mut self, dependency: ArtifactCoordinates) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_shared_library(mut self, library: SharedLibrary) -> Self {
        self.shared_libraries.push(library);
        self
    }

    /// File name of the packaged artifact, e.g. `hello-1.0.0-mule-application.jar`
    pub fn artifact_file_name(&self) -> String {
        format!(
            "{}-{}-{}.jar",
            self.artifact_id,
            self.version,
            self.packaging.as_str()
        )
    }

    /// Default location of the packaged artifact under the build directory
    pub fn packaged_artifact_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join("target").join(self.artifact_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_sources_live_in_policy_folder() {
        assert_eq!(
            PackagingType::MulePolicy.source_folder(),
            Path::new("src/main/policy")
        );
        assert_eq!(
            PackagingType::MuleDomain.source_folder(),
            Path::new("src/main/mule")
        );
    }

    #[test]
    fn packaging_type_round_trips_through_str() {
        for packaging in PackagingType::ALL {
            assert_eq!(packaging.as_str().parse::<PackagingType>(), Ok(packaging));
        }
        assert!("mule-plugin".parse::<PackagingType>().is_err());
    }

    #[test]
    fn domain_detection_is_exact() {
        let exact = ArtifactCoordinates::new("g", "d", "1").with_classifier("mule-domain");
        let loose = ArtifactCoordinates::new("g", "d", "1").with_classifier("Mule-Domain");
        let plugin = ArtifactCoordinates::new("g", "p", "1").with_classifier("mule-plugin");

        assert!(exact.is_domain());
        assert!(exact.resembles_domain());
        assert!(!loose.is_domain());
        assert!(loose.resembles_domain());
        assert!(!plugin.resembles_domain());
    }

    #[test]
    fn shared_library_displays_artifact_then_group() {
        assert_eq!(SharedLibrary::new("g", "lib").to_string(), "lib:g");
    }

    #[test]
    fn packaged_artifact_path_uses_target_dir() {
        let project = ProjectModel::new("org.example", "hello", "1.0.0");
        assert_eq!(
            project.packaged_artifact_path(Path::new("/work")),
            Path::new("/work/target/hello-1.0.0-mule-application.jar")
        );
    }
}
