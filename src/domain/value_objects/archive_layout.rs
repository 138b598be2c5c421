//! Archive layout value object
//!
//! The four logical roots of a packaged artifact and the path prefixes they map
//! to inside the archive. The mapping is fixed; deployments cannot alter it.

use std::fmt;

/// Logical root an archive entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchiveRoot {
    /// Compiled classes, configuration and resources
    Root,
    /// Build metadata (`pom.xml`, `pom.properties`)
    MavenMetadata,
    /// Embedded copy of the original source tree
    EmbeddedSource,
    /// Artifact descriptor and metadata
    ArtifactMetadata,
}

impl ArchiveRoot {
    pub const ALL: [ArchiveRoot; 4] = [
        Self::Root,
        Self::MavenMetadata,
        Self::EmbeddedSource,
        Self::ArtifactMetadata,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::MavenMetadata => "maven-metadata",
            Self::EmbeddedSource => "embedded-source",
            Self::ArtifactMetadata => "artifact-metadata",
        }
    }
}

impl fmt::Display for ArchiveRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from logical roots to archive path prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveLayout;

impl ArchiveLayout {
    pub const ROOT_LOCATION: &'static str = "";
    pub const MAVEN_LOCATION: &'static str = "META-INF/maven/";
    pub const MULE_SRC_LOCATION: &'static str = "META-INF/mule-src/";
    pub const MULE_ARTIFACT_LOCATION: &'static str = "META-INF/mule-artifact/";

    pub fn prefix(&self, root: ArchiveRoot) -> &'static str {
        match root {
            ArchiveRoot::Root => Self::ROOT_LOCATION,
            ArchiveRoot::MavenMetadata => Self::MAVEN_LOCATION,
            ArchiveRoot::EmbeddedSource => Self::MULE_SRC_LOCATION,
            ArchiveRoot::ArtifactMetadata => Self::MULE_ARTIFACT_LOCATION,
        }
    }

    /// Archive path for `relative` (forward-slash separated) under `root`
    pub fn entry_path(&self, root: ArchiveRoot, relative: &str) -> String {
        format!("{}{}", self.prefix(root), relative.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_bit_exact() {
        let layout = ArchiveLayout;
        assert_eq!(layout.prefix(ArchiveRoot::Root), "");
        assert_eq!(layout.prefix(ArchiveRoot::MavenMetadata), "META-INF/maven/");
        assert_eq!(
            layout.prefix(ArchiveRoot::EmbeddedSource),
            "META-INF/mule-src/"
        );
        assert_eq!(
            layout.prefix(ArchiveRoot::ArtifactMetadata),
            "META-INF/mule-artifact/"
        );
    }

    #[test]
    fn entry_path_joins_without_double_slash() {
        let layout = ArchiveLayout;
        assert_eq!(
            layout.entry_path(ArchiveRoot::ArtifactMetadata, "/mule-artifact.json"),
            "META-INF/mule-artifact/mule-artifact.json"
        );
        assert_eq!(layout.entry_path(ArchiveRoot::Root, "a/b.xml"), "a/b.xml");
    }
}
