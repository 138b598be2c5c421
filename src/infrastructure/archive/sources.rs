//! Archive sources
//!
//! What goes into an archive, expressed as files, directory trees and
//! generated content, each attached to one logical root of the layout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::{ProjectModel, DESCRIPTOR_FILE};
use crate::domain::value_objects::{ArchivePatterns, ArchiveRoot};

/// One contribution to an archive
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    pub root: ArchiveRoot,
    /// Path under the root's prefix, forward-slash separated, empty or `/`-terminated
    pub prefix: String,
    pub content: SourceContent,
}

#[derive(Debug, Clone)]
pub enum SourceContent {
    /// A single file, added under its own name
    File(PathBuf),
    /// A directory tree, filtered by the patterns
    Directory {
        path: PathBuf,
        patterns: Arc<ArchivePatterns>,
    },
    /// Content generated in memory
    Bytes { name: String, data: Vec<u8> },
}

/// Ordered list of archive contributions
#[derive(Debug, Clone, Default)]
pub struct ArchiveSources {
    sources: Vec<ArchiveSource>,
}

impl ArchiveSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Add a file by name directly under `root`
    pub fn add_file(&mut self, root: ArchiveRoot, path: impl Into<PathBuf>) -> &mut Self {
        self.add_file_at(root, "", path)
    }

    /// Add a file by name under `root` + `prefix`
    pub fn add_file_at(
        &mut self,
        root: ArchiveRoot,
        prefix: &str,
        path: impl Into<PathBuf>,
    ) -> &mut Self {
        self.push(root, prefix, SourceContent::File(path.into()))
    }

    /// Add a directory tree under `root` + `prefix`
    pub fn add_dir(
        &mut self,
        root: ArchiveRoot,
        prefix: &str,
        path: impl Into<PathBuf>,
        patterns: Arc<ArchivePatterns>,
    ) -> &mut Self {
        self.push(
            root,
            prefix,
            SourceContent::Directory {
                path: path.into(),
                patterns,
            },
        )
    }

    /// Add generated content named `name` under `root` + `prefix`
    pub fn add_bytes(
        &mut self,
        root: ArchiveRoot,
        prefix: &str,
        name: impl Into<String>,
        data: Vec<u8>,
    ) -> &mut Self {
        self.push(
            root,
            prefix,
            SourceContent::Bytes {
                name: name.into(),
                data,
            },
        )
    }

    fn push(&mut self, root: ArchiveRoot, prefix: &str, content: SourceContent) -> &mut Self {
        self.sources.push(ArchiveSource {
            root,
            prefix: normalize_prefix(prefix),
            content,
        });
        self
    }

    /// Conventional mapping of a project tree onto the four roots
    ///
    /// - root: the packaging's source folder and `src/main/resources`
    /// - build metadata: `<group>/<artifact>/pom.xml` (when present) and a
    ///   generated `pom.properties`
    /// - embedded source: `<artifact>/src/main/{java,resources,<mule>}` and
    ///   `<artifact>/src/test/{java,munit}`
    /// - artifact metadata: the descriptor
    ///
    /// Missing optional folders are left out; the descriptor and source
    /// folder are guaranteed by validation.
    pub fn for_project(project: &ProjectModel, base_dir: &Path, patterns: ArchivePatterns) -> Self {
        let patterns = Arc::new(patterns);
        let mut sources = Self::new();
        let source_folder = project.packaging.source_folder();
        let resources = Path::new("src").join("main").join("resources");

        for folder in [&source_folder, &resources] {
            let dir = base_dir.join(folder);
            if dir.is_dir() {
                sources.add_dir(ArchiveRoot::Root, "", dir, patterns.clone());
            }
        }

        let maven_prefix = format!("{}/{}/", project.group_id, project.artifact_id);
        let pom = base_dir.join("pom.xml");
        if pom.is_file() {
            sources.add_file_at(ArchiveRoot::MavenMetadata, &maven_prefix, pom);
        }
        sources.add_bytes(
            ArchiveRoot::MavenMetadata,
            &maven_prefix,
            "pom.properties",
            pom_properties(project).into_bytes(),
        );

        let embedded = [
            source_folder.clone(),
            Path::new("src").join("main").join("java"),
            resources,
            Path::new("src").join("test").join("java"),
            Path::new("src").join("test").join("munit"),
        ];
        for folder in embedded {
            let dir = base_dir.join(&folder);
            if dir.is_dir() {
                let prefix = format!("{}/{}", project.artifact_id, to_archive_path(&folder));
                sources.add_dir(ArchiveRoot::EmbeddedSource, &prefix, dir, patterns.clone());
            }
        }

        sources.add_file(ArchiveRoot::ArtifactMetadata, base_dir.join(DESCRIPTOR_FILE));
        sources
    }
}

/// Build metadata in `java.util.Properties` syntax, without a timestamp
pub fn pom_properties(project: &ProjectModel) -> String {
    format!(
        "#Generated by mule-deployer\ngroupId={}\nartifactId={}\nversion={}\n",
        project.group_id, project.artifact_id, project.version
    )
}

/// Forward-slash form of a relative path
pub fn to_archive_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
