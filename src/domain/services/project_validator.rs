//! Pre-flight project validation
//!
//! Rejects structurally invalid projects before anything is packaged or sent
//! over the network. Checks run in a fixed order and stop at the first
//! failure.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::entities::{
    ArtifactCoordinates, PackagingType, ProjectModel, SharedLibrary, DESCRIPTOR_FILE,
};
use crate::domain::ports::FileSystem;
use crate::error::ValidationError;

/// A project references at most this many domains
pub const MAX_DOMAIN_REFERENCES: usize = 1;

/// Validates project layout and dependency rules
pub struct ProjectValidator<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
}

impl<'a, F: FileSystem + ?Sized> ProjectValidator<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Run every check in order
    pub fn validate(
        &self,
        project: &ProjectModel,
        packaging: PackagingType,
        base_dir: &Path,
        shared_libraries: &[SharedLibrary],
    ) -> Result<(), ValidationError> {
        self.check_source_root(packaging, base_dir)?;
        self.check_descriptor(base_dir)?;
        check_shared_libraries(shared_libraries, &project.dependencies)?;
        check_domain_references(packaging, &project.dependencies)?;
        Ok(())
    }

    fn check_source_root(
        &self,
        packaging: PackagingType,
        base_dir: &Path,
    ) -> Result<(), ValidationError> {
        let source_root = base_dir.join(packaging.source_folder());
        if !self.fs.exists(&source_root) {
            return Err(ValidationError::MissingSourceRoot {
                path: source_root,
                packaging,
            });
        }
        Ok(())
    }

    fn check_descriptor(&self, base_dir: &Path) -> Result<(), ValidationError> {
        let descriptor = base_dir.join(DESCRIPTOR_FILE);
        if !self.fs.exists(&descriptor) {
            return Err(ValidationError::MissingDescriptor { path: descriptor });
        }
        Ok(())
    }
}

/// Every shared library must be one of the project dependencies
///
/// Matching is on the artifact id and group id; version and classifier are
/// ignored.
pub fn check_shared_libraries(
    shared_libraries: &[SharedLibrary],
    dependencies: &[ArtifactCoordinates],
) -> Result<(), ValidationError> {
    let declared: BTreeSet<(&str, &str)> = dependencies.iter().map(|d| d.library_key()).collect();

    let missing: BTreeSet<&SharedLibrary> = shared_libraries
        .iter()
        .filter(|lib| !declared.contains(&(lib.artifact_id.as_str(), lib.group_id.as_str())))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    Err(ValidationError::UnresolvedSharedLibrary {
        missing: missing.into_iter().cloned().collect(),
    })
}

/// At most one dependency may reference a domain, and it must be classified
/// exactly as one
pub fn check_domain_references(
    packaging: PackagingType,
    dependencies: &[ArtifactCoordinates],
) -> Result<(), ValidationError> {
    let domains: BTreeSet<&ArtifactCoordinates> = dependencies
        .iter()
        .filter(|d| d.resembles_domain())
        .collect();

    let miscategorized: Vec<ArtifactCoordinates> = domains
        .iter()
        .filter(|d| !d.is_domain())
        .map(|d| (*d).clone())
        .collect();
    if !miscategorized.is_empty() {
        return Err(ValidationError::InvalidDomainClassification {
            dependencies: miscategorized,
        });
    }

    if domains.len() > MAX_DOMAIN_REFERENCES {
        return Err(ValidationError::TooManyDomainReferences {
            packaging,
            limit: MAX_DOMAIN_REFERENCES,
            domains: domains.into_iter().cloned().collect(),
        });
    }
    Ok(())
}
