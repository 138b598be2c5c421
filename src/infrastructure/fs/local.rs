//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations.

use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Local file system implementation
///
/// Copies go through a temporary file in the destination
/// directory followed by a rename, so readers never observe partial content.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }

    fn staging_file(path: &Path) -> FsResult<NamedTempFile> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| FsError::at(parent, e))?;
        NamedTempFile::new_in(parent).map_err(|e| FsError::at(parent, e))
    }

    fn commit(tmp: NamedTempFile, path: &Path) -> FsResult<()> {
        tmp.persist(path).map_err(|e| FsError::at(path, e.error))?;
        Ok(())
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn copy(&self, from: &Path, to: &Path) -> FsResult<()> {
        let mut source = std::fs::File::open(from).map_err(|e| FsError::at(from, e))?;
        let mut tmp = Self::staging_file(to)?;
        std::io::copy(&mut source, &mut tmp).map_err(|e| FsError::at(to, e))?;
        tmp.as_file().sync_all().map_err(|e| FsError::at(to, e))?;
        Self::commit(tmp, to)
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        std::fs::remove_file(path).map_err(|e| FsError::at(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn local_fs_copy_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("app.jar");
        let to = dir.path().join("nested").join("apps").join("app.jar");
        std::fs::write(&from, b"content").unwrap();

        LocalFs::new().copy(&from, &to).unwrap();
        assert_eq!(std::fs::read(&to).unwrap(), b"content");
    }

    #[test]
    fn local_fs_copy_replaces_destination() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("app.jar");
        let to = dir.path().join("apps").join("app.jar");
        let fs = LocalFs::new();

        std::fs::write(&from, b"new").unwrap();
        std::fs::create_dir_all(to.parent().unwrap()).unwrap();
        std::fs::write(&to, b"old").unwrap();
        fs.copy(&from, &to).unwrap();

        assert_eq!(std::fs::read(&to).unwrap(), b"new");
        // only the committed file is left behind
        assert_eq!(std::fs::read_dir(dir.path().join("apps")).unwrap().count(), 1);
    }

    #[test]
    fn local_fs_copy_missing_source() {
        let dir = tempdir().unwrap();
        let err = LocalFs::new()
            .copy(&dir.path().join("missing"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[test]
    fn local_fs_exists_and_remove() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("remove.txt");
        let fs = LocalFs::new();

        assert!(!fs.exists(&file));
        std::fs::write(&file, b"content").unwrap();
        assert!(fs.exists(&file));
        assert!(!fs.is_dir(&file));
        assert!(fs.is_dir(dir.path()));

        fs.remove(&file).unwrap();
        assert!(!fs.exists(&file));
    }
}
