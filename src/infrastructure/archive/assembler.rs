//! Artifact assembler
//!
//! Writes an [`ArchiveSources`] list as a deflated zip (the Mule `.jar`
//! format) laid out by [`ArchiveLayout`]. Archives are byte-reproducible:
//! entries are sorted by path, timestamps pinned to the zip epoch and modes
//! normalized. The archive is staged in a temporary file next to the
//! destination and renamed into place only after everything was written.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::domain::value_objects::{ArchiveLayout, ArchivePatterns};
use crate::error::ArchiveError;

use super::sources::{to_archive_path, ArchiveSources, SourceContent};

const FILE_MODE: u32 = 0o644;

/// A written archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedArchive {
    pub path: PathBuf,
    /// Archive paths in archive order
    pub entries: Vec<String>,
    /// Lowercase hex SHA-256 of the archive bytes
    pub sha256: String,
    pub size: u64,
}

enum EntryData {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Builds archives with the fixed four-root layout
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactAssembler {
    layout: ArchiveLayout,
}

impl ArtifactAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble `sources` into a new archive at `output`
    ///
    /// When a path is contributed twice the later source wins. On any error
    /// `output` is left untouched.
    pub fn assemble(
        &self,
        sources: &ArchiveSources,
        output: &Path,
    ) -> Result<PackagedArchive, ArchiveError> {
        let entries = self.collect(sources)?;
        debug!(output = %output.display(), entries = entries.len(), "assembling archive");

        let staged = write_archive(&entries, output)?;
        staged.persist(output).map_err(|e| ArchiveError::Write {
            path: output.to_path_buf(),
            source: e.error,
        })?;

        let (sha256, size) = digest(output).map_err(|source| ArchiveError::Write {
            path: output.to_path_buf(),
            source,
        })?;
        debug!(output = %output.display(), size, sha256 = %sha256, "archive written");

        Ok(PackagedArchive {
            path: output.to_path_buf(),
            entries: entries.into_keys().collect(),
            sha256,
            size,
        })
    }

    fn collect(&self, sources: &ArchiveSources) -> Result<BTreeMap<String, EntryData>, ArchiveError> {
        let mut entries = BTreeMap::new();

        for source in sources.iter() {
            let base = self.layout.entry_path(source.root, &source.prefix);
            match &source.content {
                SourceContent::File(path) => {
                    let metadata = std::fs::metadata(path).map_err(|e| unreadable(path, e))?;
                    if !metadata.is_file() {
                        return Err(unreadable(
                            path,
                            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
                        ));
                    }
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    entries.insert(format!("{}{}", base, name), EntryData::File(path.clone()));
                }
                SourceContent::Directory { path, patterns } => {
                    let mut files = Vec::new();
                    walk(path, path, patterns, &mut files)?;
                    for (relative, absolute) in files {
                        entries.insert(format!("{}{}", base, relative), EntryData::File(absolute));
                    }
                }
                SourceContent::Bytes { name, data } => {
                    entries.insert(format!("{}{}", base, name), EntryData::Bytes(data.clone()));
                }
            }
        }

        Ok(entries)
    }
}

/// Files under `current` accepted by `patterns`, as (archive-relative, absolute)
fn walk(
    root: &Path,
    current: &Path,
    patterns: &ArchivePatterns,
    files: &mut Vec<(String, PathBuf)>,
) -> Result<(), ArchiveError> {
    let read_dir = std::fs::read_dir(current).map_err(|e| unreadable(current, e))?;
    let mut children = Vec::new();
    for entry in read_dir {
        children.push(entry.map_err(|e| unreadable(current, e))?.path());
    }
    children.sort();

    for path in children {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if path.is_dir() {
            walk(root, &path, patterns, files)?;
        } else if patterns.accepts(relative) {
            files.push((to_archive_path(relative), path.clone()));
        }
    }
    Ok(())
}

fn write_archive(
    entries: &BTreeMap<String, EntryData>,
    output: &Path,
) -> Result<NamedTempFile, ArchiveError> {
    let write_err = |source: io::Error| ArchiveError::Write {
        path: output.to_path_buf(),
        source,
    };

    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(write_err)?;
    let staged = NamedTempFile::new_in(parent).map_err(write_err)?;

    let zip_err = |err: ZipError| write_err(io::Error::new(io::ErrorKind::Other, err));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(FILE_MODE);
    let mut writer = ZipWriter::new(staged);

    for (name, data) in entries {
        writer.start_file(name.as_str(), options).map_err(zip_err)?;
        match data {
            EntryData::File(path) => {
                let mut file = File::open(path).map_err(|e| unreadable(path, e))?;
                io::copy(&mut file, &mut writer).map_err(|e| unreadable(path, e))?;
            }
            EntryData::Bytes(bytes) => writer.write_all(bytes).map_err(write_err)?,
        }
    }

    let staged = writer.finish().map_err(zip_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    Ok(staged)
}

fn digest(path: &Path) -> io::Result<(String, u64)> {
    let mut hasher = Sha256::new();
    let size = io::copy(&mut File::open(path)?, &mut hasher)?;
    Ok((format!("{:x}", hasher.finalize()), size))
}

fn unreadable(path: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    }
}
