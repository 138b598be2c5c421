//! Archive include/exclude patterns
//!
//! Glob filters applied while adding a directory tree to an archive. Patterns
//! use gitignore semantics through the `ignore` crate. The default excludes
//! (version-control directories, editor and OS metadata) always apply, even
//! when the caller supplies its own exclude list.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

use crate::error::ArchiveError;

/// Maximum number of caller-supplied patterns
const MAX_PATTERNS: usize = 1000;

/// Excludes applied to every directory added to an archive
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // editors
    "*~",
    "\\#*#",
    ".#*",
    "%*%",
    "._*",
    // version control
    "CVS/",
    ".cvsignore",
    "RCS/",
    "SCCS/",
    "vssver.scc",
    "project.pj",
    ".svn/",
    ".arch-ids/",
    ".bzr/",
    ".MySCMServerInfo",
    ".hg/",
    ".git/",
    ".gitignore",
    ".gitattributes",
    "BitKeeper/",
    "ChangeSet/",
    "_darcs/",
    ".darcsrepo/",
    "-darcs-backup*",
    ".darcs-temp-mail",
    // OS and IDE metadata
    ".DS_Store",
    ".metadata/",
];

/// Compiled include/exclude filter for one archive source
#[derive(Debug)]
pub struct ArchivePatterns {
    includes: Option<Gitignore>,
    excludes: Gitignore,
}

impl Default for ArchivePatterns {
    fn default() -> Self {
        Self::defaults_only()
    }
}

impl ArchivePatterns {
    /// Filter with no includes and only the default excludes
    pub fn defaults_only() -> Self {
        let mut builder = GitignoreBuilder::new("");
        for pattern in DEFAULT_EXCLUDES {
            let _ = builder.add_line(None, pattern);
        }
        let excludes = builder.build().unwrap_or_else(|_| Gitignore::empty());
        Self {
            includes: None,
            excludes,
        }
    }

    /// Compile caller patterns; an empty include list includes everything
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, ArchiveError> {
        if includes.len() > MAX_PATTERNS || excludes.len() > MAX_PATTERNS {
            return Err(ArchiveError::InvalidPattern {
                pattern: String::new(),
                message: format!("more than {} patterns", MAX_PATTERNS),
            });
        }

        let includes = if includes.is_empty() {
            None
        } else {
            Some(build_matcher(includes.iter().map(String::as_str))?)
        };

        let all_excludes = DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(excludes.iter().map(String::as_str));
        let excludes_matcher = build_matcher(all_excludes)?;

        Ok(Self {
            includes,
            excludes: excludes_matcher,
        })
    }

    /// Whether a file at `rel_path` (relative to the source root) is archived
    pub fn accepts(&self, rel_path: &Path) -> bool {
        if self
            .excludes
            .matched_path_or_any_parents(rel_path, false)
            .is_ignore()
        {
            return false;
        }
        match &self.includes {
            Some(includes) => includes
                .matched_path_or_any_parents(rel_path, false)
                .is_ignore(),
            None => true,
        }
    }
}

fn build_matcher<'a>(patterns: impl Iterator<Item = &'a str>) -> Result<Gitignore, ArchiveError> {
    let mut builder = GitignoreBuilder::new("");
    for pattern in patterns {
        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        builder
            .add_line(None, trimmed)
            .map_err(|e| ArchiveError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
    }
    builder.build().map_err(|e| ArchiveError::InvalidPattern {
        pattern: String::new(),
        message: e.to_string(),
    })
}
