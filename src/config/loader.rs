//! Project file loading

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

pub use crate::domain::value_objects::ConfigWarning;

use super::types::ProjectFile;

/// Keys a project file may contain, used for typo suggestions
const KNOWN_KEYS: &[&str] = &[
    "project",
    "group_id",
    "artifact_id",
    "version",
    "packaging",
    "dependencies",
    "classifier",
    "shared_libraries",
    "archive",
    "includes",
    "excludes",
    "deployment",
    "kind",
    "application_name",
    "skip",
    "mule_version",
    "artifact",
    "deployment_timeout",
    "poll_interval",
    "script",
    "timeout",
    "arguments",
    "mule_home",
    "size",
    "uri",
    "business_group",
    "environment",
    "username",
    "password",
    "server",
    "insecure",
    "fail_if_not_exists",
    "target",
    "target_type",
    "workers",
    "worker_type",
    "region",
];

/// Load a project file and collect unknown keys as warnings
pub fn load_with_warnings(path: &Path) -> Result<(ProjectFile, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::File {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let file: ProjectFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::File {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings: Vec<ConfigWarning> = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .rsplit('.')
                .next()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    debug!(path = %path.display(), warnings = warnings.len(), "loaded project file");
    Ok((file, warnings))
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            let line = line.trim_start().trim_start_matches("[[").trim_start_matches('[');
            line.starts_with(key)
        })
        .map(|index| index + 1)
}

pub(crate) fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, distance)| *distance)
        .filter(|(_, distance)| *distance <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a == b {
        return 0;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ac != bc);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
