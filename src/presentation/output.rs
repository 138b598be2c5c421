//! Output Rendering
//!
//! Final result of a command as text or JSON. Progress while a command runs
//! goes through the event sinks instead.

use serde_json::{json, Value};

use crate::application::DeployOutcome;
use crate::error::DeployError;
use crate::infrastructure::PackagedArchive;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// One JSON object per line, for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Text summary of a lifecycle action
pub fn outcome_text(outcome: &DeployOutcome) -> String {
    if outcome.skipped {
        return format!(
            "[SKIP] {} {} ({}): mule.skip is set",
            outcome.action.as_str(),
            outcome.application,
            outcome.kind
        );
    }

    let mut lines = vec![format!(
        "[OK] {} {} ({})",
        outcome.action.as_str(),
        outcome.application,
        outcome.kind
    )];
    if let Some(archive) = &outcome.archive {
        lines.push(format!("  archive: {}", archive.path.display()));
    }
    if let Some(id) = &outcome.application_id {
        lines.push(format!("  id: {}", id));
    }
    if outcome.polls > 0 {
        lines.push(format!("  started after {} poll(s)", outcome.polls));
    }
    lines.join("\n")
}

pub fn outcome_json(outcome: &DeployOutcome) -> Value {
    let mut value = serde_json::to_value(outcome).unwrap_or(Value::Null);
    if let Some(object) = value.as_object_mut() {
        object.insert("event".to_string(), json!("result"));
    }
    value
}

pub fn archive_text(archive: &PackagedArchive) -> String {
    let mut lines = vec![format!(
        "[OK] packaged {} ({} entries, {} bytes)",
        archive.path.display(),
        archive.entries.len(),
        archive.size
    )];
    lines.push(format!("  sha256: {}", archive.sha256));
    lines.join("\n")
}

pub fn archive_json(archive: &PackagedArchive) -> Value {
    json!({
        "event": "result",
        "path": archive.path.display().to_string(),
        "entries": archive.entries,
        "sha256": archive.sha256,
        "size": archive.size,
    })
}

/// Error object with its stable kind and exit code
pub fn error_json(err: &DeployError) -> Value {
    let kind = err.kind();
    json!({
        "event": "error",
        "kind": kind.as_str(),
        "exit_code": kind.exit_code(),
        "message": err.to_string(),
    })
}
