//! Deploy Event Port
//!
//! Observable progress for lifecycle actions. Drives console progress, the
//! NDJSON event stream and test assertions.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::{DeploymentKind, DeploymentStatus};

/// Event emitted while a lifecycle action runs
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Action started for a resolved request
    Started {
        action: &'static str,
        application: String,
        kind: DeploymentKind,
    },

    /// Request resolved but `skip` is set
    Skipped { application: String },

    /// Project passed pre-flight validation
    Validated { application: String },

    /// Archive written to disk
    Assembled {
        path: PathBuf,
        entries: usize,
        sha256: String,
    },

    /// Symbolic environment/target name resolved to an identifier
    NameResolved {
        scope: &'static str,
        name: String,
        id: String,
    },

    /// Artifact accepted by the target
    Submitted {
        application: String,
        id: String,
    },

    /// One status poll returned
    StatusPolled {
        application: String,
        attempt: u32,
        status: DeploymentStatus,
    },

    /// Application removed from its target
    Undeployed { application: String },

    /// Action finished successfully
    Completed {
        action: &'static str,
        application: String,
        elapsed: Duration,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: progress lines on stderr
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Whether this sink wants per-poll events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
