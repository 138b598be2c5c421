//! Console Event Sink
//!
//! One human-readable progress line per stage, written to stderr so stdout
//! stays free for command output.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stderr(verbose: bool) -> Self {
        Self::with_writer(io::stderr(), verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
        }
    }
}

/// Progress line for an event
pub fn render(event: &DeployEvent) -> String {
    match event {
        DeployEvent::Started {
            action,
            application,
            kind,
        } => format!("{} {} ({})", capitalize(action), application, kind),
        DeployEvent::Skipped { application } => {
            format!("Skipping {} (mule.skip is set)", application)
        }
        DeployEvent::Validated { application } => format!("  validated {}", application),
        DeployEvent::Assembled {
            path,
            entries,
            sha256,
        } => format!(
            "  packaged {} ({} entries, sha256 {})",
            path.display(),
            entries,
            &sha256[..sha256.len().min(12)]
        ),
        DeployEvent::NameResolved { scope, name, id } => {
            format!("  {} {} -> {}", scope, name, id)
        }
        DeployEvent::Submitted { application, id } => {
            format!("  submitted {} as {}", application, id)
        }
        DeployEvent::StatusPolled { attempt, status, .. } => {
            format!("  poll #{}: {}", attempt, status)
        }
        DeployEvent::Undeployed { application } => format!("  undeployed {}", application),
        DeployEvent::Completed {
            action,
            application,
            elapsed,
        } => format!(
            "Done: {} {} in {:.1}s",
            action,
            application,
            elapsed.as_secs_f64()
        ),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", render(&event));
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
