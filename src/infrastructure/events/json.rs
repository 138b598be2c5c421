//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

use crate::domain::ports::{DeployEvent, DeployEventSink};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, mut event: serde_json::Value) {
        if let Some(object) = event.as_object_mut() {
            object.insert(
                "ts".to_string(),
                serde_json::Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON body of an event, without the timestamp
pub fn event_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            action,
            application,
            kind,
        } => serde_json::json!({
            "event": "start",
            "command": action,
            "application": application,
            "kind": kind.as_str(),
        }),

        DeployEvent::Skipped { application } => serde_json::json!({
            "event": "skipped",
            "application": application,
        }),

        DeployEvent::Validated { application } => serde_json::json!({
            "event": "validated",
            "application": application,
        }),

        DeployEvent::Assembled {
            path,
            entries,
            sha256,
        } => serde_json::json!({
            "event": "assembled",
            "path": path.display().to_string(),
            "entries": entries,
            "sha256": sha256,
        }),

        DeployEvent::NameResolved { scope, name, id } => serde_json::json!({
            "event": "resolved",
            "scope": scope,
            "name": name,
            "id": id,
        }),

        DeployEvent::Submitted { application, id } => serde_json::json!({
            "event": "submitted",
            "application": application,
            "id": id,
        }),

        DeployEvent::StatusPolled {
            application,
            attempt,
            status,
        } => serde_json::json!({
            "event": "status",
            "application": application,
            "attempt": attempt,
            "status": status.as_str(),
        }),

        DeployEvent::Undeployed { application } => serde_json::json!({
            "event": "undeployed",
            "application": application,
        }),

        DeployEvent::Completed {
            action,
            application,
            elapsed,
        } => serde_json::json!({
            "event": "complete",
            "command": action,
            "application": application,
            "status": "success",
            "elapsed_ms": elapsed.as_millis() as u64,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(event_json(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DeploymentKind, DeploymentStatus};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(writer: &TestWriter) -> Vec<serde_json::Value> {
        let buffer = writer.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_one_line_per_event() {
        let writer = TestWriter::default();
        let sink = JsonEventSink::with_writer(writer.clone());

        sink.on_event(DeployEvent::Started {
            action: "deploy",
            application: "hello".into(),
            kind: DeploymentKind::Standalone,
        });
        sink.on_event(DeployEvent::StatusPolled {
            application: "hello".into(),
            attempt: 2,
            status: DeploymentStatus::NotStarted,
        });

        let events = lines(&writer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[0]["kind"], "standalone");
        assert_eq!(events[1]["status"], "not-started");
        assert_eq!(events[1]["attempt"], 2);
    }

    #[test]
    fn events_carry_rfc3339_timestamp() {
        let writer = TestWriter::default();
        let sink = JsonEventSink::with_writer(writer.clone());

        sink.on_event(DeployEvent::Assembled {
            path: PathBuf::from("target/hello.jar"),
            entries: 3,
            sha256: "ab".repeat(32),
        });

        let event = &lines(&writer)[0];
        let ts = event["ts"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(event["entries"], 3);
    }

    #[test]
    fn completed_reports_elapsed_millis() {
        let json = event_json(&DeployEvent::Completed {
            action: "deploy",
            application: "hello".into(),
            elapsed: Duration::from_millis(1500),
        });
        assert_eq!(json["elapsed_ms"], 1500);
        assert_eq!(json["status"], "success");
    }
}
